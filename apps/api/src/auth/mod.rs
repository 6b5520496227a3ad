//! Authentication: password hashing, token issuance, and the request
//! extractor that turns a bearer credential into a verified user id.

pub mod handlers;
pub mod jwt;
pub mod password;

use axum::http::{header, request::Parts};
use axum::{async_trait, extract::FromRequestParts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Cookie carrying the auth token for browser clients. The Authorization
/// header takes precedence when both are present.
pub const TOKEN_COOKIE_NAME: &str = "interviewcraft_token";

/// Verified user identity for a request. Protected handlers take this
/// extractor; everything past it never sees raw credentials.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(AppError::Unauthorized)?;

        jwt::verify_token(&token, &state.config.jwt_secret)
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn cookie_token(parts: &Parts) -> Option<String> {
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix(TOKEN_COOKIE_NAME)?.strip_prefix('='))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(name: header::HeaderName, value: &str) -> Parts {
        Request::builder()
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_bearer_token_extracted_from_authorization_header() {
        let parts = parts_with(header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_non_bearer_authorization_is_ignored() {
        let parts = parts_with(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert!(bearer_token(&parts).is_none());
    }

    #[test]
    fn test_cookie_token_found_among_other_cookies() {
        let parts = parts_with(
            header::COOKIE,
            "theme=dark; interviewcraft_token=abc.def.ghi; lang=en",
        );
        assert_eq!(cookie_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_cookie_yields_none() {
        let parts = parts_with(header::COOKIE, "theme=dark");
        assert!(cookie_token(&parts).is_none());
    }
}
