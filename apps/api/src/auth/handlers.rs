//! Axum route handlers for registration, login, and session introspection.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::auth::{jwt, password, AuthUser, TOKEN_COOKIE_NAME};
use crate::errors::AppError;
use crate::models::user::{UserProfile, UserRow};
use crate::state::AppState;
use crate::validate::{normalize_email, require_length, require_password};

/// Postgres unique_violation; raced duplicate registrations land here.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = require_length("name", &request.name, 2, 100)?;
    let email = normalize_email(&request.email)?;
    require_password(&request.password)?;

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&request.password)?;
    let inserted: Result<UserRow, sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await;

    let user = match inserted {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict("User already exists".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    info!("Registered user {} ({})", user.id, user.email);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created",
            "user": { "id": user.id, "email": user.email }
        })),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&request.email)?;

    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    let Some(user) = user else {
        return Err(AppError::Unauthorized);
    };
    if !password::verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let token = jwt::sign_token(user.id, &state.config.jwt_secret)?;
    let cookie =
        format!("{TOKEN_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age=604800");

    info!("User {} logged in", user.id);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse { token }),
    ))
}

/// POST /api/auth/logout
pub async fn handle_logout() -> impl IntoResponse {
    let cookie = format!("{TOKEN_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(json!({ "message": "Logged out" })),
    )
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let user: Option<UserProfile> =
        sqlx::query_as("SELECT id, name, email, created_at FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;

    user.map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}
