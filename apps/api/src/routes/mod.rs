pub mod health;

use std::time::Duration;

use axum::{
    http::{Method, Uri},
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth_handlers;
use crate::chat::handlers as chat_handlers;
use crate::coach::handlers as coach_handlers;
use crate::errors::AppError;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::state::AppState;

/// Auth endpoints: 20 requests per client per window.
const AUTH_RATE_LIMIT: u32 = 20;
/// Generation-backed endpoints: 30 requests per client per window.
const GENERATION_RATE_LIMIT: u32 = 30;
const RATE_WINDOW: Duration = Duration::from_secs(15 * 60);

pub fn build_router(state: AppState) -> Router {
    let auth_limiter = RateLimiter::new(AUTH_RATE_LIMIT, RATE_WINDOW);
    let generation_limiter = RateLimiter::new(GENERATION_RATE_LIMIT, RATE_WINDOW);

    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::handle_register))
        .route("/login", post(auth_handlers::handle_login))
        .route_layer(middleware::from_fn_with_state(
            auth_limiter,
            rate_limit_middleware,
        ))
        .route("/logout", post(auth_handlers::handle_logout))
        .route("/me", get(auth_handlers::handle_me));

    let chat_routes = Router::new()
        .route(
            "/",
            post(chat_handlers::handle_create_chat).get(chat_handlers::handle_list_chats),
        )
        .route("/:id", get(chat_handlers::handle_get_chat))
        .route(
            "/:id/messages",
            post(chat_handlers::handle_send_message).route_layer(
                middleware::from_fn_with_state(generation_limiter.clone(), rate_limit_middleware),
            ),
        );

    let insights_routes = Router::new()
        .route("/job", post(coach_handlers::handle_job_insights))
        .route("/resume", post(coach_handlers::handle_resume_feedback))
        .route_layer(middleware::from_fn_with_state(
            generation_limiter,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/auth", auth_routes)
        .nest("/api/chats", chat_routes)
        .nest("/api/insights", insights_routes)
        .fallback(not_found_handler)
        .with_state(state)
}

async fn not_found_handler(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("Route not found: {method} {}", uri.path()))
}
