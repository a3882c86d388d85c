// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router for the auth API.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::storage::CredentialStore;
use crate::AppState;

/// Create the auth API router
pub fn create_router<S: CredentialStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register::<S>))
        .route(
            "/api/auth/invite/validate",
            get(handlers::validate_invite::<S>),
        )
        .route("/api/auth/login", post(handlers::login::<S>))
        .route("/api/auth/token/refresh", post(handlers::refresh_token::<S>))
        .route("/api/auth/admin/invite", post(handlers::generate_invite::<S>))
        .route(
            "/api/auth/admin/password-reset",
            post(handlers::generate_password_reset::<S>),
        )
        .route(
            "/api/auth/password-reset/confirm",
            post(handlers::confirm_password_reset::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
