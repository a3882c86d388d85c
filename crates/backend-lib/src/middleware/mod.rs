// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the `HealthDiary` auth server.

pub mod auth;

pub use auth::{bearer_token, client_identifier, require_admin};
