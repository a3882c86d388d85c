// crates/backend-lib/src/handlers/mod.rs

//! HTTP handlers for the `HealthDiary` auth API.

pub mod auth;

pub use auth::*;
