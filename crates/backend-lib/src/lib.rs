// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `HealthDiary` auth server.
//!
//! Invite-gated registration, rate-limited password login, signed
//! access tokens, opaque refresh tokens, and time-boxed password-reset
//! links. The health-record API is a separate collaborator that calls
//! into this crate only to resolve an authenticated principal.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::Settings;
use crate::storage::CredentialStore;

/// Application state shared across all handlers
pub struct AppState<S: CredentialStore> {
    /// Authentication service
    pub auth: Arc<AuthService<S>>,
    /// Credential store
    pub store: Arc<S>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl<S: CredentialStore> AppState<S> {
    /// Create a new application state
    pub fn new(store: S, settings: Settings) -> Self {
        let store = Arc::new(store);
        let settings = Arc::new(settings);
        let auth = Arc::new(AuthService::new(store.clone(), settings.clone()));

        Self {
            auth,
            store,
            settings,
        }
    }
}

impl<S: CredentialStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            store: self.store.clone(),
            settings: self.settings.clone(),
        }
    }
}
