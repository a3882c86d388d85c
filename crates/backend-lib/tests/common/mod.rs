// ==============================
// crates/backend-lib/tests/common/mod.rs
// ==============================
//! Shared setup for the integration suites.
#![allow(dead_code)]

use std::sync::Arc;

use backend_lib::auth::hash_password;
use backend_lib::config::{JwtSettings, Settings};
use backend_lib::models::{InviteLink, User};
use backend_lib::storage::{CredentialStore, MemoryStore};
use backend_lib::AppState;

/// Settings with a deterministic signing key for tests.
pub fn test_settings() -> Settings {
    Settings {
        jwt: JwtSettings {
            secret: "integration-test-secret".to_string(),
            ..JwtSettings::default()
        },
        ..Settings::default()
    }
}

pub fn test_state() -> Arc<AppState<MemoryStore>> {
    test_state_with(test_settings())
}

pub fn test_state_with(settings: Settings) -> Arc<AppState<MemoryStore>> {
    Arc::new(AppState::new(MemoryStore::new(), settings))
}

/// Insert an admin account and return it.
pub async fn seed_admin(state: &AppState<MemoryStore>) -> User {
    let mut admin = User::new(
        "admin@x.com".into(),
        "admin".into(),
        "Admin".into(),
        hash_password("admin-password-1").unwrap(),
    );
    admin.is_admin = true;
    state.store.insert_user(admin).await.unwrap()
}

/// Mint a valid invite addressed to `email`.
pub async fn seed_invite(state: &AppState<MemoryStore>, email: &str) -> InviteLink {
    let admin = match state.store.find_user_by_email("admin@x.com").await.unwrap() {
        Some(admin) => admin,
        None => seed_admin(state).await,
    };
    state.auth.generate_invite(email, admin.id).await.unwrap()
}

/// Register a user through the real invite flow and return it.
pub async fn seed_user(state: &AppState<MemoryStore>, email: &str, password: &str) -> User {
    let invite = seed_invite(state, email).await;
    let username = email.split('@').next().unwrap();
    state
        .auth
        .register(&invite.token, email, username, "Test User", password.to_string())
        .await
        .unwrap()
}
