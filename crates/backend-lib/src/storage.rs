// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Credential store abstraction with in-memory implementation.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AuthError;
use crate::models::{InviteLink, PasswordResetLink, RefreshToken, User};

/// Trait for credential persistence backends.
///
/// Plain lookups are single-row; `create_user_with_invite` and
/// `apply_password_reset` are the two multi-row writes that must commit
/// together. An implementation must apply each of them atomically:
/// either every row changes or none does.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    // ---- users ----
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Whether `email` or `username` is already bound to an account.
    async fn identity_taken(&self, email: &str, username: &str) -> Result<bool, AuthError>;

    async fn insert_user(&self, user: User) -> Result<User, AuthError>;

    async fn count_users(&self) -> Result<usize, AuthError>;

    /// Enable or disable an account (admin toggle). Accounts are never
    /// hard-deleted.
    async fn set_user_active(&self, user_id: Uuid, active: bool) -> Result<(), AuthError>;

    /// Increment the user's failed-login counter.
    async fn record_login_failure(&self, user_id: Uuid) -> Result<(), AuthError>;

    /// Zero the user's failed-login counter.
    async fn clear_login_failures(&self, user_id: Uuid) -> Result<(), AuthError>;

    // ---- invite links ----
    async fn insert_invite(&self, invite: InviteLink) -> Result<InviteLink, AuthError>;

    async fn find_invite(&self, token: &str) -> Result<Option<InviteLink>, AuthError>;

    /// Create `user` and consume the invite in one atomic unit.
    ///
    /// Re-validates the invite and the identity uniqueness under the
    /// store's own transactional boundary; the pre-checks the service
    /// ran are only advisory against concurrent registrations.
    async fn create_user_with_invite(
        &self,
        user: User,
        invite_token: &str,
    ) -> Result<User, AuthError>;

    // ---- password reset links ----
    async fn insert_reset_link(
        &self,
        link: PasswordResetLink,
    ) -> Result<PasswordResetLink, AuthError>;

    async fn find_reset_link(&self, token: &str) -> Result<Option<PasswordResetLink>, AuthError>;

    /// Store the new password hash and consume the reset link in one
    /// atomic unit; bumps the user's `updated_at`.
    async fn apply_password_reset(
        &self,
        link_id: Uuid,
        user_id: Uuid,
        new_hash: &str,
    ) -> Result<(), AuthError>;

    // ---- refresh tokens ----
    async fn insert_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, AuthError>;

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError>;

    async fn revoke_refresh_token(&self, id: Uuid) -> Result<(), AuthError>;
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// keyed by token value; the token column is unique
    invites: HashMap<String, InviteLink>,
    resets: HashMap<String, PasswordResetLink>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

impl Tables {
    fn identity_taken(&self, email: &str, username: &str) -> bool {
        self.users
            .values()
            .any(|u| u.email == email || u.username == username)
    }
}

/// In-memory implementation of the [`CredentialStore`] trait.
///
/// One `RwLock` guards all four tables, so each compound operation runs
/// inside a single write-lock scope: checks first, mutations last,
/// which makes every write all-or-nothing.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let tables = self.inner.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn identity_taken(&self, email: &str, username: &str) -> Result<bool, AuthError> {
        let tables = self.inner.read().await;
        Ok(tables.identity_taken(email, username))
    }

    async fn insert_user(&self, user: User) -> Result<User, AuthError> {
        let mut tables = self.inner.write().await;
        if tables.identity_taken(&user.email, &user.username) {
            return Err(AuthError::DuplicateIdentity);
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn count_users(&self) -> Result<usize, AuthError> {
        let tables = self.inner.read().await;
        Ok(tables.users.len())
    }

    async fn set_user_active(&self, user_id: Uuid, active: bool) -> Result<(), AuthError> {
        let mut tables = self.inner.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(AuthError::UserNotFound)?;
        user.is_active = active;
        user.touch();
        Ok(())
    }

    async fn record_login_failure(&self, user_id: Uuid) -> Result<(), AuthError> {
        let mut tables = self.inner.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(AuthError::UserNotFound)?;
        user.failed_login_attempts += 1;
        Ok(())
    }

    async fn clear_login_failures(&self, user_id: Uuid) -> Result<(), AuthError> {
        let mut tables = self.inner.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(AuthError::UserNotFound)?;
        user.failed_login_attempts = 0;
        Ok(())
    }

    async fn insert_invite(&self, invite: InviteLink) -> Result<InviteLink, AuthError> {
        let mut tables = self.inner.write().await;
        tables.invites.insert(invite.token.clone(), invite.clone());
        Ok(invite)
    }

    async fn find_invite(&self, token: &str) -> Result<Option<InviteLink>, AuthError> {
        let tables = self.inner.read().await;
        Ok(tables.invites.get(token).cloned())
    }

    async fn create_user_with_invite(
        &self,
        user: User,
        invite_token: &str,
    ) -> Result<User, AuthError> {
        let mut tables = self.inner.write().await;

        // validate everything before the first mutation
        {
            let invite = tables
                .invites
                .get(invite_token)
                .ok_or(AuthError::NotFound)?;
            if invite.is_used {
                return Err(AuthError::AlreadyUsed);
            }
            if invite.is_expired() {
                return Err(AuthError::Expired);
            }
        }
        if tables.identity_taken(&user.email, &user.username) {
            return Err(AuthError::DuplicateIdentity);
        }

        tables.users.insert(user.id, user.clone());
        tables
            .invites
            .get_mut(invite_token)
            .expect("invite checked above")
            .is_used = true;

        Ok(user)
    }

    async fn insert_reset_link(
        &self,
        link: PasswordResetLink,
    ) -> Result<PasswordResetLink, AuthError> {
        let mut tables = self.inner.write().await;
        tables.resets.insert(link.token.clone(), link.clone());
        Ok(link)
    }

    async fn find_reset_link(&self, token: &str) -> Result<Option<PasswordResetLink>, AuthError> {
        let tables = self.inner.read().await;
        Ok(tables.resets.get(token).cloned())
    }

    async fn apply_password_reset(
        &self,
        link_id: Uuid,
        user_id: Uuid,
        new_hash: &str,
    ) -> Result<(), AuthError> {
        let mut tables = self.inner.write().await;

        let link_token = tables
            .resets
            .values()
            .find(|l| l.id == link_id)
            .map(|l| l.token.clone())
            .ok_or(AuthError::NotFound)?;
        if tables.resets[&link_token].is_used {
            return Err(AuthError::AlreadyUsed);
        }
        if !tables.users.contains_key(&user_id) {
            // stale link: the user row is gone, leave the link untouched
            return Err(AuthError::UserNotFound);
        }

        let user = tables.users.get_mut(&user_id).expect("user checked above");
        user.password_hash = new_hash.to_string();
        user.touch();
        tables
            .resets
            .get_mut(&link_token)
            .expect("link checked above")
            .is_used = true;

        Ok(())
    }

    async fn insert_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, AuthError> {
        let mut tables = self.inner.write().await;
        tables
            .refresh_tokens
            .insert(token.token.clone(), token.clone());
        Ok(token)
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        let tables = self.inner.read().await;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn revoke_refresh_token(&self, id: Uuid) -> Result<(), AuthError> {
        let mut tables = self.inner.write().await;
        let token = tables
            .refresh_tokens
            .values_mut()
            .find(|t| t.id == id)
            .ok_or(AuthError::InvalidOrExpiredToken)?;
        // revocation is monotonic, keep the first timestamp
        if token.revoked_at.is_none() {
            token.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}
