// ================
// crates/backend-lib/src/models.rs
// ================
//! Domain entities persisted through the credential store.
//!
//! All cross-entity references are plain ids; lookups go through the
//! [`crate::storage::CredentialStore`] seam. Validity predicates are
//! monotonic: a used, expired, or revoked token never becomes valid again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Never hard-deleted; disabled via `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub failed_login_attempts: u32,
}

impl User {
    pub fn new(email: String, username: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            name,
            password_hash,
            is_active: true,
            is_admin: false,
            created_at: now,
            updated_at: now,
            failed_login_attempts: 0,
        }
    }

    /// Bump `updated_at`. Call after any credential mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Single-use, time-boxed token gating new registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteLink {
    pub id: Uuid,
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl InviteLink {
    pub fn new(token: String, email: String, expires_at: DateTime<Utc>, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            token,
            email,
            expires_at,
            is_used: false,
            created_by,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Single-use, time-boxed token authorizing a password change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetLink {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetLink {
    pub fn new(token: String, user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token,
            user_id,
            expires_at,
            is_used: false,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Opaque long-lived credential used to mint new access tokens.
///
/// Multiple tokens may coexist per user; there is no single-session
/// enforcement. No `used` state: a token stays valid across repeated
/// use until it expires or is revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn new(token: String, user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token,
            user_id,
            expires_at,
            created_at: Utc::now(),
            revoked_at: None,
        }
    }

    #[inline]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.is_revoked() && !self.is_expired()
    }
}

/// Transient signed credential. Reconstructed fresh on each mint,
/// never persisted.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub jwt: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
