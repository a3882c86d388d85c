// ============================
// crates/backend-lib/src/auth/service.rs
// ============================
//! The authentication state machine: invites, registration, login,
//! token refresh, and password reset.
use std::sync::Arc;
use std::time::Duration;

use ::metrics::counter;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::auth::jwt::TokenService;
use crate::auth::password::{hash_password_secure, meets_length_policy, verify_password};
use crate::auth::rate_limit::LoginRateLimiter;
use crate::auth::token_generator::generate_secure_token;
use crate::config::Settings;
use crate::error::AuthError;
use crate::metrics;
use crate::models::{AccessToken, InviteLink, PasswordResetLink, RefreshToken, User};
use crate::storage::CredentialStore;

/// Orchestrates every credential-bearing operation.
///
/// Each method runs to completion between store round trips; the only
/// in-process shared mutable state is the rate limiter's map, which
/// serializes per key. Multi-row writes go through the store's two
/// compound operations and commit or roll back wholesale.
pub struct AuthService<S: CredentialStore> {
    store: Arc<S>,
    tokens: TokenService,
    limiter: LoginRateLimiter,
    settings: Arc<Settings>,
}

impl<S: CredentialStore> AuthService<S> {
    pub fn new(store: Arc<S>, settings: Arc<Settings>) -> Self {
        Self {
            tokens: TokenService::new(&settings.jwt),
            limiter: LoginRateLimiter::new(),
            store,
            settings,
        }
    }

    /// The limiter, for the periodic sweep task.
    pub fn limiter(&self) -> &LoginRateLimiter {
        &self.limiter
    }

    fn attempt_window(&self) -> Duration {
        Duration::from_secs(self.settings.rate_limit.window_secs)
    }

    // ============== invite links ==============

    /// Mint a single-use invite for `email`. Admin authorization happens
    /// at the boundary, not here.
    pub async fn generate_invite(
        &self,
        email: &str,
        created_by: Uuid,
    ) -> Result<InviteLink, AuthError> {
        let invite = InviteLink::new(
            generate_secure_token(),
            email.to_string(),
            Utc::now() + chrono::Duration::days(self.settings.links.invite_ttl_days),
            created_by,
        );
        let invite = self.store.insert_invite(invite).await?;

        counter!(metrics::INVITE_CREATED).increment(1);
        info!(email, "invite link generated");
        Ok(invite)
    }

    /// Classify an invite token. Pure read: a failing link is reported,
    /// never consumed or mutated.
    pub async fn validate_invite(&self, token: &str) -> Result<(), AuthError> {
        let invite = self
            .store
            .find_invite(token)
            .await?
            .ok_or(AuthError::NotFound)?;
        if invite.is_used {
            return Err(AuthError::AlreadyUsed);
        }
        if invite.is_expired() {
            return Err(AuthError::Expired);
        }
        Ok(())
    }

    // ============== registration ==============

    /// Register a new account against a valid invite.
    ///
    /// User creation and invite consumption are one atomic unit in the
    /// store; a failure leaves both untouched.
    pub async fn register(
        &self,
        invite_token: &str,
        email: &str,
        username: &str,
        name: &str,
        mut password: String,
    ) -> Result<User, AuthError> {
        self.validate_invite(invite_token).await?;

        if self.store.identity_taken(email, username).await? {
            return Err(AuthError::DuplicateIdentity);
        }

        let min_length = self.settings.password.min_length;
        if !meets_length_policy(&password, min_length) {
            return Err(AuthError::WeakPassword(min_length));
        }

        let password_hash = hash_password_secure(&mut password)?;
        let user = User::new(
            email.to_string(),
            username.to_string(),
            name.to_string(),
            password_hash,
        );
        let user = self.store.create_user_with_invite(user, invite_token).await?;

        counter!(metrics::USER_REGISTERED).increment(1);
        info!(email, username, "user registered");
        Ok(user)
    }

    // ============== login ==============

    /// Authenticate by email and password under per-identifier rate
    /// limiting.
    ///
    /// A missing account and a wrong password are indistinguishable to
    /// the caller; both record an attempt and return
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(
        &self,
        email: &str,
        mut password: String,
        client_identifier: &str,
    ) -> Result<(AccessToken, RefreshToken), AuthError> {
        let max_attempts = self.settings.rate_limit.max_attempts;
        if !self.limiter.allowed(client_identifier, max_attempts) {
            counter!(metrics::LOGIN_RATE_LIMITED).increment(1);
            warn!(client = client_identifier, "login rate limited");
            return Err(AuthError::RateLimited);
        }

        let user = match self.store.find_user_by_email(email).await? {
            Some(user) => user,
            None => {
                password.zeroize();
                self.limiter
                    .record_attempt(client_identifier, self.attempt_window());
                counter!(metrics::LOGIN_FAILURE).increment(1);
                warn!(client = client_identifier, "login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let verified = verify_password(&user.password_hash, &password);
        password.zeroize();
        if !verified {
            self.limiter
                .record_attempt(client_identifier, self.attempt_window());
            self.store.record_login_failure(user.id).await?;
            counter!(metrics::LOGIN_FAILURE).increment(1);
            warn!(client = client_identifier, "login failed: bad password");
            return Err(AuthError::InvalidCredentials);
        }

        // checked only after the password matched
        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        let access = self.tokens.issue_access_token(&user)?;
        let refresh = self.tokens.issue_refresh_token(user.id);
        let refresh = self.store.insert_refresh_token(refresh).await?;
        self.store.clear_login_failures(user.id).await?;
        self.limiter.reset(client_identifier);

        counter!(metrics::LOGIN_SUCCESS).increment(1);
        info!(email, "user logged in");
        Ok((access, refresh))
    }

    // ============== token refresh ==============

    /// Mint a new access token for the owner of a valid refresh token.
    ///
    /// Returns a replacement refresh token only when rotation is
    /// enabled in the configuration; otherwise the presented token
    /// stays valid until its own expiry or revocation.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<(AccessToken, Option<RefreshToken>), AuthError> {
        let token = self
            .store
            .find_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;
        if !token.is_valid() {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let user = self
            .store
            .find_user_by_id(token.user_id)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        let access = self.tokens.issue_access_token(&user)?;

        let rotated = if self.settings.links.rotate_refresh_tokens {
            self.store.revoke_refresh_token(token.id).await?;
            let replacement = self.tokens.issue_refresh_token(user.id);
            Some(self.store.insert_refresh_token(replacement).await?)
        } else {
            None
        };

        counter!(metrics::TOKEN_REFRESHED).increment(1);
        info!(email = %user.email, "access token refreshed");
        Ok((access, rotated))
    }

    // ============== password reset ==============

    /// Mint a time-boxed reset link for `user_id` (admin-triggered).
    pub async fn generate_password_reset(
        &self,
        user_id: Uuid,
    ) -> Result<PasswordResetLink, AuthError> {
        let link = PasswordResetLink::new(
            generate_secure_token(),
            user_id,
            Utc::now() + chrono::Duration::hours(self.settings.links.reset_ttl_hours),
        );
        let link = self.store.insert_reset_link(link).await?;

        counter!(metrics::RESET_CREATED).increment(1);
        info!(user_id = %user_id, "password reset link generated");
        Ok(link)
    }

    /// Consume a reset link and store a new password hash as one atomic
    /// unit.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        mut new_password: String,
    ) -> Result<(), AuthError> {
        let link = self
            .store
            .find_reset_link(reset_token)
            .await?
            .ok_or(AuthError::NotFound)?;
        if link.is_used {
            return Err(AuthError::AlreadyUsed);
        }
        if link.is_expired() {
            return Err(AuthError::Expired);
        }

        let min_length = self.settings.password.min_length;
        if !meets_length_policy(&new_password, min_length) {
            return Err(AuthError::WeakPassword(min_length));
        }

        let new_hash = hash_password_secure(&mut new_password)?;
        self.store
            .apply_password_reset(link.id, link.user_id, &new_hash)
            .await?;

        counter!(metrics::RESET_COMPLETED).increment(1);
        info!(user_id = %link.user_id, "password reset completed");
        Ok(())
    }

    // ============== bearer authentication ==============

    /// Resolve a bearer access token to its active account.
    ///
    /// Full verification: signature, expiry, issuer, and audience.
    pub async fn authenticate(&self, bearer: &str) -> Result<User, AuthError> {
        let claims = self.tokens.decode(bearer)?;
        let user = self
            .store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;
        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }
        Ok(user)
    }
}
