// ================
// crates/common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the `HealthDiary` client and server.
//! This module defines the request/response bodies of the auth API.
//!
//! Everything here serializes camelCase, matching what the web client
//! reads (`accessToken`, `accessTokenExpiresAt`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Single-use invite token gating the registration
    pub invite_token: String,
    pub email: String,
    pub username: String,
    pub name: String,
    pub password: String,
}

/// Response to a successful registration
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
}

/// Request body for login
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token bundle returned on successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed short-lived access token
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    /// Opaque long-lived refresh token
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Request body for minting a new access token
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response to a token refresh
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    /// Replacement refresh token, present only when the server is
    /// configured to rotate refresh tokens on use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

/// Response to invite validation
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InviteValidationResponse {
    pub valid: bool,
}

/// Request body for invite generation (admin)
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInviteRequest {
    /// Email address the invite is addressed to
    pub email: String,
}

/// Response to invite generation
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub id: Uuid,
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Request body for password-reset link generation (admin)
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResetRequest {
    pub user_id: Uuid,
}

/// Response to password-reset link generation
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResetLinkResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Request body for confirming a password reset
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResetConfirmRequest {
    pub reset_token: String,
    pub new_password: String,
}

/// Error body returned by every endpoint on failure
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
