// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Request handlers for the auth endpoints.
//!
//! Handlers validate input shape, extract the caller's identity where
//! required, and delegate to [`crate::auth::AuthService`]. Status codes: 201 for
//! resource creation, 400 for link/policy failures, 401 for credential
//! failures, 429 when rate limited.
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;

use healthdiary_common::{
    GenerateInviteRequest, GenerateResetRequest, InviteResponse, InviteValidationResponse,
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    RegisterResponse, ResetConfirmRequest, ResetLinkResponse,
};

use crate::error::AuthError;
use crate::middleware::{client_identifier, require_admin};
use crate::storage::CredentialStore;
use crate::validation;
use crate::AppState;

/// `POST /api/auth/register`
pub async fn register<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    validation::validate_token(&req.invite_token)?;
    validation::validate_email(&req.email)?;
    validation::validate_username(&req.username)?;
    validation::validate_name(&req.name)?;

    let user = state
        .auth
        .register(
            &req.invite_token,
            &req.email,
            &req.username,
            &req.name,
            req.password,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ValidateInviteQuery {
    token: String,
}

/// `GET /api/auth/invite/validate?token=`
pub async fn validate_invite<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ValidateInviteQuery>,
) -> Result<Json<InviteValidationResponse>, AuthError> {
    validation::validate_token(&query.token)?;
    state.auth.validate_invite(&query.token).await?;
    Ok(Json(InviteValidationResponse { valid: true }))
}

/// `POST /api/auth/login`
pub async fn login<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let client = client_identifier(&headers);
    let (access, refresh) = state.auth.login(&req.email, req.password, client).await?;

    Ok(Json(LoginResponse {
        access_token: access.jwt,
        access_token_expires_at: access.expires_at,
        refresh_token: refresh.token,
        refresh_token_expires_at: refresh.expires_at,
    }))
}

/// `POST /api/auth/token/refresh`
pub async fn refresh_token<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AuthError> {
    let (access, rotated) = state.auth.refresh_access_token(&req.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: access.jwt,
        expires_at: access.expires_at,
        refresh_token: rotated.as_ref().map(|t| t.token.clone()),
        refresh_token_expires_at: rotated.map(|t| t.expires_at),
    }))
}

/// `POST /api/auth/admin/invite`
pub async fn generate_invite<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<GenerateInviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), AuthError> {
    let admin = require_admin(&state, &headers).await?;
    validation::validate_email(&req.email)?;

    let invite = state.auth.generate_invite(&req.email, admin.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            id: invite.id,
            token: invite.token,
            email: invite.email,
            expires_at: invite.expires_at,
        }),
    ))
}

/// `POST /api/auth/admin/password-reset`
pub async fn generate_password_reset<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<GenerateResetRequest>,
) -> Result<Json<ResetLinkResponse>, AuthError> {
    require_admin(&state, &headers).await?;

    let link = state.auth.generate_password_reset(req.user_id).await?;
    Ok(Json(ResetLinkResponse {
        token: link.token,
        expires_at: link.expires_at,
    }))
}

/// `POST /api/auth/password-reset/confirm`
pub async fn confirm_password_reset<S: CredentialStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ResetConfirmRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    validation::validate_token(&req.reset_token)?;
    state
        .auth
        .reset_password(&req.reset_token, req.new_password)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Password reset successful"
    })))
}
