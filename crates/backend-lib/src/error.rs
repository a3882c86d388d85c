// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use healthdiary_common::ErrorBody;
use thiserror::Error;

/// Authentication error taxonomy.
///
/// Every variant is recoverable at the request boundary; none is
/// process-fatal. Token-state checks fail closed: an ambiguous link is
/// reported with the first failing predicate, never consumed.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Link not found")]
    NotFound,

    #[error("Link has already been used")]
    AlreadyUsed,

    #[error("Link has expired")]
    Expired,

    #[error("Email or username already in use")]
    DuplicateIdentity,

    #[error("Password must be at least {0} characters long")]
    WeakPassword(usize),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Too many login attempts. Please try again later.")]
    RateLimited,

    #[error("User account is disabled")]
    AccountDisabled,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Admin privileges required")]
    Forbidden,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotFound
            | AuthError::AlreadyUsed
            | AuthError::Expired
            | AuthError::DuplicateIdentity
            | AuthError::WeakPassword(_)
            | AuthError::UserNotFound
            | AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::AccountDisabled
            | AuthError::InvalidOrExpiredToken
            | AuthError::InvalidSignature => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotFound => "LINK_001",
            AuthError::AlreadyUsed => "LINK_002",
            AuthError::Expired => "LINK_003",
            AuthError::DuplicateIdentity => "REG_001",
            AuthError::WeakPassword(_) => "REG_002",
            AuthError::InvalidCredentials => "AUTH_001",
            AuthError::RateLimited => "AUTH_002",
            AuthError::AccountDisabled => "AUTH_003",
            AuthError::Forbidden => "AUTH_004",
            AuthError::InvalidOrExpiredToken => "TOKEN_001",
            AuthError::InvalidSignature => "TOKEN_002",
            AuthError::UserNotFound => "USER_001",
            AuthError::InvalidInput(_) => "VAL_001",
            AuthError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AuthError::Internal(_) => "An internal server error occurred".to_string(),
            // Everything else already discloses nothing the caller
            // didn't present; account existence stays behind the
            // generic credentials message.
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = ErrorBody {
            code: self.error_code().to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<String> for AuthError {
    fn from(msg: String) -> Self {
        AuthError::Internal(msg)
    }
}

impl From<&str> for AuthError {
    fn from(msg: &str) -> Self {
        AuthError::Internal(msg.to_string())
    }
}
