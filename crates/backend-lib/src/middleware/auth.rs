// ============================
// crates/backend-lib/src/middleware/auth.rs
// ============================
//! Caller identity extraction: client identifier and bearer tokens.
use axum::http::{header, HeaderMap};

use crate::error::AuthError;
use crate::models::User;
use crate::storage::CredentialStore;
use crate::AppState;

/// The per-client identifier used for login rate limiting.
///
/// Taken from `x-real-ip`, which the reverse proxy sets. Clients that
/// arrive without one share the "unknown" bucket.
pub fn client_identifier(headers: &HeaderMap) -> &str {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
}

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidOrExpiredToken)
}

/// Authenticate the caller and require the admin flag.
pub async fn require_admin<S: CredentialStore>(
    state: &AppState<S>,
    headers: &HeaderMap,
) -> Result<User, AuthError> {
    let user = state.auth.authenticate(bearer_token(headers)?).await?;
    if !user.is_admin {
        return Err(AuthError::Forbidden);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_identifier_prefers_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(client_identifier(&headers), "203.0.113.9");
    }

    #[test]
    fn test_client_identifier_falls_back_to_unknown() {
        assert_eq!(client_identifier(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        assert!(bearer_token(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert!(bearer_token(&headers).is_err());
    }
}
