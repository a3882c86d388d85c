// ============================
// crates/backend-lib/src/auth/jwt.rs
// ============================
//! Signed access tokens and opaque refresh tokens.
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::token_generator::generate_refresh_token;
use crate::config::JwtSettings;
use crate::error::AuthError;
use crate::models::{AccessToken, RefreshToken, User};

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    pub email: String,
    pub username: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Mints and verifies the two token kinds.
///
/// Access tokens are HS256-signed JWTs; refresh tokens are opaque
/// random strings whose state lives in the credential store. The
/// service itself persists nothing.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            access_ttl: Duration::minutes(settings.access_ttl_minutes),
            refresh_ttl: Duration::days(settings.refresh_ttl_days),
        }
    }

    /// Build and sign a fresh access token for `user`.
    pub fn issue_access_token(&self, user: &User) -> Result<AccessToken, AuthError> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let jwt = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))?;

        Ok(AccessToken {
            jwt,
            user_id: user.id,
            expires_at,
        })
    }

    /// Mint an opaque refresh token for `user_id`. The caller persists it.
    pub fn issue_refresh_token(&self, user_id: Uuid) -> RefreshToken {
        RefreshToken::new(
            generate_refresh_token(),
            user_id,
            Utc::now() + self.refresh_ttl,
        )
    }

    /// Verify signature, expiry, issuer, and audience.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AuthError::InvalidOrExpiredToken
                }
                _ => AuthError::InvalidSignature,
            })
    }

    /// Verify the signature only, ignoring expiry.
    ///
    /// Used to extract an identity from a token that may already have
    /// lapsed. Algorithm or signature mismatch fails; a lapsed `exp`
    /// does not.
    pub fn decode_expired(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidSignature)
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> JwtSettings {
        JwtSettings {
            secret: "unit-test-secret-key".to_string(),
            issuer: "HealthDiary".to_string(),
            audience: "HealthDiaryUsers".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
        }
    }

    fn test_user() -> User {
        User::new(
            "a@x.com".into(),
            "alice".into(),
            "Alice".into(),
            "hash".into(),
        )
    }

    #[test]
    fn test_issue_and_decode_roundtrip() {
        let service = TokenService::new(&test_settings());
        let user = test_user();

        let access = service.issue_access_token(&user).unwrap();
        let claims = service.decode(&access.jwt).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp, access.expires_at.timestamp());
    }

    #[test]
    fn test_access_token_expiry_is_fifteen_minutes() {
        let service = TokenService::new(&test_settings());
        let access = service.issue_access_token(&test_user()).unwrap();

        let ttl = access.expires_at - Utc::now();
        assert!(ttl <= Duration::minutes(15));
        assert!(ttl > Duration::minutes(14));
    }

    #[test]
    fn test_decode_rejects_foreign_signature() {
        let service = TokenService::new(&test_settings());
        let other = TokenService::new(&JwtSettings {
            secret: "a-different-secret".to_string(),
            ..test_settings()
        });

        let access = other.issue_access_token(&test_user()).unwrap();
        assert!(matches!(
            service.decode(&access.jwt),
            Err(AuthError::InvalidSignature)
        ));
        assert!(matches!(
            service.decode_expired(&access.jwt),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_decode_expired_ignores_lapsed_exp() {
        let settings = test_settings();
        let service = TokenService::new(&settings);
        let user = test_user();

        // Sign claims that expired an hour ago, outside any leeway
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            iss: settings.issuer.clone(),
            aud: settings.audience.clone(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let jwt = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(settings.secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.decode(&jwt),
            Err(AuthError::InvalidOrExpiredToken)
        ));

        let recovered = service.decode_expired(&jwt).unwrap();
        assert_eq!(recovered.sub, user.id);
    }

    #[test]
    fn test_refresh_token_expiry_is_seven_days() {
        let service = TokenService::new(&test_settings());
        let refresh = service.issue_refresh_token(Uuid::new_v4());

        let ttl = refresh.expires_at - Utc::now();
        assert!(ttl <= Duration::days(7));
        assert!(ttl > Duration::days(6));
        assert!(refresh.is_valid());
    }
}
