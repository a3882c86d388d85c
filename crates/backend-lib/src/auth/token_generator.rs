// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
//! Secure token generation for invite, reset, and refresh tokens.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// Default token size in bytes (32 bytes = 256 bits of entropy)
const DEFAULT_TOKEN_BYTES: usize = 32;

/// Refresh tokens carry double the entropy: they live for days, not minutes
const REFRESH_TOKEN_BYTES: usize = 64;

/// Generate a cryptographically secure random token.
///
/// Used for invite and password-reset links. Collisions are treated as
/// negligible-probability and not handled.
pub fn generate_secure_token() -> String {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/// Generate an opaque refresh token (64 bytes of entropy).
pub fn generate_refresh_token() -> String {
    generate_secure_token_with_size(REFRESH_TOKEN_BYTES)
}

/// Generate a cryptographically secure random token of `bytes` bytes,
/// encoded as a URL-safe base64 string without padding.
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
