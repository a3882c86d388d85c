// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use zeroize::Zeroize;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password using Argon2id with a per-password random salt.
///
/// Returns the PHC string, which embeds algorithm parameters and salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored PHC hash string.
///
/// An unparseable hash verifies as false rather than erroring; the
/// login path must not distinguish corrupt rows from wrong passwords.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Check the password policy: at least [`MIN_PASSWORD_LENGTH`] characters
/// and not blank.
pub fn meets_length_policy(password: &str, min_length: usize) -> bool {
    !password.trim().is_empty() && password.chars().count() >= min_length
}

/// Hash a password and zeroize the plaintext buffer afterwards.
pub fn hash_password_secure(plain: &mut String) -> anyhow::Result<String> {
    let hash = hash_password(plain);
    plain.zeroize();
    hash
}
