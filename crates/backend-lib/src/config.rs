// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Signed/opaque token parameters
    pub jwt: JwtSettings,
    /// Login attempt limiting
    pub rate_limit: RateLimitSettings,
    /// Password policy
    pub password: PasswordSettings,
    /// Invite and reset link lifetimes
    pub links: LinkSettings,
    /// Optional admin account seeded into an empty store at startup
    pub bootstrap: Option<BootstrapAdmin>,
}

/// Token parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    /// Symmetric signing key
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_ttl_days: i64,
}

/// Login attempt limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Attempts allowed per window
    pub max_attempts: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

/// Password policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordSettings {
    /// Minimum password length
    pub min_length: usize,
}

/// Invite and reset link lifetimes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSettings {
    /// Invite link lifetime in days
    pub invite_ttl_days: i64,
    /// Password-reset link lifetime in hours
    pub reset_ttl_hours: i64,
    /// Whether a refresh token is replaced each time it is used.
    /// Off by default: a refresh token stays valid until its own
    /// expiry or revocation.
    pub rotate_refresh_tokens: bool,
}

/// Admin account seeded when the store is empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            log_level: "info".to_string(),
            jwt: JwtSettings::default(),
            rate_limit: RateLimitSettings::default(),
            password: PasswordSettings::default(),
            links: LinkSettings::default(),
            bootstrap: None,
        }
    }
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: "dev-secret-change-in-production".to_string(),
            issuer: "HealthDiary".to_string(),
            audience: "HealthDiaryUsers".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_secs: 60,
        }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            invite_ttl_days: 7,
            reset_ttl_hours: 1,
            rotate_refresh_tokens: false,
        }
    }
}

impl Settings {
    /// Load settings: defaults, then `config/default.toml`, then a
    /// deployment-local `config.toml`, then `HEALTHDIARY_`-prefixed
    /// environment variables.
    pub fn load() -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("HEALTHDIARY_").split("__"))
            .extract()?;
        Ok(settings)
    }

    /// Load settings from an explicit config file path.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("HEALTHDIARY_").split("__"))
            .extract()?;
        Ok(settings)
    }
}
