//! Service configuration

use crate::BoxError;
use std::path::PathBuf;

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Session lifetime in hours
    pub session_ttl_hours: i64,
    /// Root directory for per-restaurant uploads
    pub uploads_dir: PathBuf,
    /// Argon2 PHC hash of the superadmin password. `None` disables superadmin login.
    pub admin_password_hash: Option<String>,
    /// Add `Secure` to the session cookie
    pub cookie_secure: bool,
    /// Behind a reverse proxy that sets `X-Forwarded-For`
    pub trust_proxy: bool,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_dev = environment == "development";

        let session_ttl_hours = match std::env::var("SESSION_TTL_HOURS") {
            Ok(v) => v
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .ok_or_else(|| format!("SESSION_TTL_HOURS must be a positive integer, got {v:?}"))?,
            Err(_) => 24,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:maestro.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            session_ttl_hours,
            uploads_dir: std::env::var("UPLOADS_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            admin_password_hash: std::env::var("ADMIN_PASSWORD_HASH")
                .ok()
                .filter(|s| !s.is_empty()),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .ok()
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(!is_dev),
            trust_proxy: std::env::var("TRUST_PROXY")
                .ok()
                .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes")),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
