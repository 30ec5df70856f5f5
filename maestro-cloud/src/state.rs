//! Application state for maestro-cloud

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::BoxError;
use crate::auth::rate_limit::RateLimiter;
use crate::auth::session::SessionKeys;
use crate::config::Config;
use crate::db::DbService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Session token signing keys
    pub keys: Arc<SessionKeys>,
    /// Session lifetime in hours
    pub session_ttl_hours: i64,
    /// Superadmin password hash (argon2 PHC)
    pub admin_password_hash: Option<Arc<str>>,
    /// Add `Secure` to the session cookie
    pub cookie_secure: bool,
    /// Root directory for per-restaurant uploads
    pub uploads_dir: PathBuf,
    /// Rate limiter for the login route
    pub rate_limiter: RateLimiter,
    /// Key the rate limiter on `X-Forwarded-For` instead of the peer address
    pub trust_proxy: bool,
}

impl AppState {
    /// Open the database, apply migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_url).await?;
        std::fs::create_dir_all(&config.uploads_dir)?;
        Ok(Self::with_pool(db.pool, config))
    }

    /// Build the state around an already migrated pool
    pub fn with_pool(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            keys: Arc::new(SessionKeys::new(&config.jwt_secret)),
            session_ttl_hours: config.session_ttl_hours,
            admin_password_hash: config.admin_password_hash.as_deref().map(Arc::from),
            cookie_secure: config.cookie_secure,
            uploads_dir: config.uploads_dir.clone(),
            rate_limiter: RateLimiter::new(),
            trust_proxy: config.trust_proxy,
        }
    }
}
