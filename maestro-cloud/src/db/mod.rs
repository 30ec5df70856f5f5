//! Database Module
//!
//! SQLite connection pool, migrations and per-table repositories.
//! Repositories are free functions over `&SqlitePool` (or a transaction
//! for replace-all writes) returning [`RepoResult`].

pub mod banners;
pub mod categories;
pub mod menu_items;
pub mod restaurants;
pub mod scheduled_discounts;
pub mod sessions;
pub mod unavailable_ingredients;

use shared::error::{AppError, ErrorCode};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use thiserror::Error;

use crate::BoxError;

/// Database service, owns the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database at `url` with WAL and foreign keys, then migrate
    pub async fn new(url: &str) -> Result<Self, BoxError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    /// Private in-memory database, migrated. A single long-lived connection
    /// keeps the data alive for the lifetime of the pool.
    pub async fn in_memory() -> Result<Self, BoxError> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:")?.pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        if let sqlx::Error::RowNotFound = err {
            return RepoError::NotFound("row".into());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => {
                AppError::new(ErrorCode::NotFound).with_detail("resource", what)
            }
            RepoError::Duplicate(_) => AppError::new(ErrorCode::AlreadyExists),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub async fn pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    /// Insert a bare active restaurant and return its id
    pub async fn restaurant(pool: &SqlitePool, slug: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO restaurants (slug, name, hashed_password, created_at, updated_at) \
             VALUES (?, ?, 'x', 0, 0) RETURNING id",
        )
        .bind(slug)
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    pub async fn category(pool: &SqlitePool, restaurant_id: i64, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO categories (restaurant_id, name, created_at, updated_at) \
             VALUES (?, ?, 0, 0) RETURNING id",
        )
        .bind(restaurant_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
    }
}
