//! Session Repository
//!
//! One row per issued token. A token is only honoured while its row
//! exists and `expires_at` is in the future.

use super::RepoResult;
use sqlx::SqlitePool;

pub async fn create(
    pool: &SqlitePool,
    id: &str,
    restaurant_id: Option<i64>,
    is_admin: bool,
    created_at: i64,
    expires_at: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO sessions (id, restaurant_id, is_admin, created_at, expires_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(is_admin)
    .bind(created_at)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn is_valid(pool: &SqlitePool, id: &str, now: i64) -> RepoResult<bool> {
    let found: Option<String> =
        sqlx::query_scalar("SELECT id FROM sessions WHERE id = ? AND expires_at > ?")
            .bind(id)
            .bind(now)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Revoke every session of a tenant
pub async fn delete_for_restaurant(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM sessions WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_expired(pool: &SqlitePool, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn validity_follows_row_and_expiry() {
        let pool = test_support::pool().await;
        let rid = test_support::restaurant(&pool, "r1").await;

        create(&pool, "s1", Some(rid), false, 0, 100).await.unwrap();
        assert!(is_valid(&pool, "s1", 99).await.unwrap());
        assert!(!is_valid(&pool, "s1", 100).await.unwrap());

        delete(&pool, "s1").await.unwrap();
        assert!(!is_valid(&pool, "s1", 0).await.unwrap());
        // deleting twice is fine
        delete(&pool, "s1").await.unwrap();
    }

    #[tokio::test]
    async fn revoke_and_sweep() {
        let pool = test_support::pool().await;
        let rid = test_support::restaurant(&pool, "r1").await;
        create(&pool, "a", Some(rid), false, 0, 1_000).await.unwrap();
        create(&pool, "b", Some(rid), false, 0, 1_000).await.unwrap();
        create(&pool, "admin", None, true, 0, 10).await.unwrap();

        assert_eq!(delete_for_restaurant(&pool, rid).await.unwrap(), 2);
        assert_eq!(delete_expired(&pool, 10).await.unwrap(), 1);
    }
}
