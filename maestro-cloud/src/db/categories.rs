//! Category Repository
//!
//! Every query is scoped by `restaurant_id`; an id from another tenant
//! behaves exactly like a missing row.

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate, SortOrderItem};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, restaurant_id, name, is_visible, sort_order, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM categories WHERE restaurant_id = ? ORDER BY sort_order, id"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_visible(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM categories WHERE restaurant_id = ? AND is_visible = 1 \
         ORDER BY sort_order, id"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM categories WHERE id = ? AND restaurant_id = ?"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Create a category. Without an explicit `sort_order` it goes last.
pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: &CategoryCreate,
    now: i64,
) -> RepoResult<Category> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO categories \
         (restaurant_id, name, is_visible, sort_order, created_at, updated_at) \
         VALUES (?1, ?2, ?3, COALESCE(?4, (SELECT COALESCE(MAX(sort_order) + 1, 0) \
         FROM categories WHERE restaurant_id = ?1)), ?5, ?5) RETURNING id",
    )
    .bind(restaurant_id)
    .bind(data.name.trim())
    .bind(data.is_visible.unwrap_or(true))
    .bind(data.sort_order)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: &CategoryUpdate,
    now: i64,
) -> RepoResult<Category> {
    let rows = sqlx::query(
        "UPDATE categories SET name = COALESCE(?1, name), is_visible = COALESCE(?2, is_visible), \
         sort_order = COALESCE(?3, sort_order), updated_at = ?4 \
         WHERE id = ?5 AND restaurant_id = ?6",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.is_visible)
    .bind(data.sort_order)
    .bind(now)
    .bind(id)
    .bind(restaurant_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Hard delete; items and scheduled discounts of the category cascade
pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM categories WHERE id = ? AND restaurant_id = ?")
        .bind(id)
        .bind(restaurant_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    Ok(())
}

/// Apply a batch of sort positions atomically. Any unknown id aborts the
/// whole batch.
pub async fn reorder(
    pool: &SqlitePool,
    restaurant_id: i64,
    items: &[SortOrderItem],
    now: i64,
) -> RepoResult<Vec<Category>> {
    let mut tx = pool.begin().await?;
    for item in items {
        let rows = sqlx::query(
            "UPDATE categories SET sort_order = ?, updated_at = ? \
             WHERE id = ? AND restaurant_id = ?",
        )
        .bind(item.sort_order)
        .bind(now)
        .bind(item.id)
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;
        if rows.rows_affected() == 0 {
            // tx dropped here, rolls back
            return Err(RepoError::NotFound(format!("Category {} not found", item.id)));
        }
    }
    tx.commit().await?;

    find_all(pool, restaurant_id).await
}
