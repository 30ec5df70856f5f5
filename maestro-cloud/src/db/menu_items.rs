//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::SqlitePool;
use sqlx::types::Json;

const COLUMNS: &str = "id, restaurant_id, category_id, name, description, price, discount, \
     is_available, allergens, dietary, prep_time_minutes, ingredients, image, sort_order, \
     created_at, updated_at";

pub async fn find_all(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<MenuItem>> {
    let rows = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_items WHERE restaurant_id = ? \
         ORDER BY category_id, sort_order, id"
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
) -> RepoResult<Option<MenuItem>> {
    let row = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_items WHERE id = ? AND restaurant_id = ?"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

async fn category_belongs(
    conn: &mut sqlx::SqliteConnection,
    restaurant_id: i64,
    category_id: i64,
) -> RepoResult<()> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT id FROM categories WHERE id = ? AND restaurant_id = ?")
            .bind(category_id)
            .bind(restaurant_id)
            .fetch_optional(&mut *conn)
            .await?;
    found
        .map(|_| ())
        .ok_or_else(|| RepoError::NotFound(format!("Category {category_id} not found")))
}

/// Create an item. The category must belong to the same restaurant.
pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: &MenuItemCreate,
    now: i64,
) -> RepoResult<MenuItem> {
    let mut tx = pool.begin().await?;
    category_belongs(&mut tx, restaurant_id, data.category_id).await?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO menu_items (restaurant_id, category_id, name, description, price, discount, \
         is_available, allergens, dietary, prep_time_minutes, ingredients, image, sort_order, \
         created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, \
         COALESCE(?13, (SELECT COALESCE(MAX(sort_order) + 1, 0) \
         FROM menu_items WHERE category_id = ?2)), \
         ?14, ?14) RETURNING id",
    )
    .bind(restaurant_id)
    .bind(data.category_id)
    .bind(data.name.trim())
    .bind(data.description.as_deref())
    .bind(data.price)
    .bind(data.discount)
    .bind(data.is_available.unwrap_or(true))
    .bind(Json(&data.allergens))
    .bind(Json(&data.dietary))
    .bind(data.prep_time_minutes)
    .bind(Json(&data.ingredients))
    .bind(data.image.as_deref())
    .bind(data.sort_order)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

/// Partial update. Nullable columns use a presence flag so `null` clears them.
pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: &MenuItemUpdate,
    now: i64,
) -> RepoResult<MenuItem> {
    let mut tx = pool.begin().await?;
    if let Some(category_id) = data.category_id {
        category_belongs(&mut tx, restaurant_id, category_id).await?;
    }

    let rows = sqlx::query(
        "UPDATE menu_items SET \
         category_id = COALESCE(?1, category_id), \
         name = COALESCE(?2, name), \
         description = CASE WHEN ?3 THEN ?4 ELSE description END, \
         price = COALESCE(?5, price), \
         discount = CASE WHEN ?6 THEN ?7 ELSE discount END, \
         is_available = COALESCE(?8, is_available), \
         allergens = COALESCE(?9, allergens), \
         dietary = COALESCE(?10, dietary), \
         prep_time_minutes = CASE WHEN ?11 THEN ?12 ELSE prep_time_minutes END, \
         ingredients = COALESCE(?13, ingredients), \
         image = CASE WHEN ?14 THEN ?15 ELSE image END, \
         sort_order = COALESCE(?16, sort_order), \
         updated_at = ?17 \
         WHERE id = ?18 AND restaurant_id = ?19",
    )
    .bind(data.category_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.description.is_some())
    .bind(data.description.clone().flatten())
    .bind(data.price)
    .bind(data.discount.is_some())
    .bind(data.discount.flatten())
    .bind(data.is_available)
    .bind(data.allergens.as_ref().map(Json))
    .bind(data.dietary.as_ref().map(Json))
    .bind(data.prep_time_minutes.is_some())
    .bind(data.prep_time_minutes.flatten())
    .bind(data.ingredients.as_ref().map(Json))
    .bind(data.image.is_some())
    .bind(data.image.clone().flatten())
    .bind(data.sort_order)
    .bind(now)
    .bind(id)
    .bind(restaurant_id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    tx.commit().await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM menu_items WHERE id = ? AND restaurant_id = ?")
        .bind(id)
        .bind(restaurant_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    Ok(())
}
