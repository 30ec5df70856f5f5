//! Restaurant Repository

use super::{RepoError, RepoResult};
use shared::models::{Restaurant, RestaurantStatus, ThemeUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, slug, name, hashed_password, status, owner_id, is_demo, \
                       currency_code, timezone, theme_id, logo, created_at, updated_at";

/// Insert payload (password already hashed)
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub slug: String,
    pub name: String,
    pub hashed_password: String,
    pub owner_id: Option<String>,
    pub is_demo: bool,
    pub currency_code: Option<String>,
    pub timezone: Option<String>,
    pub theme_id: Option<String>,
}

/// Superadmin patch (password already hashed)
#[derive(Debug, Clone, Default)]
pub struct RestaurantPatch {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub hashed_password: Option<String>,
    pub status: Option<RestaurantStatus>,
    pub owner_id: Option<Option<String>>,
    pub is_demo: Option<bool>,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Restaurant>> {
    let rows = sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {COLUMNS} FROM restaurants ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {COLUMNS} FROM restaurants WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Restaurant>> {
    let row = sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {COLUMNS} FROM restaurants WHERE slug = ? LIMIT 1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: NewRestaurant, now: i64) -> RepoResult<Restaurant> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO restaurants (slug, name, hashed_password, status, owner_id, is_demo, \
         currency_code, timezone, theme_id, created_at, updated_at) \
         VALUES (?, ?, ?, 'active', ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.slug)
    .bind(&data.name)
    .bind(&data.hashed_password)
    .bind(&data.owner_id)
    .bind(data.is_demo)
    .bind(&data.currency_code)
    .bind(&data.timezone)
    .bind(&data.theme_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create restaurant".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: RestaurantPatch,
    now: i64,
) -> RepoResult<Restaurant> {
    let owner_set = data.owner_id.is_some();
    let rows = sqlx::query(
        "UPDATE restaurants SET \
         slug = COALESCE(?1, slug), \
         name = COALESCE(?2, name), \
         hashed_password = COALESCE(?3, hashed_password), \
         status = COALESCE(?4, status), \
         owner_id = CASE WHEN ?5 THEN ?6 ELSE owner_id END, \
         is_demo = COALESCE(?7, is_demo), \
         updated_at = ?8 \
         WHERE id = ?9",
    )
    .bind(data.slug)
    .bind(data.name)
    .bind(data.hashed_password)
    .bind(data.status)
    .bind(owner_set)
    .bind(data.owner_id.flatten())
    .bind(data.is_demo)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Restaurant {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant {id} not found")))
}

/// Apply a theme/currency/timezone patch. `Some(None)` resets a field to NULL.
pub async fn update_theme(
    pool: &SqlitePool,
    id: i64,
    data: &ThemeUpdate,
    now: i64,
) -> RepoResult<Restaurant> {
    let rows = sqlx::query(
        "UPDATE restaurants SET \
         theme_id = CASE WHEN ?1 THEN ?2 ELSE theme_id END, \
         currency_code = CASE WHEN ?3 THEN ?4 ELSE currency_code END, \
         timezone = CASE WHEN ?5 THEN ?6 ELSE timezone END, \
         updated_at = ?7 \
         WHERE id = ?8",
    )
    .bind(data.theme_id.is_some())
    .bind(data.theme_id.clone().flatten())
    .bind(data.currency_code.is_some())
    .bind(data.currency_code.clone().flatten())
    .bind(data.timezone.is_some())
    .bind(data.timezone.clone().flatten())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Restaurant {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant {id} not found")))
}

/// Point the restaurant at a new logo file, returning the previous one
pub async fn set_logo(
    pool: &SqlitePool,
    id: i64,
    logo: &str,
    now: i64,
) -> RepoResult<Option<String>> {
    let mut tx = pool.begin().await?;

    let previous = sqlx::query_scalar::<_, Option<String>>(
        "SELECT logo FROM restaurants WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Restaurant {id} not found")))?;

    sqlx::query("UPDATE restaurants SET logo = ?, updated_at = ? WHERE id = ?")
        .bind(logo)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(previous)
}

pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    status: RestaurantStatus,
    now: i64,
) -> RepoResult<Restaurant> {
    update(
        pool,
        id,
        RestaurantPatch {
            status: Some(status),
            ..Default::default()
        },
        now,
    )
    .await
}
