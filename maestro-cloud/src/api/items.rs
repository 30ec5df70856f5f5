//! Menu item management (tenant)

use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::SqlitePool;

use super::{ApiResult, ValidJson, not_found_as, tenant_scope};
use crate::auth::Session;
use crate::db;
use crate::pricing::{validate_percent, validate_price};
use crate::state::AppState;
use crate::util::now_millis;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
    validate_text_list,
};

/// One day; anything longer is a data entry mistake
const MAX_PREP_TIME_MINUTES: u32 = 24 * 60;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/restaurants/{slug}/items", get(list).post(create))
        .route("/api/restaurants/{slug}/items/{id}", patch(update).delete(delete))
}

fn validate_prep_time(value: Option<u32>) -> Result<(), AppError> {
    match value {
        Some(m) if m > MAX_PREP_TIME_MINUTES => Err(AppError::invalid_field(
            "prep_time_minutes",
            format!("Máximo {MAX_PREP_TIME_MINUTES} minutos"),
        )),
        _ => Ok(()),
    }
}

fn validate_create(req: &MenuItemCreate) -> Result<(), AppError> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&req.description, "description", MAX_NOTE_LEN)?;
    validate_price("price", req.price)?;
    if let Some(d) = req.discount {
        validate_percent("discount", d)?;
    }
    validate_text_list(&req.allergens, "allergens")?;
    validate_text_list(&req.ingredients, "ingredients")?;
    validate_prep_time(req.prep_time_minutes)?;
    validate_optional_text(&req.image, "image", MAX_URL_LEN)?;
    Ok(())
}

fn validate_update(req: &MenuItemUpdate) -> Result<(), AppError> {
    if let Some(name) = &req.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(description) = &req.description {
        validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    }
    if let Some(price) = req.price {
        validate_price("price", price)?;
    }
    if let Some(Some(d)) = req.discount {
        validate_percent("discount", d)?;
    }
    if let Some(allergens) = &req.allergens {
        validate_text_list(allergens, "allergens")?;
    }
    if let Some(ingredients) = &req.ingredients {
        validate_text_list(ingredients, "ingredients")?;
    }
    if let Some(prep) = req.prep_time_minutes {
        validate_prep_time(prep)?;
    }
    if let Some(image) = &req.image {
        validate_optional_text(image, "image", MAX_URL_LEN)?;
    }
    Ok(())
}

async fn ensure_category(
    pool: &SqlitePool,
    restaurant_id: i64,
    category_id: i64,
) -> Result<(), AppError> {
    match db::categories::find_by_id(pool, restaurant_id, category_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::new(ErrorCode::CategoryNotFound).with_detail("field", "category_id")),
    }
}

/// GET /api/restaurants/{slug}/items
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> ApiResult<Vec<MenuItem>> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    Ok(Json(db::menu_items::find_all(&state.pool, restaurant_id).await?))
}

/// POST /api/restaurants/{slug}/items
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    ValidJson(req): ValidJson<MenuItemCreate>,
) -> ApiResult<MenuItem> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    validate_create(&req)?;
    ensure_category(&state.pool, restaurant_id, req.category_id).await?;

    let item = db::menu_items::create(&state.pool, restaurant_id, &req, now_millis())
        .await
        .map_err(not_found_as(ErrorCode::CategoryNotFound))?;
    tracing::info!(slug = %slug, item_id = item.id, "Menu item created");
    Ok(Json(item))
}

/// PATCH /api/restaurants/{slug}/items/{id}
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path((slug, id)): Path<(String, i64)>,
    ValidJson(req): ValidJson<MenuItemUpdate>,
) -> ApiResult<MenuItem> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    validate_update(&req)?;
    if let Some(category_id) = req.category_id {
        ensure_category(&state.pool, restaurant_id, category_id).await?;
    }

    let item = db::menu_items::update(&state.pool, restaurant_id, id, &req, now_millis())
        .await
        .map_err(not_found_as(ErrorCode::MenuItemNotFound))?;
    Ok(Json(item))
}

/// DELETE /api/restaurants/{slug}/items/{id}
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path((slug, id)): Path<(String, i64)>,
) -> ApiResult<serde_json::Value> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    db::menu_items::delete(&state.pool, restaurant_id, id)
        .await
        .map_err(not_found_as(ErrorCode::MenuItemNotFound))?;
    tracing::info!(slug = %slug, item_id = id, "Menu item deleted");
    Ok(Json(serde_json::json!({ "deleted": id })))
}
