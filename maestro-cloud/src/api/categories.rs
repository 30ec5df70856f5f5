//! Category management (tenant)

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryReorder, CategoryUpdate};

use super::{ApiResult, ValidJson, not_found_as, tenant_scope};
use crate::auth::Session;
use crate::db;
use crate::state::AppState;
use crate::util::now_millis;
use crate::validation::{MAX_LIST_LEN, MAX_NAME_LEN, validate_required_text};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/restaurants/{slug}/categories", get(list).post(create))
        .route("/api/restaurants/{slug}/categories/reorder", post(reorder))
        .route(
            "/api/restaurants/{slug}/categories/{id}",
            patch(update).delete(delete),
        )
}

/// GET /api/restaurants/{slug}/categories (includes hidden)
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> ApiResult<Vec<Category>> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    Ok(Json(db::categories::find_all(&state.pool, restaurant_id).await?))
}

/// POST /api/restaurants/{slug}/categories
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    ValidJson(req): ValidJson<CategoryCreate>,
) -> ApiResult<Category> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;

    let category = db::categories::create(&state.pool, restaurant_id, &req, now_millis()).await?;
    tracing::info!(slug = %slug, category_id = category.id, "Category created");
    Ok(Json(category))
}

/// PATCH /api/restaurants/{slug}/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path((slug, id)): Path<(String, i64)>,
    ValidJson(req): ValidJson<CategoryUpdate>,
) -> ApiResult<Category> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    if let Some(name) = &req.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let category = db::categories::update(&state.pool, restaurant_id, id, &req, now_millis())
        .await
        .map_err(not_found_as(ErrorCode::CategoryNotFound))?;
    Ok(Json(category))
}

/// DELETE /api/restaurants/{slug}/categories/{id}
///
/// Also removes the category's items and scheduled discounts.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path((slug, id)): Path<(String, i64)>,
) -> ApiResult<serde_json::Value> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    db::categories::delete(&state.pool, restaurant_id, id)
        .await
        .map_err(not_found_as(ErrorCode::CategoryNotFound))?;

    tracing::info!(slug = %slug, category_id = id, "Category deleted");
    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// POST /api/restaurants/{slug}/categories/reorder
pub async fn reorder(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    ValidJson(req): ValidJson<CategoryReorder>,
) -> ApiResult<Vec<Category>> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    if req.items.len() > MAX_LIST_LEN {
        return Err(AppError::invalid_field("items", format!("Máximo {MAX_LIST_LEN} elementos")));
    }

    let ordered = db::categories::reorder(&state.pool, restaurant_id, &req.items, now_millis())
        .await
        .map_err(not_found_as(ErrorCode::CategoryNotFound))?;
    Ok(Json(ordered))
}
