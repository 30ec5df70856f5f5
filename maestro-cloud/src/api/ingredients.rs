//! Unavailable ingredients: public read, replace-all for the tenant

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::models::UnavailableIngredients;

use super::{ApiResult, ValidJson, public_restaurant, tenant_scope};
use crate::auth::Session;
use crate::db;
use crate::state::AppState;
use crate::validation::validate_text_list;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/restaurants/{slug}/unavailable-ingredients",
        get(list).post(replace),
    )
}

/// GET /api/restaurants/{slug}/unavailable-ingredients
pub async fn list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<UnavailableIngredients> {
    let restaurant = public_restaurant(&state.pool, &slug).await?;
    let ingredients = db::unavailable_ingredients::find_all(&state.pool, restaurant.id).await?;
    Ok(Json(UnavailableIngredients { ingredients }))
}

/// POST /api/restaurants/{slug}/unavailable-ingredients
pub async fn replace(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    ValidJson(req): ValidJson<UnavailableIngredients>,
) -> ApiResult<UnavailableIngredients> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    validate_text_list(&req.ingredients, "ingredients")?;

    let ingredients =
        db::unavailable_ingredients::replace_all(&state.pool, restaurant_id, &req.ingredients)
            .await?;
    tracing::info!(slug = %slug, count = ingredients.len(), "Unavailable ingredients replaced");
    Ok(Json(UnavailableIngredients { ingredients }))
}
