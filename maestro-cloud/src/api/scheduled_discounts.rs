//! Scheduled discounts: public list, replace-all for the tenant

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{ScheduledDiscount, ScheduledDiscountsReplace};

use super::{ApiResult, ValidJson, not_found_as, public_restaurant, tenant_scope};
use crate::auth::Session;
use crate::db;
use crate::pricing::validate_scheduled_discount;
use crate::state::AppState;
use crate::util::now_millis;
use crate::validation::MAX_LIST_LEN;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/restaurants/{slug}/scheduled-discounts",
        get(list).post(replace),
    )
}

/// GET /api/restaurants/{slug}/scheduled-discounts
pub async fn list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Vec<ScheduledDiscount>> {
    let restaurant = public_restaurant(&state.pool, &slug).await?;
    let discounts = db::scheduled_discounts::find_all(&state.pool, restaurant.id).await?;
    Ok(Json(discounts))
}

/// POST /api/restaurants/{slug}/scheduled-discounts
///
/// Replaces the whole set atomically. Every entry is validated first; one
/// bad entry rejects the request and leaves the stored set untouched.
pub async fn replace(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    ValidJson(req): ValidJson<ScheduledDiscountsReplace>,
) -> ApiResult<Vec<ScheduledDiscount>> {
    let restaurant_id = tenant_scope(&session, &slug)?;

    if req.discounts.len() > MAX_LIST_LEN {
        return Err(AppError::invalid_field(
            "discounts",
            format!("Máximo {MAX_LIST_LEN} descuentos programados"),
        ));
    }
    for (index, discount) in req.discounts.iter().enumerate() {
        validate_scheduled_discount(discount, index)?;
    }

    let stored = db::scheduled_discounts::replace_all(
        &state.pool,
        restaurant_id,
        &req.discounts,
        now_millis(),
    )
    .await
    .map_err(not_found_as(ErrorCode::CategoryNotFound))?;

    tracing::info!(slug = %slug, count = stored.len(), "Scheduled discounts replaced");
    Ok(Json(stored))
}
