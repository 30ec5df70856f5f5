//! Promotion banner (singleton per restaurant)

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::AppError;
use shared::models::{BannerInput, PromotionBanner};

use super::{ApiResult, ValidJson, public_restaurant, tenant_scope};
use crate::auth::Session;
use crate::db;
use crate::state::AppState;
use crate::util::now_millis;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_color, validate_optional_text, validate_required_text,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/restaurants/{slug}/banner", get(get_banner).post(save_banner))
}

/// GET /api/restaurants/{slug}/banner
///
/// `null` until the first save.
pub async fn get_banner(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Option<PromotionBanner>> {
    let restaurant = public_restaurant(&state.pool, &slug).await?;
    Ok(Json(db::banners::find(&state.pool, restaurant.id).await?))
}

fn validate_banner(input: &BannerInput) -> Result<(), AppError> {
    validate_required_text(&input.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&input.subtitle, "subtitle", MAX_NOTE_LEN)?;
    validate_color(&input.background_color, "background_color")?;
    validate_color(&input.text_color, "text_color")?;
    Ok(())
}

/// POST /api/restaurants/{slug}/banner
pub async fn save_banner(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    ValidJson(req): ValidJson<BannerInput>,
) -> ApiResult<PromotionBanner> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    validate_banner(&req)?;

    let banner = db::banners::upsert(&state.pool, restaurant_id, &req, now_millis()).await?;
    Ok(Json(banner))
}
