//! Superadmin tenant management
//!
//! Every handler calls `require_admin` before touching storage.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{Restaurant, RestaurantCreate, RestaurantStatus, RestaurantUpdate, ThemePreset};

use super::ApiResult;
use super::ValidJson;
use crate::auth::{Session, require_admin};
use crate::db::{self, RepoError};
use crate::images;
use crate::pricing::Currency;
use crate::state::AppState;
use crate::util::{hash_password, now_millis};
use crate::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_password,
    validate_required_text, validate_slug, validate_timezone,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/restaurants", get(list).post(create))
        .route("/api/admin/restaurants/{id}", patch(update).delete(delete))
}

fn slug_error(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::SlugTaken).with_detail("field", "slug"),
        RepoError::NotFound(_) => AppError::new(ErrorCode::RestaurantNotFound),
        other => other.into(),
    }
}

fn hash(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })
}

/// Canonical currency code, or a field error
fn currency_code(code: Option<String>) -> Result<Option<String>, AppError> {
    code.map(|c| {
        Currency::find(&c)
            .map(|cur| cur.code.to_string())
            .ok_or_else(|| {
                AppError::invalid_field("currency_code", format!("Moneda no soportada: {c}"))
            })
    })
    .transpose()
}

fn validate_create(req: &RestaurantCreate) -> Result<(), AppError> {
    validate_slug(&req.slug)?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_password(&req.password, "password")?;
    validate_optional_text(&req.owner_id, "owner_id", MAX_SHORT_TEXT_LEN)?;
    if let Some(tz) = &req.timezone {
        validate_timezone(tz, "timezone")?;
    }
    if let Some(theme) = &req.theme_id
        && ThemePreset::find(theme).is_none()
    {
        return Err(AppError::invalid_field("theme_id", format!("Tema desconocido: {theme}")));
    }
    Ok(())
}

fn validate_update(req: &RestaurantUpdate) -> Result<(), AppError> {
    if let Some(slug) = &req.slug {
        validate_slug(slug)?;
    }
    if let Some(name) = &req.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(password) = &req.password {
        validate_password(password, "password")?;
    }
    if let Some(owner) = &req.owner_id {
        validate_optional_text(owner, "owner_id", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

/// GET /api/admin/restaurants (all statuses)
pub async fn list(State(state): State<AppState>, session: Session) -> ApiResult<Vec<Restaurant>> {
    require_admin(&session)?;
    Ok(Json(db::restaurants::find_all(&state.pool).await?))
}

/// POST /api/admin/restaurants
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    ValidJson(req): ValidJson<RestaurantCreate>,
) -> Result<(StatusCode, Json<Restaurant>), AppError> {
    require_admin(&session)?;
    let req = RestaurantCreate {
        slug: req.slug.trim().to_string(),
        ..req
    };
    validate_create(&req)?;

    let new = db::restaurants::NewRestaurant {
        hashed_password: hash(&req.password)?,
        currency_code: currency_code(req.currency_code)?,
        slug: req.slug,
        name: req.name.trim().to_string(),
        owner_id: req.owner_id,
        is_demo: req.is_demo.unwrap_or(false),
        timezone: req.timezone,
        theme_id: req.theme_id,
    };

    let restaurant = db::restaurants::create(&state.pool, new, now_millis())
        .await
        .map_err(slug_error)?;
    tracing::info!(slug = %restaurant.slug, id = restaurant.id, "Restaurant created");
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// PATCH /api/admin/restaurants/{id}
///
/// A new slug, password or a non-active status revokes the tenant's sessions.
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    ValidJson(req): ValidJson<RestaurantUpdate>,
) -> ApiResult<Restaurant> {
    require_admin(&session)?;
    let req = RestaurantUpdate {
        slug: req.slug.map(|s| s.trim().to_string()),
        ..req
    };
    validate_update(&req)?;

    let existing = db::restaurants::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let slug_changed = req.slug.as_ref().is_some_and(|s| *s != existing.slug);
    let revoke = slug_changed
        || req.password.is_some()
        || req.status.is_some_and(|s| !s.is_active());

    let patch = db::restaurants::RestaurantPatch {
        hashed_password: req.password.as_deref().map(hash).transpose()?,
        slug: req.slug,
        name: req.name.map(|n| n.trim().to_string()),
        status: req.status,
        owner_id: req.owner_id,
        is_demo: req.is_demo,
    };
    let restaurant = db::restaurants::update(&state.pool, id, patch, now_millis())
        .await
        .map_err(slug_error)?;

    if slug_changed {
        images::rename_tenant_dir(&state.uploads_dir, &existing.slug, &restaurant.slug).await;
    }
    if revoke {
        let revoked = db::sessions::delete_for_restaurant(&state.pool, id).await?;
        tracing::info!(id, revoked, "Tenant sessions revoked");
    }

    tracing::info!(id, slug = %restaurant.slug, "Restaurant updated");
    Ok(Json(restaurant))
}

/// DELETE /api/admin/restaurants/{id}
///
/// Soft delete: the row stays with status `cancelled`.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> ApiResult<Restaurant> {
    require_admin(&session)?;

    let restaurant =
        db::restaurants::set_status(&state.pool, id, RestaurantStatus::Cancelled, now_millis())
            .await
            .map_err(slug_error)?;
    let revoked = db::sessions::delete_for_restaurant(&state.pool, id).await?;

    tracing::info!(id, slug = %restaurant.slug, revoked, "Restaurant cancelled");
    Ok(Json(restaurant))
}
