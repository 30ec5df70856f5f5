//! Theme configuration: preset, currency, timezone and logo

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::{Choice, Restaurant, ThemePreset, ThemeUpdate};

use super::{ApiResult, ValidJson, public_restaurant, tenant_scope};
use crate::auth::Session;
use crate::db;
use crate::images;
use crate::pricing::{Currency, DEFAULT_TIMEZONE, choose_timezone};
use crate::state::AppState;
use crate::util::now_millis;
use crate::validation::validate_timezone;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/restaurants/{slug}/theme", get(get_theme).post(update_theme))
        .merge(logo_router())
}

/// Logo upload carries base64 in JSON, which outgrows the default 2MB body limit
fn logo_router() -> Router<AppState> {
    Router::new()
        .route("/api/restaurants/{slug}/logo", post(upload_logo))
        .layer(DefaultBodyLimit::max(images::LOGO_BODY_LIMIT))
}

/// A setting as configured plus the value actually in effect
#[derive(Debug, Serialize)]
pub struct Setting<T> {
    pub choice: Choice<&'static str>,
    pub resolved: T,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Setting<&'static ThemePreset>,
    pub currency: Setting<&'static Currency>,
    pub timezone: Setting<&'static str>,
    /// Public URL of the logo
    pub logo: Option<String>,
}

impl ThemeResponse {
    pub fn for_restaurant(r: &Restaurant) -> Self {
        let theme = ThemePreset::choose(r.theme_id.as_deref());
        let currency = Currency::choose(r.currency_code.as_deref());
        let timezone = choose_timezone(r.timezone.as_deref());

        Self {
            theme: Setting {
                choice: theme.map(|p| p.id),
                resolved: theme.resolve(ThemePreset::default_preset()),
            },
            currency: Setting {
                choice: currency.map(|c| c.code),
                resolved: currency.resolve(Currency::default_currency()),
            },
            timezone: Setting {
                choice: timezone.map(|tz| tz.name()),
                resolved: timezone.resolve(DEFAULT_TIMEZONE).name(),
            },
            logo: r.logo.as_deref().map(|f| images::public_url(&r.slug, f)),
        }
    }
}

/// GET /api/restaurants/{slug}/theme
pub async fn get_theme(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ThemeResponse> {
    let restaurant = public_restaurant(&state.pool, &slug).await?;
    Ok(Json(ThemeResponse::for_restaurant(&restaurant)))
}

/// Check every explicitly set field and canonicalize codes
fn normalize_theme_update(req: ThemeUpdate) -> Result<ThemeUpdate, AppError> {
    let theme_id = match req.theme_id {
        Some(Some(id)) => {
            let preset = ThemePreset::find(&id).ok_or_else(|| {
                AppError::invalid_field("theme_id", format!("Tema desconocido: {id}"))
            })?;
            Some(Some(preset.id.to_string()))
        }
        other => other,
    };
    let currency_code = match req.currency_code {
        Some(Some(code)) => {
            let currency = Currency::find(&code).ok_or_else(|| {
                AppError::invalid_field("currency_code", format!("Moneda no soportada: {code}"))
            })?;
            Some(Some(currency.code.to_string()))
        }
        other => other,
    };
    if let Some(Some(tz)) = &req.timezone {
        validate_timezone(tz, "timezone")?;
    }

    Ok(ThemeUpdate {
        theme_id,
        currency_code,
        timezone: req.timezone,
    })
}

/// POST /api/restaurants/{slug}/theme
///
/// Absent fields are kept; an explicit `null` resets to the default.
pub async fn update_theme(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    ValidJson(req): ValidJson<ThemeUpdate>,
) -> ApiResult<ThemeResponse> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    let update = normalize_theme_update(req)?;

    let restaurant =
        db::restaurants::update_theme(&state.pool, restaurant_id, &update, now_millis()).await?;
    tracing::info!(slug = %slug, "Theme updated");
    Ok(Json(ThemeResponse::for_restaurant(&restaurant)))
}

#[derive(Debug, Deserialize)]
pub struct LogoUpload {
    /// Base64 or `data:image/...;base64,` URL
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct LogoResponse {
    pub logo: String,
}

/// POST /api/restaurants/{slug}/logo
///
/// Writes a new file, points the restaurant at it, then removes the
/// previous file. Concurrent uploads race; the last row update wins.
pub async fn upload_logo(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    ValidJson(req): ValidJson<LogoUpload>,
) -> ApiResult<LogoResponse> {
    let restaurant_id = tenant_scope(&session, &slug)?;
    let image = images::decode_payload(&req.image)?;

    let filename = images::store_logo(&state.uploads_dir, &slug, &image).await?;
    let stored =
        db::restaurants::set_logo(&state.pool, restaurant_id, &filename, now_millis()).await;
    let previous = match stored {
        Ok(previous) => previous,
        Err(e) => {
            images::remove_file(&state.uploads_dir, &slug, &filename).await;
            return Err(e.into());
        }
    };

    if let Some(old) = previous.filter(|old| *old != filename) {
        images::remove_file(&state.uploads_dir, &slug, &old).await;
    }

    Ok(Json(LogoResponse {
        logo: images::public_url(&slug, &filename),
    }))
}
