//! Public menu
//!
//! One payload with everything a menu page renders: restaurant header,
//! theme, visible banner and visible categories with priced items.

use std::collections::{BTreeSet, HashMap};

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::{Category, MenuItem, PromotionBanner};

use super::theme::ThemeResponse;
use super::{ApiResult, public_restaurant};
use crate::db;
use crate::pricing::{
    Currency, DEFAULT_TIMEZONE, PriceQuote, PricingContext, choose_timezone, quote_item,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/restaurants/{slug}/menu", get(get_menu))
}

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    /// RFC 3339 instant to price at; defaults to now
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MenuRestaurant {
    pub slug: String,
    pub name: String,
    pub is_demo: bool,
}

#[derive(Debug, Serialize)]
pub struct MenuItemView {
    #[serde(flatten)]
    pub item: MenuItem,
    pub price: PriceQuote,
    /// The item's ingredients that are currently out of stock
    pub unavailable_ingredients: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MenuCategory {
    #[serde(flatten)]
    pub category: Category,
    pub items: Vec<MenuItemView>,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub restaurant: MenuRestaurant,
    pub theme: ThemeResponse,
    pub banner: Option<PromotionBanner>,
    pub categories: Vec<MenuCategory>,
    /// Instant the prices were computed for
    pub priced_at: DateTime<Utc>,
}

fn parse_at(at: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match at {
        None => Ok(Utc::now()),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AppError::invalid_field("at", "Fecha inválida, use RFC 3339")),
    }
}

/// GET /api/restaurants/{slug}/menu[?at=<RFC3339>]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<MenuQuery>,
) -> ApiResult<MenuResponse> {
    let now = parse_at(query.at.as_deref())?;
    let restaurant = public_restaurant(&state.pool, &slug).await?;
    let rid = restaurant.id;

    let categories = db::categories::find_visible(&state.pool, rid).await?;
    let items = db::menu_items::find_all(&state.pool, rid).await?;
    let scheduled = db::scheduled_discounts::find_all(&state.pool, rid).await?;
    let unavailable: BTreeSet<String> = db::unavailable_ingredients::find_all(&state.pool, rid)
        .await?
        .into_iter()
        .collect();
    let banner = db::banners::find(&state.pool, rid).await?.filter(|b| b.is_visible);

    let currency = Currency::choose(restaurant.currency_code.as_deref());
    let timezone = choose_timezone(restaurant.timezone.as_deref());
    let ctx = PricingContext {
        currency: currency.resolve(Currency::default_currency()),
        timezone: timezone.resolve(DEFAULT_TIMEZONE),
        now,
        scheduled: &scheduled,
    };

    let mut by_category: HashMap<i64, Vec<MenuItemView>> = HashMap::new();
    for item in items {
        let price = quote_item(&item, &ctx)?;
        let unavailable_ingredients = item
            .ingredients
            .iter()
            .filter(|i| unavailable.contains(*i))
            .cloned()
            .collect();
        by_category.entry(item.category_id).or_default().push(MenuItemView {
            item,
            price,
            unavailable_ingredients,
        });
    }

    let categories = categories
        .into_iter()
        .map(|category| MenuCategory {
            items: by_category.remove(&category.id).unwrap_or_default(),
            category,
        })
        .collect();

    Ok(Json(MenuResponse {
        theme: ThemeResponse::for_restaurant(&restaurant),
        restaurant: MenuRestaurant {
            slug: restaurant.slug,
            name: restaurant.name,
            is_demo: restaurant.is_demo,
        },
        banner,
        categories,
        priced_at: now,
    }))
}
