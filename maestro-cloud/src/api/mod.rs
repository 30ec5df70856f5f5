//! HTTP API
//!
//! Each submodule exposes a `router()`; [`build_router`] merges them and
//! [`build_app`] adds the middleware stack.

pub mod admin;
pub mod auth;
pub mod banner;
pub mod categories;
pub mod extract;
pub mod health;
pub mod images;
pub mod ingredients;
pub mod items;
pub mod menu;
pub mod middleware;
pub mod scheduled_discounts;
pub mod theme;

use axum::{Json, Router};
use http::{HeaderName, HeaderValue};
use shared::error::{AppError, ErrorCode};
use shared::models::Restaurant;
use sqlx::SqlitePool;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{Session, require_tenant_match};
use crate::db;
use crate::state::AppState;

pub use extract::ValidJson;

pub type ApiResult<T> = Result<Json<T>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, no middleware
pub fn build_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state))
        .merge(menu::router())
        .merge(theme::router())
        .merge(scheduled_discounts::router())
        .merge(ingredients::router())
        .merge(banner::router())
        .merge(categories::router())
        .merge(items::router())
        .merge(images::router())
        .merge(admin::router())
}

/// Routes plus the middleware stack, used by the server and by tests
pub fn build_app(state: &AppState) -> Router<AppState> {
    build_router(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        // Set wraps Propagate so generated ids reach the response too
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}

// ── Tenant resolution ───────────────────────────────────────────────

/// Restaurant behind a public slug. Unknown and non-active tenants are
/// both reported as not found.
pub(crate) async fn public_restaurant(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Restaurant, AppError> {
    match db::restaurants::find_by_slug(pool, slug).await? {
        Some(r) if r.status.is_active() => Ok(r),
        _ => Err(AppError::new(ErrorCode::RestaurantNotFound).with_detail("slug", slug)),
    }
}

/// Restaurant id the session may write to under `slug`
pub(crate) fn tenant_scope(session: &Session, slug: &str) -> Result<i64, AppError> {
    require_tenant_match(session, slug).map(|t| t.restaurant_id)
}

/// Map a repository miss to a specific not-found code
pub(crate) fn not_found_as(code: ErrorCode) -> impl Fn(db::RepoError) -> AppError {
    move |err| match err {
        db::RepoError::NotFound(what) => AppError::new(code).with_detail("resource", what),
        other => other.into(),
    }
}
