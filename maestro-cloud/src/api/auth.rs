//! Authentication endpoints: login, logout, current session

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use http::HeaderMap;
use http::header::SET_COOKIE;
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use super::{ApiResult, ValidJson};
use crate::auth::rate_limit::login_rate_limit;
use crate::auth::session::{self, Session, clear_cookie, session_cookie, token_from_headers};
use crate::state::AppState;
use crate::validation::{MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};

/// `/api/auth/login` is rate limited per client IP
pub fn router(state: &AppState) -> Router<AppState> {
    let login = Router::new()
        .route("/api/auth/login", post(login))
        .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    Router::new()
        .merge(login)
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(current_session))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub slug: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_required_text(&req.slug, "slug", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    let session = session::authenticate(
        &state.pool,
        state.admin_password_hash.as_deref(),
        &req.slug,
        &req.password,
    )
    .await?;

    let token = session::issue(&state.pool, &state.keys, &session, state.session_ttl_hours).await?;
    let cookie = session_cookie(&token, state.session_ttl_hours, state.cookie_secure);

    match &session {
        Session::Tenant(t) => {
            tracing::info!(slug = %t.slug, restaurant_id = t.restaurant_id, "Tenant logged in")
        }
        Session::Admin => tracing::info!("Superadmin session issued"),
    }

    Ok(([(SET_COOKIE, cookie)], Json(SessionResponse { session })))
}

/// POST /api/auth/logout
///
/// Idempotent: always clears the cookie, with or without a live session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = token_from_headers(&headers) {
        session::logout(&state.pool, &state.keys, token).await;
    }
    (
        [(SET_COOKIE, clear_cookie(state.cookie_secure))],
        Json(serde_json::json!({ "success": true })),
    )
}

/// GET /api/auth/session
pub async fn current_session(session: Session) -> ApiResult<SessionResponse> {
    Ok(Json(SessionResponse { session }))
}
