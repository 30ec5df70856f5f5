//! Session Extractor
//!
//! Handlers take `session: Session` as an argument; a request without a
//! live session never reaches them.

use axum::extract::FromRequestParts;
use http::request::Parts;
use jsonwebtoken::errors::ErrorKind;
use shared::error::{AppError, ErrorCode};

use super::session::{Session, token_from_headers};
use crate::db;
use crate::state::AppState;
use crate::util::now_millis;

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(session.clone());
        }

        let Some(token) = token_from_headers(&parts.headers) else {
            tracing::warn!(uri = %parts.uri, "auth_missing");
            return Err(AppError::not_authenticated());
        };

        let claims = state.keys.decode(token).map_err(|e| {
            tracing::warn!(uri = %parts.uri, error = %e, "auth_failed");
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::new(ErrorCode::TokenExpired),
                _ => AppError::new(ErrorCode::TokenInvalid),
            }
        })?;

        if !db::sessions::is_valid(&state.pool, &claims.jti, now_millis()).await? {
            tracing::warn!(uri = %parts.uri, "auth_revoked");
            return Err(AppError::new(ErrorCode::SessionExpired));
        }

        let session = claims
            .into_session()
            .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))?;

        parts.extensions.insert(session.clone());
        Ok(session)
    }
}
