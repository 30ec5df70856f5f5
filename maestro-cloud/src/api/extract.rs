//! Request body extraction
//!
//! `ValidJson<T>` is `Json<T>` whose rejections (bad syntax, wrong shape,
//! missing content type) come back as a `ValidationFailed` error with the
//! reason in `details.reason`.

use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;
use shared::error::AppError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
    AppError::validation("Cuerpo de la solicitud inválido")
        .with_detail("reason", rejection.body_text())
}
