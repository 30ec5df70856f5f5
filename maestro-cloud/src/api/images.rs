//! Image serving: `GET /api/images/{slug}/{filename}`

use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use http::header::{CACHE_CONTROL, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use shared::error::AppError;

use crate::images::read_file;
use crate::state::AppState;

/// File names are unique per upload, so responses never change
const CACHE_FOREVER: &str = "public, max-age=31536000, immutable";

pub fn router() -> Router<AppState> {
    Router::new().route("/api/images/{slug}/{filename}", get(serve))
}

pub async fn serve(
    State(state): State<AppState>,
    Path((slug, filename)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = read_file(&state.uploads_dir, &slug, &filename)
        .await
        .ok_or_else(|| AppError::not_found("Imagen"))?;

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    Ok((
        [
            (CONTENT_TYPE, mime.essence_str().to_string()),
            (CACHE_CONTROL, CACHE_FOREVER.to_string()),
            (X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        ],
        bytes,
    ))
}
