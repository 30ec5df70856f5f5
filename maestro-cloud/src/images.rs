//! Logo storage
//!
//! Logos arrive inline as base64 (optionally a `data:` URL), are checked
//! to be a real PNG, JPEG or WebP image, and are written under
//! `{uploads_dir}/{slug}/logo-{uuid}.{ext}`.
//!
//! Uploads are not serialized per tenant. Two concurrent uploads both
//! write their file and both update the restaurant row; the last row
//! update wins and the loser's file is left orphaned on disk.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use shared::error::{AppError, ErrorCode};

/// Maximum decoded logo size (2MB)
pub const MAX_LOGO_SIZE: usize = 2 * 1024 * 1024;

/// Request body limit for the logo route: a maximum-size logo in base64,
/// plus room for line breaks, the `data:` prefix and the JSON envelope
pub const LOGO_BODY_LIMIT: usize = MAX_LOGO_SIZE.div_ceil(3) * 4 + 64 * 1024;

/// A decoded, verified image
#[derive(Debug)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl ImagePayload {
    pub fn extension(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            _ => "webp",
        }
    }
}

fn image_error(code: ErrorCode, msg: impl Into<String>) -> AppError {
    AppError::with_message(code, msg).with_detail("field", "image")
}

/// Decode and verify an inline image payload
pub fn decode_payload(payload: &str) -> Result<ImagePayload, AppError> {
    let payload = payload.trim();
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (meta, data) = rest
                .split_once(',')
                .ok_or_else(|| image_error(ErrorCode::InvalidFormat, "Data URL inválida"))?;
            if !meta.ends_with(";base64") {
                return Err(image_error(
                    ErrorCode::InvalidFormat,
                    "La data URL debe estar en base64",
                ));
            }
            data
        }
        None => payload,
    };

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(image_error(ErrorCode::EmptyFile, "La imagen está vacía"));
    }
    // Cheap upper bound before allocating the decoded buffer
    if compact.len() / 4 * 3 > MAX_LOGO_SIZE + 3 {
        return Err(too_large());
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| image_error(ErrorCode::InvalidFormat, format!("Base64 inválido: {e}")))?;
    if bytes.is_empty() {
        return Err(image_error(ErrorCode::EmptyFile, "La imagen está vacía"));
    }
    if bytes.len() > MAX_LOGO_SIZE {
        return Err(too_large());
    }

    let format = match image::guess_format(&bytes) {
        Ok(f @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP)) => f,
        _ => {
            return Err(image_error(
                ErrorCode::UnsupportedFileFormat,
                "Formato no soportado. Use PNG, JPEG o WebP",
            ));
        }
    };

    image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| image_error(ErrorCode::InvalidImageFile, format!("Imagen inválida: {e}")))?;

    Ok(ImagePayload { bytes, format })
}

fn too_large() -> AppError {
    image_error(
        ErrorCode::FileTooLarge,
        format!("La imagen supera el máximo de {}MB", MAX_LOGO_SIZE / 1024 / 1024),
    )
}

/// A single safe path component: no separators, no dot-files, no `..`
fn is_safe_component(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// Resolve `{uploads_dir}/{slug}/{filename}`, rejecting path traversal
pub fn resolve_path(uploads_dir: &Path, slug: &str, filename: &str) -> Option<PathBuf> {
    (is_safe_component(slug) && is_safe_component(filename))
        .then(|| uploads_dir.join(slug).join(filename))
}

/// Public URL of a stored file
pub fn public_url(slug: &str, filename: &str) -> String {
    format!("/api/images/{slug}/{filename}")
}

/// Write a new logo file and return its file name
pub async fn store_logo(
    uploads_dir: &Path,
    slug: &str,
    image: &ImagePayload,
) -> Result<String, AppError> {
    let filename = format!("logo-{}.{}", uuid::Uuid::new_v4(), image.extension());
    let path = resolve_path(uploads_dir, slug, &filename)
        .ok_or_else(|| AppError::validation("Slug inválido para almacenamiento"))?;

    let storage_err = |e: std::io::Error| {
        tracing::error!(slug = %slug, error = %e, "Failed to store logo");
        AppError::new(ErrorCode::FileStorageFailed)
    };
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await.map_err(storage_err)?;
    }
    tokio::fs::write(&path, &image.bytes).await.map_err(storage_err)?;

    tracing::info!(slug = %slug, file = %filename, size = image.bytes.len(), "Logo stored");
    Ok(filename)
}

/// Best-effort delete; failures are only logged
pub async fn remove_file(uploads_dir: &Path, slug: &str, filename: &str) {
    let Some(path) = resolve_path(uploads_dir, slug, filename) else {
        return;
    };
    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!(file = %path.display(), "Removed old file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(file = %path.display(), error = %e, "Failed to remove old file"),
    }
}

/// Move a tenant's upload directory after a slug change. Best effort.
pub async fn rename_tenant_dir(uploads_dir: &Path, old_slug: &str, new_slug: &str) {
    if !is_safe_component(old_slug) || !is_safe_component(new_slug) {
        return;
    }
    let from = uploads_dir.join(old_slug);
    if !tokio::fs::try_exists(&from).await.unwrap_or(false) {
        return;
    }
    if let Err(e) = tokio::fs::rename(&from, uploads_dir.join(new_slug)).await {
        tracing::warn!(
            from = %old_slug,
            to = %new_slug,
            error = %e,
            "Failed to move upload directory"
        );
    }
}

/// Read a stored file. `None` if the path is unsafe or the file is absent.
pub async fn read_file(uploads_dir: &Path, slug: &str, filename: &str) -> Option<Vec<u8>> {
    let path = resolve_path(uploads_dir, slug, filename)?;
    tokio::fs::read(path).await.ok()
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_images::png_bytes;

    #[test]
    fn accepts_plain_base64_and_data_url() {
        let b64 = STANDARD.encode(png_bytes());
        let plain = decode_payload(&b64).unwrap();
        assert_eq!(plain.format, ImageFormat::Png);
        assert_eq!(plain.extension(), "png");

        let url = format!("data:image/png;base64,{b64}");
        assert_eq!(decode_payload(&url).unwrap().bytes, plain.bytes);
    }

    #[test]
    fn rejects_bad_payloads() {
        let code = |p: &str| decode_payload(p).unwrap_err().code;
        assert_eq!(code(""), ErrorCode::EmptyFile);
        assert_eq!(code("!!!"), ErrorCode::InvalidFormat);
        assert_eq!(code("data:image/png,abc"), ErrorCode::InvalidFormat);
        assert_eq!(code(&STANDARD.encode(b"GIF89a....")), ErrorCode::UnsupportedFileFormat);

        let mut truncated = png_bytes();
        truncated.truncate(20);
        assert_eq!(code(&STANDARD.encode(truncated)), ErrorCode::InvalidImageFile);

        let huge = STANDARD.encode(vec![0u8; MAX_LOGO_SIZE + 1]);
        assert_eq!(code(&huge), ErrorCode::FileTooLarge);
    }

    #[test]
    fn path_traversal_is_rejected() {
        let root = Path::new("/srv/uploads");
        assert!(resolve_path(root, "la-picada", "logo-1.png").is_some());
        assert!(resolve_path(root, "..", "x.png").is_none());
        assert!(resolve_path(root, "a", "../etc/passwd").is_none());
        assert!(resolve_path(root, "a", "..").is_none());
        assert!(resolve_path(root, "a", ".hidden").is_none());
        assert!(resolve_path(root, "a", "x/y.png").is_none());
        assert!(resolve_path(root, "a", "x%2Fy.png").is_none());
    }

    #[tokio::test]
    async fn store_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let image = decode_payload(&STANDARD.encode(png_bytes())).unwrap();

        let name = store_logo(dir.path(), "la-picada", &image).await.unwrap();
        assert!(name.starts_with("logo-") && name.ends_with(".png"));
        assert_eq!(read_file(dir.path(), "la-picada", &name).await.unwrap(), image.bytes);

        remove_file(dir.path(), "la-picada", &name).await;
        assert!(read_file(dir.path(), "la-picada", &name).await.is_none());
        // second removal is silent
        remove_file(dir.path(), "la-picada", &name).await;
    }

    #[tokio::test]
    async fn rename_moves_directory() {
        let dir = tempfile::tempdir().unwrap();
        let image = decode_payload(&STANDARD.encode(png_bytes())).unwrap();
        let name = store_logo(dir.path(), "viejo", &image).await.unwrap();

        rename_tenant_dir(dir.path(), "viejo", "nuevo").await;
        assert!(read_file(dir.path(), "nuevo", &name).await.is_some());
        assert!(read_file(dir.path(), "viejo", &name).await.is_none());
    }
}
