//! Input validation helpers
//!
//! Text length limits and field checks shared by the handlers. Every
//! failure is a `ValidationFailed` error carrying `details.field`.

use shared::error::{AppError, ErrorCode};

use crate::auth::RESERVED_SLUG;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: restaurant, category, item, banner title
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, banner subtitles
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: owner id, ingredient id, allergen, timezone
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

pub const MIN_PASSWORD_LEN: usize = 6;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

pub const MIN_SLUG_LEN: usize = 3;
pub const MAX_SLUG_LEN: usize = 63;

/// Entries in any list field (allergens, ingredients, discounts, ...)
pub const MAX_LIST_LEN: usize = 200;

// ── Text ────────────────────────────────────────────────────────────

/// Required string: non-blank and within the length limit
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        let message = format!("{field} es obligatorio");
        return Err(
            AppError::with_message(ErrorCode::RequiredField, message).with_detail("field", field),
        );
    }
    validate_len(value, field, max_len)
}

/// Optional string: within the length limit if present
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::invalid_field(
            field,
            format!("{field} es demasiado largo ({len} caracteres, máximo {max_len})"),
        ));
    }
    Ok(())
}

/// List of short identifiers (allergens, ingredients)
pub fn validate_text_list(values: &[String], field: &str) -> Result<(), AppError> {
    if values.len() > MAX_LIST_LEN {
        return Err(AppError::invalid_field(
            field,
            format!("{field} admite como máximo {MAX_LIST_LEN} elementos"),
        ));
    }
    for v in values {
        validate_required_text(v, field, MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

pub fn validate_password(value: &str, field: &str) -> Result<(), AppError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_field(
            field,
            format!("La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"),
        ));
    }
    validate_len(value, field, MAX_PASSWORD_LEN)
}

// ── Slugs ───────────────────────────────────────────────────────────

/// 3-63 chars of `[a-z0-9-]`, no leading/trailing `-`, not the reserved slug
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.eq_ignore_ascii_case(RESERVED_SLUG) {
        return Err(AppError::new(ErrorCode::ReservedSlug).with_detail("field", "slug"));
    }

    let well_formed = (MIN_SLUG_LEN..=MAX_SLUG_LEN).contains(&slug.len())
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !slug.starts_with('-')
        && !slug.ends_with('-');
    if !well_formed {
        return Err(AppError::with_message(
            ErrorCode::InvalidSlug,
            format!(
                "El slug debe tener entre {MIN_SLUG_LEN} y {MAX_SLUG_LEN} caracteres: \
                 minúsculas, números y guiones"
            ),
        )
        .with_detail("field", "slug"));
    }
    Ok(())
}

// ── Misc ────────────────────────────────────────────────────────────

/// `#RGB` or `#RRGGBB`
pub fn validate_color(value: &str, field: &str) -> Result<(), AppError> {
    let ok = value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit())
    });
    if !ok {
        return Err(AppError::invalid_field(field, "Color inválido, use #RGB o #RRGGBB"));
    }
    Ok(())
}

pub fn validate_timezone(value: &str, field: &str) -> Result<(), AppError> {
    value
        .parse::<chrono_tz::Tz>()
        .map(|_| ())
        .map_err(|_| AppError::invalid_field(field, format!("Zona horaria desconocida: {value}")))
}
