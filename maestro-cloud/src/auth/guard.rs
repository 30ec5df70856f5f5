//! Authorization checks
//!
//! Called explicitly by handlers, before any storage access.

use shared::error::{AppError, ErrorCode};

use super::session::{Session, TenantSession};

/// Only the superadmin passes
pub fn require_admin(session: &Session) -> Result<(), AppError> {
    match session {
        Session::Admin => Ok(()),
        Session::Tenant(t) => {
            tracing::warn!(slug = %t.slug, "Admin route denied to tenant session");
            Err(AppError::new(ErrorCode::AdminRequired))
        }
    }
}

/// Only a tenant session bound to `slug` passes. The superadmin does not.
pub fn require_tenant_match<'a>(
    session: &'a Session,
    slug: &str,
) -> Result<&'a TenantSession, AppError> {
    match session {
        Session::Tenant(t) if t.slug == slug => Ok(t),
        Session::Tenant(t) => {
            tracing::warn!(session_slug = %t.slug, target = %slug, "Cross-tenant access denied");
            Err(AppError::new(ErrorCode::TenantMismatch))
        }
        Session::Admin => Err(AppError::new(ErrorCode::TenantMismatch)),
    }
}
