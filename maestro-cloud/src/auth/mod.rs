//! Sessions and authorization
//!
//! - [`session`]: credential check, token issue/revoke, cookie handling
//! - [`extractor`]: `Session` as an axum extractor
//! - [`guard`]: `require_admin` / `require_tenant_match`
//! - [`rate_limit`]: per-IP login throttling

pub mod extractor;
pub mod guard;
pub mod rate_limit;
pub mod session;

pub use guard::{require_admin, require_tenant_match};
pub use rate_limit::RateLimiter;
pub use session::{COOKIE_NAME, RESERVED_SLUG, Session, SessionKeys, TenantSession};
