//! Session tokens
//!
//! A session is an HS256 JWT whose `jti` names a row in the `sessions`
//! table. The token alone is not enough: the row must still exist and be
//! unexpired, so logout and tenant cancellation revoke immediately.

use std::sync::OnceLock;

use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Restaurant, RestaurantStatus};
use sqlx::SqlitePool;

use crate::db;
use crate::util::{hash_password, now_millis, verify_password};

/// Slug reserved for the superadmin login; never a tenant slug
pub const RESERVED_SLUG: &str = "restoranmaestroadmin";

pub const COOKIE_NAME: &str = "rm_session";

/// Identity of a logged-in restaurant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSession {
    pub restaurant_id: i64,
    pub slug: String,
    pub owner_id: Option<String>,
    pub name: String,
    pub is_demo: bool,
}

impl From<&Restaurant> for TenantSession {
    fn from(r: &Restaurant) -> Self {
        Self {
            restaurant_id: r.id,
            slug: r.slug.clone(),
            owner_id: r.owner_id.clone(),
            name: r.name.clone(),
            is_demo: r.is_demo,
        }
    }
}

/// Who the caller is. Serialized as `{"kind": "tenant", ...}` or `{"kind": "admin"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    Tenant(TenantSession),
    Admin,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        matches!(self, Session::Admin)
    }

    pub fn tenant(&self) -> Option<&TenantSession> {
        match self {
            Session::Tenant(t) => Some(t),
            Session::Admin => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Tenant,
    Admin,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Restaurant id, or `"admin"`
    pub sub: String,
    pub kind: SessionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub demo: bool,
    /// Session row id
    pub jti: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl Claims {
    fn new(session: &Session, jti: String, iat: i64, exp: i64) -> Self {
        match session {
            Session::Tenant(t) => Self {
                sub: t.restaurant_id.to_string(),
                kind: SessionKind::Tenant,
                slug: Some(t.slug.clone()),
                owner_id: t.owner_id.clone(),
                name: Some(t.name.clone()),
                demo: t.is_demo,
                jti,
                iat,
                exp,
            },
            Session::Admin => Self {
                sub: "admin".into(),
                kind: SessionKind::Admin,
                slug: None,
                owner_id: None,
                name: None,
                demo: false,
                jti,
                iat,
                exp,
            },
        }
    }

    /// Rebuild the session; `None` if the claims are inconsistent
    pub fn into_session(self) -> Option<Session> {
        match self.kind {
            SessionKind::Admin => Some(Session::Admin),
            SessionKind::Tenant => Some(Session::Tenant(TenantSession {
                restaurant_id: self.sub.parse().ok()?,
                slug: self.slug?,
                owner_id: self.owner_id,
                name: self.name?,
                is_demo: self.demo,
            })),
        }
    }
}

/// HS256 signing and verification keys
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }

    /// Verify signature and expiry
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map(|d| d.claims)
    }

    /// Verify signature only. Used by logout, where an expired token must
    /// still be able to drop its row.
    fn decode_ignoring_expiry(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map(|d| d.claims)
    }
}

/// A PHC hash with the production parameters, verified against when the
/// slug does not exist so both failures cost the same.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("maestro-dummy-password").unwrap_or_default())
}

/// Check credentials and resolve the session they grant.
///
/// A missing tenant and a wrong password are indistinguishable to the caller.
pub async fn authenticate(
    pool: &SqlitePool,
    admin_password_hash: Option<&str>,
    slug: &str,
    password: &str,
) -> Result<Session, AppError> {
    let slug = slug.trim().to_ascii_lowercase();

    if slug == RESERVED_SLUG {
        let hash = admin_password_hash.unwrap_or_else(|| dummy_hash());
        let ok = verify_password(password, hash) && admin_password_hash.is_some();
        if !ok {
            tracing::warn!("Superadmin login failed");
            return Err(AppError::invalid_credentials());
        }
        tracing::info!("Superadmin logged in");
        return Ok(Session::Admin);
    }

    let Some(restaurant) = db::restaurants::find_by_slug(pool, &slug).await? else {
        verify_password(password, dummy_hash());
        tracing::warn!(slug = %slug, "Login failed");
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(password, &restaurant.hashed_password) {
        tracing::warn!(slug = %slug, "Login failed");
        return Err(AppError::invalid_credentials());
    }

    if restaurant.status != RestaurantStatus::Active {
        tracing::warn!(
            slug = %slug,
            status = restaurant.status.as_str(),
            "Login on disabled account"
        );
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    Ok(Session::Tenant(TenantSession::from(&restaurant)))
}

/// Persist a session row and sign its token
pub async fn issue(
    pool: &SqlitePool,
    keys: &SessionKeys,
    session: &Session,
    ttl_hours: i64,
) -> Result<String, AppError> {
    let now = now_millis();
    let expires_at = now + ttl_hours * 3_600_000;
    let jti = uuid::Uuid::new_v4().to_string();

    let restaurant_id = session.tenant().map(|t| t.restaurant_id);
    db::sessions::create(pool, &jti, restaurant_id, session.is_admin(), now, expires_at).await?;

    let claims = Claims::new(session, jti, now / 1000, expires_at / 1000);
    keys.sign(&claims).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })
}

/// Drop the session row behind `token`, if any. Never fails.
pub async fn logout(pool: &SqlitePool, keys: &SessionKeys, token: &str) {
    let Ok(claims) = keys.decode_ignoring_expiry(token) else {
        return;
    };
    if let Err(e) = db::sessions::delete(pool, &claims.jti).await {
        tracing::error!(error = %e, "Failed to delete session");
    }
}

/// Session token from the `rm_session` cookie, else the bearer header
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == COOKIE_NAME && !value.is_empty()).then_some(value)
        });
    if from_cookie.is_some() {
        return from_cookie;
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// `Set-Cookie` value carrying the token
pub fn session_cookie(token: &str, ttl_hours: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{COOKIE_NAME}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        ttl_hours * 3600
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
