//! Application-layer rate limiting for the login route

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::AppError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

pub const LOGIN_MAX_REQUESTS: u32 = 5;
pub const LOGIN_WINDOW_SECS: u64 = 60;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(
        &self,
        route: &'static str,
        ip: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start).as_secs() >= window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Remove entries older than 5 minutes
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }
        map.retain(|_, route_map| !route_map.is_empty());
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.inner.lock().await.values().map(HashMap::len).sum()
    }
}

/// Client IP used as the rate-limit key.
///
/// The peer address, unless the service sits behind a trusted proxy, in
/// which case the first `X-Forwarded-For` entry. Clients can put anything
/// in that header, so it is only read when `trust_proxy` is set.
pub fn extract_ip(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Rate limit middleware for login: 5 requests/minute per IP
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip = extract_ip(&request, state.trust_proxy);
    if !state
        .rate_limiter
        .check("login", &ip, LOGIN_MAX_REQUESTS, LOGIN_WINDOW_SECS)
        .await
    {
        tracing::warn!(ip = %ip, "Login rate limit exceeded");
        return Err(AppError::too_many_requests().into_response());
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn allows_up_to_max_per_ip() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            assert!(limiter.check("login", "1.1.1.1", 5, 60).await);
        }
        assert!(!limiter.check("login", "1.1.1.1", 5, 60).await);
        assert!(limiter.check("login", "2.2.2.2", 5, 60).await);
        assert!(limiter.check("other", "1.1.1.1", 5, 60).await);
    }

    #[tokio::test(start_paused = true)]
    async fn window_resets_and_cleanup_drops_stale() {
        let limiter = RateLimiter::new();
        for _ in 0..6 {
            limiter.check("login", "1.1.1.1", 5, 60).await;
        }
        tokio::time::advance(std::time::Duration::from_secs(61)).await;
        assert!(limiter.check("login", "1.1.1.1", 5, 60).await);

        tokio::time::advance(std::time::Duration::from_secs(301)).await;
        limiter.cleanup().await;
        assert_eq!(limiter.tracked().await, 0);
    }

    fn request(forwarded: Option<&str>, peer: Option<[u8; 4]>) -> Request {
        let mut builder = http::Request::builder();
        if let Some(f) = forwarded {
            builder = builder.header("x-forwarded-for", f);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(ip) = peer {
            req.extensions_mut().insert(ConnectInfo(SocketAddr::from((ip, 4000))));
        }
        req
    }

    #[test]
    fn peer_address_unless_proxy_trusted() {
        let req = request(Some("203.0.113.9, 10.0.0.1"), Some([192, 168, 1, 5]));
        assert_eq!(extract_ip(&req, false), "192.168.1.5");
        assert_eq!(extract_ip(&req, true), "203.0.113.9");

        let req = request(Some("   "), Some([192, 168, 1, 5]));
        assert_eq!(extract_ip(&req, true), "192.168.1.5");

        assert_eq!(extract_ip(&request(None, None), true), "unknown");
        assert_eq!(extract_ip(&request(Some("1.2.3.4"), None), false), "unknown");
    }
}
