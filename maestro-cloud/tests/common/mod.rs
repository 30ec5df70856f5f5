//! Shared helpers for router-level tests: in-memory SQLite, temp uploads
//! directory, and request shortcuts.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use http::{HeaderMap, Method, Request, StatusCode};
use maestro_cloud::db::DbService;
use maestro_cloud::util::hash_password;
use maestro_cloud::{AppState, Config, api};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_SLUG: &str = "restoranmaestroadmin";
pub const ADMIN_PASSWORD: &str = "super-secreto";
pub const TENANT_PASSWORD: &str = "clave-segura";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub uploads: TempDir,
    next_ip: AtomicU32,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Numeric error code of an error body
    pub fn code(&self) -> u64 {
        self.body["code"].as_u64().unwrap_or_default()
    }
}

pub async fn app() -> TestApp {
    app_with(|_| {}).await
}

/// App with a tweaked config
pub async fn app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = Config {
        database_url: "sqlite::memory:".into(),
        http_port: 0,
        environment: "test".into(),
        jwt_secret: "integration-test-secret".into(),
        session_ttl_hours: 24,
        uploads_dir: uploads.path().to_path_buf(),
        admin_password_hash: Some(hash_password(ADMIN_PASSWORD).unwrap()),
        cookie_secure: false,
        trust_proxy: false,
    };
    configure(&mut config);
    let pool = DbService::in_memory().await.unwrap().pool;
    let state = AppState::with_pool(pool, &config);
    let router = api::build_app(&state).with_state(state.clone());

    TestApp {
        router,
        state,
        uploads,
        next_ip: AtomicU32::new(1),
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
            bytes,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(c) = cookie {
            builder = builder.header("cookie", c);
        }
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), cookie).await
    }

    pub async fn patch(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body), cookie).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, None, cookie).await
    }

    /// POST /api/auth/login from a fresh peer address (keeps clear of the rate limit)
    pub async fn try_login(&self, slug: &str, password: &str) -> TestResponse {
        let ip = self.next_ip.fetch_add(1, Ordering::Relaxed);
        let peer = SocketAddr::from(([10, 0, (ip / 256) as u8, (ip % 256) as u8], 40000));
        self.login_from(peer, None, slug, password).await
    }

    /// POST /api/auth/login as seen from `peer`, optionally with `X-Forwarded-For`
    pub async fn login_from(
        &self,
        peer: SocketAddr,
        forwarded_for: Option<&str>,
        slug: &str,
        password: &str,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header("content-type", "application/json");
        if let Some(f) = forwarded_for {
            builder = builder.header("x-forwarded-for", f);
        }
        let mut req = builder
            .body(Body::from(json!({"slug": slug, "password": password}).to_string()))
            .unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        self.send(req).await
    }

    /// Log in and return the `name=value` cookie pair
    pub async fn login(&self, slug: &str, password: &str) -> String {
        let res = self.try_login(slug, password).await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
        session_cookie(&res.headers).expect("no session cookie")
    }

    pub async fn admin(&self) -> String {
        self.login(ADMIN_SLUG, ADMIN_PASSWORD).await
    }

    /// Create an active restaurant through the admin API
    pub async fn create_restaurant(&self, admin: &str, slug: &str, extra: Value) -> Value {
        let mut body = json!({
            "slug": slug,
            "name": format!("Restaurante {slug}"),
            "password": TENANT_PASSWORD,
        });
        if let (Some(obj), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            obj.extend(extra.clone());
        }
        let res = self.post("/api/admin/restaurants", body, Some(admin)).await;
        assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.body);
        res.body
    }

    /// Create a restaurant and log in as it
    pub async fn tenant(&self, admin: &str, slug: &str, extra: Value) -> String {
        self.create_restaurant(admin, slug, extra).await;
        self.login(slug, TENANT_PASSWORD).await
    }
}

/// `rm_session=<token>` from a `Set-Cookie` header
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("rm_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

/// A tiny PNG as a `data:` URL
pub fn png_data_url() -> String {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 120, 60]));
    data_url(&encode_png(&img))
}

/// A square PNG of xorshift noise; deflate cannot shrink it, so its size
/// tracks `side * side * 3` bytes
pub fn noisy_png(side: u32) -> Vec<u8> {
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
    let img = image::RgbImage::from_fn(side, side, |_, _| {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let [r, g, b, ..] = seed.to_be_bytes();
        image::Rgb([r, g, b])
    });
    encode_png(&img)
}

fn encode_png(img: &image::RgbImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn data_url(bytes: &[u8]) -> String {
    use base64::Engine;

    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:image/png;base64,{encoded}")
}
