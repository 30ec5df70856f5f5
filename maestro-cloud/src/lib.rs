//! maestro-cloud: multi-tenant digital menu service
//!
//! - Public menu pages addressed by restaurant slug, with computed prices
//! - Tenant dashboard API (categories, items, theme, promotions, discounts)
//! - Superadmin tenant lifecycle (create, suspend, cancel)
//!
//! Storage is SQLite through `sqlx`; HTTP is `axum`.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod images;
pub mod pricing;
pub mod state;
pub mod util;
pub mod validation;

pub use config::Config;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
