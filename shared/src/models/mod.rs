//! Data models
//!
//! Shared between maestro-cloud and the dashboard frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod banner;
pub mod category;
pub mod choice;
pub mod ingredient;
pub mod menu_item;
pub mod restaurant;
pub mod scheduled_discount;
pub mod serde_helpers;
pub mod theme;

// Re-exports
pub use banner::*;
pub use category::*;
pub use choice::*;
pub use ingredient::*;
pub use menu_item::*;
pub use restaurant::*;
pub use scheduled_discount::*;
pub use theme::*;
