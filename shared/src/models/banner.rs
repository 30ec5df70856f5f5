//! Promotion Banner Model

use serde::{Deserialize, Serialize};

/// Promotion banner, at most one per restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PromotionBanner {
    pub restaurant_id: i64,
    pub is_visible: bool,
    pub title: String,
    pub subtitle: Option<String>,
    /// `#RGB` or `#RRGGBB`
    pub background_color: String,
    pub text_color: String,
    pub updated_at: i64,
}

/// Banner upsert payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerInput {
    #[serde(default)]
    pub is_visible: bool,
    pub title: String,
    pub subtitle: Option<String>,
    pub background_color: String,
    pub text_color: String,
}
