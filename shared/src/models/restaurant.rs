//! Restaurant (tenant) Model

use super::serde_helpers::deserialize_some;
use serde::{Deserialize, Serialize};

/// Subscription status. Cancellation is a soft delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum RestaurantStatus {
    #[default]
    Active,
    Cancelled,
    Suspended,
}

impl RestaurantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Suspended => "suspended",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    /// URL key of the public menu
    pub slug: String,
    pub name: String,
    /// Argon2 PHC string, never sent to clients
    #[serde(skip)]
    pub hashed_password: String,
    pub status: RestaurantStatus,
    pub owner_id: Option<String>,
    pub is_demo: bool,
    pub currency_code: Option<String>,
    pub timezone: Option<String>,
    pub theme_id: Option<String>,
    /// Stored file name under the restaurant's upload directory
    pub logo: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create restaurant payload (superadmin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub slug: String,
    pub name: String,
    pub password: String,
    pub owner_id: Option<String>,
    pub is_demo: Option<bool>,
    pub currency_code: Option<String>,
    pub timezone: Option<String>,
    pub theme_id: Option<String>,
}

/// Update restaurant payload (superadmin)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub status: Option<RestaurantStatus>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub owner_id: Option<Option<String>>,
    pub is_demo: Option<bool>,
}

/// Tenant-editable display settings. `null` resets a field to the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeUpdate {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub theme_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub currency_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub timezone: Option<Option<String>>,
}
