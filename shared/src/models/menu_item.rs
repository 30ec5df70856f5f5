//! Menu Item Model

use super::serde_helpers::deserialize_some;
use serde::{Deserialize, Serialize};

/// Dietary flags shown as badges on the public menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietaryFlags {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub spicy: bool,
}

/// Menu item entity
///
/// `price` is the base price. The final price is always derived by the
/// pricing engine and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// Direct discount percentage (0-100)
    pub discount: Option<f64>,
    pub is_available: bool,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub allergens: Vec<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub dietary: DietaryFlags,
    pub prep_time_minutes: Option<u32>,
    /// Ingredient identifiers, matched against the unavailable list
    #[cfg_attr(feature = "db", sqlx(json))]
    pub ingredients: Vec<String>,
    pub image: Option<String>,
    pub sort_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount: Option<f64>,
    pub is_available: Option<bool>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dietary: DietaryFlags,
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub image: Option<String>,
    pub sort_order: Option<i32>,
}

/// Update menu item payload. Nullable fields accept `null` to clear.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub discount: Option<Option<f64>>,
    pub is_available: Option<bool>,
    pub allergens: Option<Vec<String>>,
    pub dietary: Option<DietaryFlags>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub prep_time_minutes: Option<Option<u32>>,
    pub ingredients: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub image: Option<Option<String>>,
    pub sort_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults() {
        let c: MenuItemCreate = serde_json::from_str(
            r#"{"category_id": 1, "name": "Completo", "price": 2500}"#,
        )
        .unwrap();
        assert!(c.allergens.is_empty());
        assert_eq!(c.dietary, DietaryFlags::default());
        assert!(c.discount.is_none());
    }

    #[test]
    fn update_clears_discount_with_null() {
        let u: MenuItemUpdate = serde_json::from_str(r#"{"discount": null}"#).unwrap();
        assert_eq!(u.discount, Some(None));
        let u: MenuItemUpdate = serde_json::from_str(r#"{"price": 10}"#).unwrap();
        assert_eq!(u.discount, None);
    }

    #[test]
    fn partial_dietary_flags() {
        let d: DietaryFlags = serde_json::from_str(r#"{"vegan": true}"#).unwrap();
        assert!(d.vegan);
        assert!(!d.spicy);
    }
}
