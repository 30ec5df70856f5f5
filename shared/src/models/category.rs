//! Category Model

use serde::{Deserialize, Serialize};

/// Menu category. Display order is `sort_order ASC, id ASC`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub is_visible: bool,
    pub sort_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub is_visible: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub is_visible: Option<bool>,
    pub sort_order: Option<i32>,
}

/// One entry of a reorder request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SortOrderItem {
    pub id: i64,
    pub sort_order: i32,
}

/// Reorder payload: `{"items": [{"id": 1, "sort_order": 0}, ...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReorder {
    pub items: Vec<SortOrderItem>,
}
