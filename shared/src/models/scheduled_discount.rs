//! Scheduled Discount Model

use serde::{Deserialize, Serialize};

/// Recurring time-window discount on one category
///
/// `days` uses 0=Sunday..6=Saturday. Times are local wall-clock `"HH:MM"`
/// in the restaurant's timezone. The window is `[start_time, end_time)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ScheduledDiscount {
    pub id: i64,
    pub restaurant_id: i64,
    pub category_id: i64,
    pub discount: f64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub days: Vec<u8>,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// One discount of a replace-all request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledDiscountInput {
    pub category_id: i64,
    pub discount: f64,
    pub days: Vec<u8>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Replace-all payload: `{"discounts": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledDiscountsReplace {
    pub discounts: Vec<ScheduledDiscountInput>,
}
