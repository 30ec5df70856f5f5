//! Unavailable Ingredients

use serde::{Deserialize, Serialize};

/// The set of ingredients a restaurant has marked as out of stock.
/// Used both as response and as replace-all payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableIngredients {
    pub ingredients: Vec<String>,
}
