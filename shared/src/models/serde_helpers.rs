//! Serde helpers for partial-update payloads

use serde::{Deserialize, Deserializer};

/// Distinguish an explicit `null` from an absent field
///
/// Use with `#[serde(default, deserialize_with = "deserialize_some")]` on an
/// `Option<Option<T>>` field:
/// - field absent: `None` (leave unchanged)
/// - `null`: `Some(None)` (reset)
/// - value: `Some(Some(v))`
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Deserialize bool that treats null as true
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(true))
}
