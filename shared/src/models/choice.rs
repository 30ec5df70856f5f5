//! Explicit "configured or default" settings

use serde::{Deserialize, Serialize};

/// A setting that is either configured by the restaurant or falls back to
/// the system default.
///
/// Serialized with its tag so clients can tell the two apart:
/// `{"source": "configured", "value": ...}` or `{"source": "default"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum Choice<T> {
    Configured(T),
    Default,
}

impl<T> Choice<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Configured(v),
            None => Self::Default,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    pub fn configured(&self) -> Option<&T> {
        match self {
            Self::Configured(v) => Some(v),
            Self::Default => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Choice<U> {
        match self {
            Self::Configured(v) => Choice::Configured(f(v)),
            Self::Default => Choice::Default,
        }
    }

    /// Resolve to the configured value or the given default
    pub fn resolve(self, default: T) -> T {
        match self {
            Self::Configured(v) => v,
            Self::Default => default,
        }
    }
}
