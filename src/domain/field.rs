//! Tri-state field for partial updates
//!
//! Distinguishes "leave as is" from "clear the value" for optional fields.

use serde::{Deserialize, Deserializer};

/// Requested change to an optional field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldUpdate<T> {
    /// Field not supplied
    #[default]
    Unset,
    /// Replace the value
    Set(T),
    /// Remove the value
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldUpdate::Unset)
    }

    /// Resolve against the current value
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            FieldUpdate::Unset => current,
            FieldUpdate::Set(value) => Some(value),
            FieldUpdate::Clear => None,
        }
    }

    pub fn as_ref(&self) -> FieldUpdate<&T> {
        match self {
            FieldUpdate::Unset => FieldUpdate::Unset,
            FieldUpdate::Set(value) => FieldUpdate::Set(value),
            FieldUpdate::Clear => FieldUpdate::Clear,
        }
    }
}

// A missing key falls back to `Unset` through `#[serde(default)]`; an explicit
// null arrives here as `None`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        })
    }
}
