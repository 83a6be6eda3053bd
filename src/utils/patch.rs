//! Tri-state patch field
//!
//! Partial-update payloads need to tell apart a key that was left out
//! ("keep the stored value") from a key explicitly set to `null`
//! ("clear the stored value"). `Option<Option<T>>` collapses both into `None`
//! under serde, so request types use [`FieldUpdate`] instead.
//!
//! Fields must be declared with
//! `#[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]`
//! so that a missing key deserializes to [`FieldUpdate::Unchanged`] and is
//! omitted again on serialization.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Key absent: leave the stored value alone
    Unchanged,
    /// Explicit `null`: remove the stored value
    Clear,
    /// New value
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Unchanged
    }
}

impl<T> FieldUpdate<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Writes the update into `target`. Returns `true` when `target` was touched.
    pub fn apply(self, target: &mut Option<T>) -> bool {
        match self {
            FieldUpdate::Unchanged => false,
            FieldUpdate::Clear => {
                *target = None;
                true
            },
            FieldUpdate::Set(value) => {
                *target = Some(value);
                true
            },
        }
    }
}

impl<T> From<Option<Option<T>>> for FieldUpdate<T> {
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => FieldUpdate::Unchanged,
            Some(None) => FieldUpdate::Clear,
            Some(Some(v)) => FieldUpdate::Set(v),
        }
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldUpdate::Set(value) => serializer.serialize_some(value),
            // `Unchanged` is normally skipped by the field attribute
            FieldUpdate::Clear | FieldUpdate::Unchanged => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        })
    }
}
