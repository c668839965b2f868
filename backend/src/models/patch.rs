//! Three-state field wrapper for partial updates.

use serde::{Deserialize, Deserializer};

/// A field in a partial update.
///
/// JSON distinguishes a key that is missing from a key that is `null`, and the
/// update contract relies on that difference:
///
/// - `Absent`: key not sent, the stored value is left untouched
/// - `Null`: key sent as `null`, the stored value is reset to its default
/// - `Value(v)`: key sent with a value, the stored value becomes `v`
///
/// Use `#[serde(default)]` on the containing field so a missing key
/// deserializes to `Absent`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    /// The supplied value, discarding the `Absent`/`Null` distinction.
    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Resolve into the value to write, if any.
    ///
    /// `Null` resolves to `default()`; `Absent` resolves to `None`.
    pub fn resolve_with(self, default: impl FnOnce() -> T) -> Option<T> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(default()),
            Patch::Value(v) => Some(v),
        }
    }

    /// Apply this patch to an existing value in place.
    pub fn apply_to(self, target: &mut T, default: impl FnOnce() -> T) {
        if let Some(v) = self.resolve_with(default) {
            *target = v;
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Null, Patch::Value)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}
