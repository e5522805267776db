//! Field-presence wrapper for partial updates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single field of a partial update.
///
/// `Absent` means the field was not part of the payload and must be left
/// untouched. `Present` carries the new value. For nullable columns use
/// `Patch<Option<T>>`, so that an explicit JSON `null` becomes
/// `Present(None)` and clears the column.
///
/// Fields of this type need `#[serde(default)]` so a missing key
/// deserializes to `Absent`.
///
/// ```
/// use serde::Deserialize;
/// use shop_ve_sinh_core::Patch;
///
/// #[derive(Deserialize)]
/// struct Update {
///     #[serde(default)]
///     note: Patch<Option<String>>,
/// }
///
/// let missing: Update = serde_json::from_str("{}").unwrap();
/// assert!(missing.note.is_absent());
///
/// let cleared: Update = serde_json::from_str(r#"{"note": null}"#).unwrap();
/// assert_eq!(cleared.note, Patch::Present(None));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field not supplied.
    Absent,
    /// Field supplied with a value.
    Present(T),
}

impl<T> Patch<T> {
    /// Returns `true` if the field was not supplied.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Overwrite `target` if the field was supplied.
    pub fn apply_to(self, target: &mut T) {
        if let Self::Present(value) = self {
            *target = value;
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Self::Present(value)
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
        T::deserialize(deserializer).map(Self::Present)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Present(value) => value.serialize(serializer),
        }
    }
}
