use serde::{Deserialize, Deserializer};

pub mod categories;
pub mod orders;
pub mod products;

/// Patch field reader: absent stays `None` (via `#[serde(default)]`), `null` becomes
/// `Some(None)` and a value becomes `Some(Some(value))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
