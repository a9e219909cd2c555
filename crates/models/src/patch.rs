//! Serde helpers for partial-update payloads.

use serde::{Deserialize, Deserializer};

/// Distinguish "field absent" (`None`) from "field explicitly null"
/// (`Some(None)`) when deserializing nullable columns in a patch.
///
/// Use together with `#[serde(default)]`.
pub fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
