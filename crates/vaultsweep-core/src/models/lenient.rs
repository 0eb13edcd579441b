//! Field decoders that treat a wrongly-typed value as absent.
//!
//! Exports produced by other tools (or edited by hand) occasionally carry a
//! number where a string is expected, or a bare string in a URI list. One bad
//! field must not abort decoding the whole vault, so these decoders fall back
//! to the field's default and leave it to the filters to drop the item.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::LoginUri;

pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            tracing::warn!("treating malformed field as missing: {e}");
            Ok(T::default())
        }
    }
}

/// Like [`or_default`] but per entry: a non-object entry becomes an empty
/// [`LoginUri`] instead of discarding the whole list.
pub(crate) fn uri_list<'de, D>(deserializer: D) -> Result<Option<Vec<LoginUri>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    let uris = entries
        .into_iter()
        .map(|entry| {
            serde_json::from_value(entry).unwrap_or_else(|e| {
                tracing::warn!("treating malformed URI entry as empty: {e}");
                LoginUri::default()
            })
        })
        .collect();
    Ok(Some(uris))
}
