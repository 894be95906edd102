//! Data models for the Stocard store.
//!
//! This module contains the JSON documents read from `synced_resources`:
//! - LoyaltyCard
//! - Provider
//!
//! Text fields are read leniently: a number or boolean where a string is
//! expected is kept in its JSON text form instead of rejecting the document.

pub mod card;
pub mod provider;

pub use card::{LoyaltyCard, ProviderReference};
pub use provider::{DEFAULT_BARCODE_FORMAT, Provider};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional text field from any JSON scalar.
///
/// `null` becomes `None`; strings are taken as is; every other value keeps
/// its JSON text, so `1234` reads as `"1234"`.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Doc {
        #[serde(default, deserialize_with = "lenient_text")]
        field: Option<String>,
    }

    fn field(json: &str) -> Option<String> {
        serde_json::from_str::<Doc>(json).unwrap().field
    }

    #[test]
    fn test_lenient_text() {
        assert_eq!(field(r#"{"field": "abc"}"#).as_deref(), Some("abc"));
        assert_eq!(field(r#"{"field": 1234}"#).as_deref(), Some("1234"));
        assert_eq!(field(r#"{"field": 12.5}"#).as_deref(), Some("12.5"));
        assert_eq!(field(r#"{"field": true}"#).as_deref(), Some("true"));
        assert_eq!(field(r#"{"field": null}"#), None);
        assert_eq!(field("{}"), None);
    }
}
