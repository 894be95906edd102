//! Loyalty card model.
//!
//! A loyalty card is one user's instance of a provider's card, stored as a
//! JSON document under `/users/{user}/loyalty-cards/`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::lenient_text;
use crate::storage::collection::last_segment;

/// Reference from a card to its provider document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderReference {
    /// Path of the provider, e.g. `/loyalty-card-providers/p7`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub identifier: Option<String>,
}

/// A user's loyalty card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoyaltyCard {
    /// Provider this card belongs to
    #[serde(default, deserialize_with = "lenient_reference")]
    pub input_provider_reference: Option<ProviderReference>,

    /// Card number as entered or scanned
    #[serde(default, deserialize_with = "lenient_text")]
    pub input_id: Option<String>,

    /// Barcode format chosen for this card, overriding the provider default
    #[serde(default, deserialize_with = "lenient_text")]
    pub input_barcode_format: Option<String>,
}

/// A reference that is not an object counts as no reference.
fn lenient_reference<'de, D>(deserializer: D) -> Result<Option<ProviderReference>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| ProviderReference::deserialize(value).ok()))
}

impl LoyaltyCard {
    /// Parse a card document.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not a JSON object of the expected shape.
    pub fn from_slice(content: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(content)
    }

    /// Id of the referenced provider: the last segment of its identifier.
    ///
    /// `None` when the card carries no (or an empty) provider reference.
    #[must_use]
    pub fn provider_id(&self) -> Option<&str> {
        self.input_provider_reference
            .as_ref()
            .and_then(|r| r.identifier.as_deref())
            .filter(|id| !id.is_empty())
            .map(last_segment)
    }

    /// Card number, empty if missing.
    #[must_use]
    pub fn card_number(&self) -> &str {
        self.input_id.as_deref().unwrap_or_default()
    }

    /// Barcode format set on the card itself, if non-empty.
    #[must_use]
    pub fn barcode_format(&self) -> Option<&str> {
        self.input_barcode_format
            .as_deref()
            .filter(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_card() {
        let card = LoyaltyCard::from_slice(
            br#"{
                "input_provider_reference": {"identifier": "/loyalty-card-providers/p7"},
                "input_id": "1234",
                "input_barcode_format": "EAN_13",
                "created": {"value": "2024-01-01"}
            }"#,
        )
        .unwrap();

        assert_eq!(card.provider_id(), Some("p7"));
        assert_eq!(card.card_number(), "1234");
        assert_eq!(card.barcode_format(), Some("EAN_13"));
    }

    #[test]
    fn test_missing_fields() {
        let card = LoyaltyCard::from_slice(b"{}").unwrap();
        assert_eq!(card.provider_id(), None);
        assert_eq!(card.card_number(), "");
        assert_eq!(card.barcode_format(), None);
    }

    #[test]
    fn test_empty_reference_and_format() {
        let card = LoyaltyCard::from_slice(
            br#"{"input_provider_reference": {"identifier": ""}, "input_barcode_format": ""}"#,
        )
        .unwrap();
        assert_eq!(card.provider_id(), None);
        assert_eq!(card.barcode_format(), None);
    }

    #[test]
    fn test_non_string_fields_kept_as_text() {
        let card = LoyaltyCard::from_slice(
            br#"{"input_provider_reference": {"identifier": 77}, "input_id": 1234}"#,
        )
        .unwrap();
        assert_eq!(card.provider_id(), Some("77"));
        assert_eq!(card.card_number(), "1234");
    }

    #[test]
    fn test_reference_that_is_not_an_object() {
        let card = LoyaltyCard::from_slice(br#"{"input_provider_reference": "p7"}"#).unwrap();
        assert_eq!(card.provider_id(), None);
    }

    #[test]
    fn test_invalid_json() {
        assert!(LoyaltyCard::from_slice(b"not json").is_err());
    }
}
