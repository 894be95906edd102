//! Provider model.
//!
//! Providers are the card templates published by Stocard: issuer name,
//! default barcode format and, separately, a logo.

use serde::Deserialize;

use crate::model::lenient_text;

/// Barcode format used when neither the card nor its provider names one.
pub const DEFAULT_BARCODE_FORMAT: &str = "QR_CODE";

/// Issuer metadata for a loyalty card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Provider {
    /// Display name; cards whose provider has none are not exported
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,

    /// Barcode format used when the card does not set one
    #[serde(default, deserialize_with = "lenient_text")]
    pub default_barcode_format: Option<String>,
}

impl Provider {
    /// Parse a provider document.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not a JSON object of the expected shape.
    pub fn from_slice(content: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(content)
    }

    /// Non-empty display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Pick the barcode format for a card of this provider.
    ///
    /// The card's own format wins, then the provider default, then
    /// [`DEFAULT_BARCODE_FORMAT`].
    #[must_use]
    pub fn resolve_barcode_format<'a>(&'a self, card_format: Option<&'a str>) -> &'a str {
        card_format
            .or_else(|| {
                self.default_barcode_format
                    .as_deref()
                    .filter(|f| !f.is_empty())
            })
            .unwrap_or(DEFAULT_BARCODE_FORMAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_required() {
        let provider = Provider::from_slice(br#"{"default_barcode_format": "EAN_13"}"#).unwrap();
        assert_eq!(provider.name(), None);

        let provider = Provider::from_slice(br#"{"name": ""}"#).unwrap();
        assert_eq!(provider.name(), None);

        let provider = Provider::from_slice(br#"{"name": "Cafe"}"#).unwrap();
        assert_eq!(provider.name(), Some("Cafe"));
    }

    #[test]
    fn test_numeric_name() {
        let provider = Provider::from_slice(br#"{"name": 42}"#).unwrap();
        assert_eq!(provider.name(), Some("42"));
    }

    #[test]
    fn test_barcode_format_precedence() {
        let provider =
            Provider::from_slice(br#"{"name": "Cafe", "default_barcode_format": "EAN_13"}"#)
                .unwrap();
        assert_eq!(provider.resolve_barcode_format(Some("CODE_128")), "CODE_128");
        assert_eq!(provider.resolve_barcode_format(None), "EAN_13");

        let bare = Provider::from_slice(br#"{"name": "Cafe"}"#).unwrap();
        assert_eq!(bare.resolve_barcode_format(None), "QR_CODE");
    }
}
