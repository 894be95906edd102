//! Collection path handling.
//!
//! Collections are slash-delimited paths with a leading and trailing slash,
//! e.g. `/users/u1/loyalty-cards/` or
//! `/loyalty-card-providers/p7/`. Splitting on `/` yields an empty first and
//! last segment, so the user id of a card collection sits at index 2.
//!
//! SQL `LIKE` is used to narrow candidates, but `%` also matches `/` and
//! `LIKE` is case-insensitive, so every match is confirmed here segment by
//! segment.

/// Collection segment holding a user's loyalty cards.
pub const LOYALTY_CARDS_SEGMENT: &str = "loyalty-cards";

/// Collection segment holding provider metadata and logos.
pub const PROVIDERS_SEGMENT: &str = "loyalty-card-providers";

/// Collection segment holding a card's images.
pub const IMAGES_SEGMENT: &str = "images";

/// Local id of a provider's logo row.
pub const LOGO_ID: &str = "logo";

/// Escape `LIKE` wildcards in a literal, for use with `ESCAPE '\'`.
#[must_use]
pub fn escape_like(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// User id of a loyalty card collection (third `/`-delimited segment).
#[must_use]
pub fn user_id(collection: &str) -> Option<&str> {
    collection.split('/').nth(2).filter(|s| !s.is_empty())
}

/// Last `/`-delimited segment of a reference such as
/// `/loyalty-card-providers/p7`.
#[must_use]
pub fn last_segment(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

fn segments(collection: &str) -> Option<Vec<&str>> {
    let inner = collection.strip_prefix('/')?.strip_suffix('/')?;
    Some(inner.split('/').collect())
}

/// `LIKE` pattern for every user's loyalty card collection.
#[must_use]
pub fn loyalty_cards_like() -> String {
    format!("/users/%/{LOYALTY_CARDS_SEGMENT}/")
}

/// Whether `collection` is exactly `/users/{user}/loyalty-cards/`.
#[must_use]
pub fn is_loyalty_cards(collection: &str) -> bool {
    matches!(
        segments(collection).as_deref(),
        Some(["users", user, LOYALTY_CARDS_SEGMENT]) if !user.is_empty()
    )
}

/// `LIKE` pattern for the collection holding a provider's logo.
#[must_use]
pub fn provider_logo_like(provider_id: &str) -> String {
    format!("%/{PROVIDERS_SEGMENT}/{}/", escape_like(provider_id))
}

/// Whether `collection` ends with `/loyalty-card-providers/{provider_id}/`.
#[must_use]
pub fn is_provider_logo(collection: &str, provider_id: &str) -> bool {
    match segments(collection) {
        Some(parts) => parts.ends_with(&[PROVIDERS_SEGMENT, provider_id]),
        None => false,
    }
}

/// Exact collection of a card's images.
#[must_use]
pub fn card_images(user_id: &str, card_id: &str) -> String {
    format!("/users/{user_id}/{LOYALTY_CARDS_SEGMENT}/{card_id}/{IMAGES_SEGMENT}/")
}

/// `LIKE` pattern for a card's images collection.
#[must_use]
pub fn card_images_like(user_id: &str, card_id: &str) -> String {
    card_images(&escape_like(user_id), &escape_like(card_id))
}
