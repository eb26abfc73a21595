//! Boundary between the raw tag text and a structured tag list.
//!
//! Tags are stored and transmitted as one comma-delimited string. Everything
//! that needs individual tags goes through [`parse_tags`]; anything that
//! writes tags back goes through [`join_tags`].

/// Maximum tag length in characters, enforced by client-side validation.
pub const MAX_TAG_LENGTH: usize = 10;

/// Tag separator in the raw text.
pub const TAG_SEPARATOR: char = ',';

/// Splits raw tag text into trimmed, non-empty tags in their original order.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins tags into raw text, trimming each and skipping empty ones.
#[must_use]
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|tag| tag.as_ref().trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Returns the tags that exceed [`MAX_TAG_LENGTH`] characters.
#[must_use]
pub fn oversized_tags(raw: &str) -> Vec<String> {
    parse_tags(raw)
        .into_iter()
        .filter(|tag| tag.chars().count() > MAX_TAG_LENGTH)
        .collect()
}
