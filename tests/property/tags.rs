//! Property tests for the tag text boundary and input validation.
//!
//! Uses proptest to verify:
//! 1. Parsed tags are always trimmed and non-empty.
//! 2. `join_tags` followed by `parse_tags` is stable.
//! 3. Arbitrary raw tag text never panics the parser or the snapshot decoder.
//! 4. Validation never accepts a blank title.

use proptest::prelude::*;
use taskboard_proto::codec;
use taskboard_proto::input::{TaskInput, ValidationError};
use taskboard_proto::tags::{MAX_TAG_LENGTH, join_tags, oversized_tags, parse_tags};

/// Strategy for a single tag word without separators.
fn arb_tag() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,16}"
}

/// Strategy for raw tag text with irregular spacing and empty slots.
fn arb_raw_tags() -> impl Strategy<Value = String> {
    prop::collection::vec((arb_tag(), " {0,2}", " {0,2}"), 0..8).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(tag, pre, post)| format!("{pre}{tag}{post}"))
            .collect::<Vec<_>>()
            .join(",")
    })
}

proptest! {
    /// Every parsed tag is trimmed and non-empty.
    #[test]
    fn parsed_tags_are_trimmed(raw in ".*") {
        for tag in parse_tags(&raw) {
            prop_assert!(!tag.is_empty());
            prop_assert_eq!(tag.trim(), tag.as_str());
            prop_assert!(!tag.contains(','));
        }
    }

    /// Joining parsed tags and parsing again yields the same list.
    #[test]
    fn join_then_parse_is_stable(raw in arb_raw_tags()) {
        let parsed = parse_tags(&raw);
        let joined = join_tags(&parsed);
        prop_assert_eq!(parse_tags(&joined), parsed);
    }

    /// Oversized detection agrees with the character limit.
    #[test]
    fn oversized_matches_limit(tags in prop::collection::vec(arb_tag(), 0..6)) {
        let raw = tags.join(", ");
        let expected: Vec<String> = tags
            .into_iter()
            .filter(|t| t.chars().count() > MAX_TAG_LENGTH)
            .collect();
        prop_assert_eq!(oversized_tags(&raw), expected);
    }

    /// Whitespace-only titles are always reported missing.
    #[test]
    fn blank_title_never_validates(title in "[ \t]{0,8}") {
        let input = TaskInput {
            title: Some(title),
            due_date: Some("2024-01-01".to_string()),
            status: Some("Completed".to_string()),
            ..TaskInput::default()
        };
        prop_assert_eq!(input.validate(), Err(ValidationError::MissingTitle));
    }

    /// Random bytes never cause a panic in the snapshot decoder.
    #[test]
    fn random_bytes_decode_no_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = codec::decode_snapshot(&bytes);
    }
}
