//! Feed registry — loads all feed definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/feed/feeds/` is baked into the binary at
//! compile time via [`include_str!`]. Adding a new feed is as simple as
//! creating a new TOML file and adding it to the list below.

use crate::feed_def::{FeedDefinition, parse_feed_toml};

/// TOML configs embedded at compile time.
const FEED_TOMLS: &[(&str, &str)] = &[
    ("chicago_crimes", include_str!("../feeds/chicago_crimes.toml")),
    ("chicago_calls", include_str!("../feeds/chicago_calls.toml")),
];

/// Returns all configured feed definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if an embedded TOML fails to parse. The registry is validated
/// by tests, so a parse failure is a build defect, not a runtime
/// condition.
#[must_use]
pub fn all_feeds() -> Vec<FeedDefinition> {
    FEED_TOMLS
        .iter()
        .map(|(id, toml)| {
            parse_feed_toml(toml)
                .unwrap_or_else(|e| panic!("embedded feed config {id:?} is invalid: {e}"))
        })
        .collect()
}

/// Looks up a feed definition by ID.
#[must_use]
pub fn find_feed(id: &str) -> Option<FeedDefinition> {
    all_feeds().into_iter().find(|f| f.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_embedded_feeds_parse() {
        let feeds = all_feeds();
        assert_eq!(feeds.len(), FEED_TOMLS.len());
    }

    #[test]
    fn registry_keys_match_definition_ids() {
        for ((key, _), def) in FEED_TOMLS.iter().zip(all_feeds()) {
            assert_eq!(*key, def.id, "registry key and TOML id diverged");
        }
    }

    #[test]
    fn find_feed_by_id() {
        assert!(find_feed("chicago_crimes").is_some());
        assert!(find_feed("nope").is_none());
    }
}
