//! The filter/sort engine.
//!
//! Two passes: an O(n) case-insensitive search filter over title/subtitle,
//! then an O(n log n) stable sort keyed by [`SortKey`]. Inputs are never
//! mutated; the engine returns a fresh vector. Call sites that need bespoke
//! behavior supply a [`FilterSortFn`] honoring the same contract.

use std::sync::Arc;

use crate::item::BrowserItem;
use crate::types::SortKey;

/// Options handed to the engine by a browser instance.
#[derive(Debug, Clone, Default)]
pub struct FilterSortOptions {
    pub search_term: Option<String>,
    pub sort_by: SortKey,
}

/// Pluggable per-view replacement for [`filter_sort`]. Receives the same
/// item slice and options and must not mutate its input.
pub type FilterSortFn =
    Arc<dyn Fn(&[BrowserItem], &FilterSortOptions) -> Vec<BrowserItem> + Send + Sync>;

/// Filter by search term, then order by the sort key.
pub fn filter_sort(items: &[BrowserItem], options: &FilterSortOptions) -> Vec<BrowserItem> {
    let mut filtered = apply_search(items, options.search_term.as_deref());
    apply_sort(&mut filtered, &options.sort_by);
    filtered
}

/// Search stage: case-insensitive substring match on `title` and, when
/// present and non-empty, `subtitle`. An empty or absent term passes all
/// items through in input order.
pub fn apply_search(items: &[BrowserItem], search_term: Option<&str>) -> Vec<BrowserItem> {
    let term = match search_term {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return items.to_vec(),
    };

    items
        .iter()
        .filter(|item| {
            item.title.to_lowercase().contains(&term)
                || item
                    .subtitle
                    .as_deref()
                    .is_some_and(|s| !s.is_empty() && s.to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

/// Ordering stage. Stable: ties keep input order. An unrecognized key is an
/// identity pass, not an error.
pub fn apply_sort(items: &mut [BrowserItem], sort_by: &SortKey) {
    match sort_by {
        SortKey::Recent => {
            items.sort_by(|a, b| b.effective_timestamp().cmp(&a.effective_timestamp()));
        }
        SortKey::Alphabetical => {
            items.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        }
        SortKey::Type => {
            items.sort_by(|a, b| a.kind.to_lowercase().cmp(&b.kind.to_lowercase()));
        }
        SortKey::Other(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockId;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::Map;

    fn at(month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap()
    }

    fn item(id: u64, title: &str, subtitle: &str, kind: &str, updated: u32) -> BrowserItem {
        BrowserItem {
            id: BlockId(id),
            title: title.to_string(),
            subtitle: Some(subtitle.to_string()),
            kind: kind.to_string(),
            icon: None,
            created_at: at(1),
            updated_at: Some(at(updated)),
            metadata: Map::new(),
        }
    }

    fn opts(term: Option<&str>, sort: SortKey) -> FilterSortOptions {
        FilterSortOptions {
            search_term: term.map(|s| s.to_string()),
            sort_by: sort,
        }
    }

    fn titles(items: &[BrowserItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let items = vec![
            item(1, "Alpha Report", "", "pdf", 1),
            item(2, "beta notes", "", "text", 1),
            item(3, "Gamma", "", "code", 1),
        ];
        let out = filter_sort(&items, &opts(Some("a"), SortKey::Other("none".into())));
        assert_eq!(titles(&out), vec!["Alpha Report", "beta notes", "Gamma"]);

        let none = filter_sort(&items, &opts(Some("z"), SortKey::Other("none".into())));
        assert!(none.is_empty());
    }

    #[test]
    fn test_search_matches_subtitle() {
        let items = vec![
            item(1, "one", "docs/readme", "text", 1),
            item(2, "two", "src/main", "code", 1),
        ];
        let out = filter_sort(&items, &opts(Some("readme"), SortKey::Other("none".into())));
        assert_eq!(titles(&out), vec!["one"]);
    }

    #[test]
    fn test_empty_term_preserves_order() {
        let items = vec![item(2, "b", "", "x", 1), item(1, "a", "", "x", 1)];
        let out = filter_sort(&items, &opts(Some(""), SortKey::Other("none".into())));
        assert_eq!(titles(&out), vec!["b", "a"]);
        let out = filter_sort(&items, &opts(None, SortKey::Other("none".into())));
        assert_eq!(titles(&out), vec!["b", "a"]);
    }

    #[test]
    fn test_recent_sort_descends_by_updated_at() {
        let items = vec![
            item(1, "jan", "", "x", 1),
            item(2, "mar", "", "x", 3),
            item(3, "feb", "", "x", 2),
        ];
        let out = filter_sort(&items, &opts(None, SortKey::Recent));
        assert_eq!(titles(&out), vec!["mar", "feb", "jan"]);
    }

    #[test]
    fn test_recent_sort_falls_back_to_created_at() {
        let mut no_update = item(1, "old", "", "x", 1);
        no_update.updated_at = None;
        no_update.created_at = at(5);
        let items = vec![item(2, "newer", "", "x", 3), no_update];
        let out = filter_sort(&items, &opts(None, SortKey::Recent));
        assert_eq!(titles(&out), vec!["old", "newer"]);
    }

    #[test]
    fn test_alphabetical_sort_folds_case() {
        let items = vec![
            item(1, "Banana", "", "x", 1),
            item(2, "apple", "", "x", 1),
            item(3, "Cherry", "", "x", 1),
        ];
        let out = filter_sort(&items, &opts(None, SortKey::Alphabetical));
        assert_eq!(titles(&out), vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn test_type_sort() {
        let items = vec![
            item(1, "a", "", "text", 1),
            item(2, "b", "", "channel", 1),
            item(3, "c", "", "pdf", 1),
        ];
        let out = filter_sort(&items, &opts(None, SortKey::Type));
        assert_eq!(titles(&out), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let items = vec![
            item(1, "b", "", "x", 2),
            item(2, "a", "", "x", 2),
            item(3, "c", "", "x", 2),
        ];
        let once = filter_sort(&items, &opts(None, SortKey::Recent));
        // All timestamps equal: input order preserved.
        assert_eq!(titles(&once), vec!["b", "a", "c"]);
        let twice = filter_sort(&once, &opts(None, SortKey::Recent));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_sort_key_is_identity() {
        let items = vec![item(2, "b", "", "x", 2), item(1, "a", "", "x", 1)];
        let out = filter_sort(&items, &opts(None, SortKey::Other("shuffled".into())));
        assert_eq!(titles(&out), vec!["b", "a"]);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let items = vec![
            item(1, "b", "", "x", 1),
            item(2, "a", "", "x", 2),
        ];
        let before = items.clone();
        let _ = filter_sort(&items, &opts(Some("a"), SortKey::Alphabetical));
        assert_eq!(items, before);
    }
}
