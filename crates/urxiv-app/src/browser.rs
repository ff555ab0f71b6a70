//! The generic browser view-model.
//!
//! Owns only transient UI state (search term, sort choice) and the
//! presentation inputs its owner hands in. Every [`Browser::render`] call
//! recomputes the filter/sort pipeline over the current items; there is no
//! asynchronous work and no data loading anywhere in this component — the
//! owning view loads data and pushes results in.

use chrono::{DateTime, Utc};

use urxiv_core::{
    filter_sort, BlockId, BrowserItem, FilterSortFn, FilterSortOptions, Icon, SortKey, SortOption,
};

/// Shown when items exist but the current search filters all of them out.
/// Distinct from the owner-supplied empty message, which means "no items at
/// all".
pub const NO_MATCH_MESSAGE: &str = "No items match your current filters.";

const DEFAULT_EMPTY_MESSAGE: &str = "No items found";
const DEFAULT_LOADING_MESSAGE: &str = "Loading items...";

/// Exactly one of these is produced per render. Loading wins over error;
/// error wins over list/empty.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserView {
    Loading { message: String },
    Error { message: String },
    Empty { message: String },
    Items(Vec<BrowserItem>),
}

/// Default row projection: what the structurally-defined row renderer
/// displays when the owner does not render items itself.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserRow {
    pub id: BlockId,
    pub icon: Option<Icon>,
    pub title: String,
    pub subtitle: Option<String>,
    pub kind: String,
    /// `updated_at` (falling back to `created_at`) as `Mon D, YYYY`.
    pub date: String,
}

type ClickHandler = Box<dyn Fn(BlockId) + Send + Sync>;

pub struct Browser {
    items: Vec<BrowserItem>,
    search_term: String,
    sort_key: SortKey,
    is_loading: bool,
    error: Option<String>,
    empty_message: String,
    loading_message: String,
    sort_options: Vec<SortOption>,
    filter_sort_override: Option<FilterSortFn>,
    on_item_click: Option<ClickHandler>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

impl Browser {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            search_term: String::new(),
            sort_key: SortKey::default(),
            is_loading: false,
            error: None,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            loading_message: DEFAULT_LOADING_MESSAGE.to_string(),
            sort_options: vec![
                SortOption::new(SortKey::Recent, "Most Recent"),
                SortOption::new(SortKey::Alphabetical, "Alphabetical"),
            ],
            filter_sort_override: None,
            on_item_click: None,
        }
    }

    // -- construction-time configuration --

    pub fn with_empty_message(mut self, message: &str) -> Self {
        self.empty_message = message.to_string();
        self
    }

    pub fn with_loading_message(mut self, message: &str) -> Self {
        self.loading_message = message.to_string();
        self
    }

    pub fn with_sort_options(mut self, options: Vec<SortOption>) -> Self {
        self.sort_options = options;
        self
    }

    /// Replace the default filter/sort engine for this browser. The
    /// override receives the same inputs and must honor the no-mutation
    /// contract.
    pub fn with_filter_sort(mut self, f: FilterSortFn) -> Self {
        self.filter_sort_override = Some(f);
        self
    }

    pub fn on_item_click(mut self, handler: impl Fn(BlockId) + Send + Sync + 'static) -> Self {
        self.on_item_click = Some(Box::new(handler));
        self
    }

    // -- state handed in by the owning view --

    pub fn set_items(&mut self, items: Vec<BrowserItem>) {
        self.items = items;
    }

    pub fn items(&self) -> &[BrowserItem] {
        &self.items
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // -- the only user-driven state transitions --

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    pub fn sort_key(&self) -> &SortKey {
        &self.sort_key
    }

    pub fn sort_options(&self) -> &[SortOption] {
        &self.sort_options
    }

    /// Invoke the registered click handler, exactly once. The browser
    /// performs no navigation itself.
    pub fn click(&self, id: BlockId) {
        if let Some(handler) = &self.on_item_click {
            handler(id);
        }
    }

    fn displayed(&self) -> Vec<BrowserItem> {
        let options = FilterSortOptions {
            search_term: if self.search_term.is_empty() {
                None
            } else {
                Some(self.search_term.clone())
            },
            sort_by: self.sort_key.clone(),
        };
        match &self.filter_sort_override {
            Some(f) => f(&self.items, &options),
            None => filter_sort(&self.items, &options),
        }
    }

    /// Compute the single render state for the current inputs.
    pub fn render(&self) -> BrowserView {
        if self.is_loading {
            return BrowserView::Loading {
                message: self.loading_message.clone(),
            };
        }
        if let Some(error) = &self.error {
            return BrowserView::Error {
                message: error.clone(),
            };
        }

        let displayed = self.displayed();
        if displayed.is_empty() {
            let message = if self.items.is_empty() {
                self.empty_message.clone()
            } else {
                NO_MATCH_MESSAGE.to_string()
            };
            return BrowserView::Empty { message };
        }
        BrowserView::Items(displayed)
    }

    /// Default row projection over the rendered item list; empty for the
    /// non-list render states.
    pub fn rows(&self) -> Vec<BrowserRow> {
        match self.render() {
            BrowserView::Items(items) => items
                .into_iter()
                .map(|item| BrowserRow {
                    id: item.id,
                    icon: item.icon,
                    title: item.title,
                    subtitle: item.subtitle.filter(|s| !s.is_empty()),
                    kind: item.kind.to_uppercase(),
                    date: format_date(item.updated_at.unwrap_or(item.created_at)),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// `Mon D, YYYY`, e.g. `Jan 5, 2024`.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `Month D, YYYY`, e.g. `January 5, 2024`. Used by the channel cards.
pub fn format_date_long(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Map;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn item(id: u64, title: &str) -> BrowserItem {
        BrowserItem {
            id: BlockId(id),
            title: title.to_string(),
            subtitle: Some(String::new()),
            kind: "text".to_string(),
            icon: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 2, 5, 0, 0, 0).unwrap()),
            metadata: Map::new(),
        }
    }

    #[test]
    fn test_loading_wins_over_error_and_items() {
        let mut browser = Browser::new();
        browser.set_items(vec![item(1, "a")]);
        browser.set_error(Some("boom".to_string()));
        browser.set_loading(true);
        assert!(matches!(browser.render(), BrowserView::Loading { .. }));
    }

    #[test]
    fn test_error_wins_over_items() {
        let mut browser = Browser::new();
        browser.set_items(vec![item(1, "a")]);
        browser.set_error(Some("boom".to_string()));
        let BrowserView::Error { message } = browser.render() else {
            panic!("expected error view");
        };
        assert_eq!(message, "boom");
    }

    #[test]
    fn test_empty_vs_filtered_empty() {
        let mut browser = Browser::new().with_empty_message("Nothing here yet.");
        let BrowserView::Empty { message } = browser.render() else {
            panic!("expected empty view");
        };
        assert_eq!(message, "Nothing here yet.");

        browser.set_items(vec![item(1, "alpha")]);
        browser.set_search_term("zzz");
        let BrowserView::Empty { message } = browser.render() else {
            panic!("expected empty view");
        };
        assert_eq!(message, NO_MATCH_MESSAGE);
    }

    #[test]
    fn test_render_state_exclusivity() {
        // Every combination lands in exactly one state by construction;
        // check the branch priorities across the grid.
        for is_loading in [false, true] {
            for has_error in [false, true] {
                for has_items in [false, true] {
                    let mut browser = Browser::new();
                    browser.set_loading(is_loading);
                    browser.set_error(has_error.then(|| "e".to_string()));
                    browser.set_items(if has_items { vec![item(1, "a")] } else { vec![] });

                    let view = browser.render();
                    match view {
                        BrowserView::Loading { .. } => assert!(is_loading),
                        BrowserView::Error { .. } => assert!(!is_loading && has_error),
                        BrowserView::Empty { .. } => {
                            assert!(!is_loading && !has_error && !has_items)
                        }
                        BrowserView::Items(_) => {
                            assert!(!is_loading && !has_error && has_items)
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_search_and_sort_state_drive_render() {
        let mut browser = Browser::new();
        browser.set_items(vec![item(1, "Banana"), item(2, "apple")]);
        browser.set_sort_key(SortKey::Alphabetical);
        let BrowserView::Items(items) = browser.render() else {
            panic!("expected items");
        };
        assert_eq!(items[0].title, "apple");

        browser.set_search_term("ban");
        let BrowserView::Items(items) = browser.render() else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Banana");
    }

    #[test]
    fn test_click_invokes_handler_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counted = count.clone();
        let browser = Browser::new().on_item_click(move |id| {
            assert_eq!(id, BlockId(7));
            counted.fetch_add(1, Ordering::SeqCst);
        });
        browser.click(BlockId(7));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_filter_sort_override_is_used() {
        let mut browser = Browser::new().with_filter_sort(Arc::new(|items, _| {
            let mut reversed: Vec<_> = items.to_vec();
            reversed.reverse();
            reversed
        }));
        browser.set_items(vec![item(1, "a"), item(2, "b")]);
        let BrowserView::Items(items) = browser.render() else {
            panic!("expected items");
        };
        assert_eq!(items[0].title, "b");
    }

    #[test]
    fn test_rows_format_dates_and_drop_empty_subtitles() {
        let mut browser = Browser::new();
        browser.set_items(vec![item(1, "a")]);
        let rows = browser.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "Feb 5, 2024");
        assert_eq!(rows[0].subtitle, None);
        assert_eq!(rows[0].kind, "TEXT");
    }

    #[test]
    fn test_format_date_long() {
        let date = Utc.with_ymd_and_hms(2024, 2, 5, 0, 0, 0).unwrap();
        assert_eq!(format_date_long(date), "February 5, 2024");
    }
}
