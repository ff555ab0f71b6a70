//! Channels browser: channel blocks enriched with their member counts and
//! a card projection, behind the generic browser with a bespoke
//! filter/sort (title/description search, recent or alphabetical only).

use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use urxiv_backend::{Backend, BackendError};
use urxiv_core::{
    apply_search, to_browser_item, BlockId, BrowserItem, FilterSortOptions, SortKey, SortOption,
};

use crate::browser::{format_date_long, Browser, BrowserView};
use crate::generation::Generations;

/// Preview slots on a channel card.
const PREVIEW_SLOTS: usize = 4;

/// Projection rendered for each channel row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelCard {
    pub id: BlockId,
    pub title: String,
    pub description: String,
    pub block_count: u64,
    /// `last edited Month D, YYYY`.
    pub last_edited: String,
    /// First members of the channel; trailing slots are padded with `None`.
    pub slots: [Option<BlockId>; PREVIEW_SLOTS],
}

/// Channel search matches title/description only; ordering is recent or
/// alphabetical, anything else passes through unchanged.
fn channel_filter_sort(items: &[BrowserItem], options: &FilterSortOptions) -> Vec<BrowserItem> {
    let mut filtered = apply_search(items, options.search_term.as_deref());
    match options.sort_by {
        SortKey::Recent => {
            filtered.sort_by(|a, b| b.effective_timestamp().cmp(&a.effective_timestamp()));
        }
        SortKey::Alphabetical => {
            filtered.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        }
        _ => {}
    }
    filtered
}

pub struct ChannelsView {
    browser: Browser,
    generations: Generations,
}

impl Default for ChannelsView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelsView {
    pub fn new() -> Self {
        let browser = Browser::new()
            .with_empty_message("No channels have been created yet.")
            .with_loading_message("Loading channels...")
            .with_sort_options(vec![
                SortOption::new(SortKey::Recent, "Most Recent"),
                SortOption::new(SortKey::Alphabetical, "Alphabetical"),
            ])
            .with_filter_sort(Arc::new(channel_filter_sort));
        Self {
            browser,
            generations: Generations::new(),
        }
    }

    /// Load channels and their members in one step. Owners that can overlap
    /// reloads drive [`Self::begin_load`], [`Self::fetch`] and
    /// [`Self::apply`] themselves so a stale response landing late is
    /// discarded.
    pub async fn load(&mut self, backend: &Backend) {
        let ticket = self.begin_load();
        let result = Self::fetch(backend).await;
        self.apply(ticket, result);
    }

    /// Take a ticket for a new load, superseding every earlier one.
    pub fn begin_load(&mut self) -> u64 {
        self.browser.set_loading(true);
        self.browser.set_error(None);
        self.generations.begin()
    }

    /// Fetch channels, then their members concurrently, free of view state.
    /// A channel whose member load fails degrades to zero members rather
    /// than failing the whole fetch.
    pub async fn fetch(backend: &Backend) -> Result<Vec<BrowserItem>, BackendError> {
        let channels = backend.all_channels().await?;
        let member_results =
            join_all(channels.iter().map(|c| backend.blocks_in_channel(c.id))).await;

        Ok(channels
            .iter()
            .zip(member_results)
            .map(|(channel, result)| {
                let members = match result {
                    Ok(members) => members,
                    Err(e) => {
                        warn!(channel_id = %channel.id, error = %e,
                            "Failed to load channel members");
                        Vec::new()
                    }
                };
                let mut item = to_browser_item(channel);
                item.metadata
                    .insert("blockCount".to_string(), json!(members.len()));
                item.metadata.insert(
                    "previewIds".to_string(),
                    json!(members
                        .iter()
                        .take(PREVIEW_SLOTS)
                        .map(|b| b.id.0)
                        .collect::<Vec<_>>()),
                );
                item
            })
            .collect())
    }

    /// Apply a fetch result. A stale ticket is discarded without disturbing
    /// whatever the newer load has done.
    pub fn apply(&mut self, ticket: u64, result: Result<Vec<BrowserItem>, BackendError>) {
        if !self.generations.is_current(ticket) {
            debug!("Discarding stale channel load");
            return;
        }
        match result {
            Ok(items) => self.browser.set_items(items),
            Err(e) => {
                error!(error = %e, "Failed to load channels");
                self.browser
                    .set_error(Some("Failed to load channels. Please try again.".to_string()));
            }
        }
        self.browser.set_loading(false);
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.browser.set_search_term(term);
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.browser.set_sort_key(key);
    }

    pub fn sort_options(&self) -> &[SortOption] {
        self.browser.sort_options()
    }

    pub fn render(&self) -> BrowserView {
        self.browser.render()
    }

    /// Card projections for the rendered item list.
    pub fn cards(&self) -> Vec<ChannelCard> {
        let BrowserView::Items(items) = self.render() else {
            return Vec::new();
        };
        items.into_iter().map(card_for_item).collect()
    }
}

fn card_for_item(item: BrowserItem) -> ChannelCard {
    let block_count = item
        .metadata
        .get("blockCount")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let mut slots = [None; PREVIEW_SLOTS];
    if let Some(ids) = item.metadata.get("previewIds").and_then(Value::as_array) {
        for (slot, id) in slots.iter_mut().zip(ids) {
            *slot = id.as_u64().map(BlockId);
        }
    }

    ChannelCard {
        id: item.id,
        title: item.title,
        description: item.subtitle.unwrap_or_default(),
        block_count,
        last_edited: format!(
            "last edited {}",
            format_date_long(item.updated_at.unwrap_or(item.created_at))
        ),
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;
    use urxiv_backend::StubBackend;

    async fn backend_with(stub: StubBackend) -> Backend {
        let backend = Backend::new(StdArc::new(stub));
        backend.initialize().await.unwrap();
        backend
    }

    #[tokio::test]
    async fn test_cards_carry_counts_and_preview_slots() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        let channel = stub.seed_channel("Reading", "papers");
        let a = stub.seed_file("a.pdf", "/ws");
        let b = stub.seed_file("b.pdf", "/ws");
        let backend = backend_with(stub).await;
        backend.connect_blocks(channel, a).await.unwrap();
        backend.connect_blocks(channel, b).await.unwrap();

        let mut view = ChannelsView::new();
        view.load(&backend).await;

        let cards = view.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Reading");
        assert_eq!(cards[0].block_count, 2);
        assert_eq!(cards[0].slots.iter().filter(|s| s.is_some()).count(), 2);
        assert!(cards[0].last_edited.starts_with("last edited "));
    }

    #[tokio::test]
    async fn test_stale_load_result_discarded() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        stub.seed_channel("First", "");
        let backend = backend_with(stub).await;

        let mut view = ChannelsView::new();
        let stale_ticket = view.begin_load();
        let stale = ChannelsView::fetch(&backend).await;

        // A newer load starts, and a channel appears, before the first
        // response lands.
        let fresh_ticket = view.begin_load();
        backend.create_channel("Second", "").await.unwrap();
        let fresh = ChannelsView::fetch(&backend).await;

        view.apply(stale_ticket, stale);
        assert!(matches!(view.render(), BrowserView::Loading { .. }));

        view.apply(fresh_ticket, fresh);
        assert_eq!(view.cards().len(), 2);
    }

    #[tokio::test]
    async fn test_member_failure_degrades_to_zero() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        stub.seed_channel("Reading", "");
        stub.fail_next("get_blocks_in_channel");
        let backend = backend_with(stub).await;

        let mut view = ChannelsView::new();
        view.load(&backend).await;

        let cards = view.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].block_count, 0);
    }

    #[tokio::test]
    async fn test_load_failure_then_retry() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        stub.seed_channel("Reading", "");
        stub.fail_next("get_all_channels");
        let backend = backend_with(stub).await;

        let mut view = ChannelsView::new();
        view.load(&backend).await;
        assert!(matches!(view.render(), BrowserView::Error { .. }));

        view.load(&backend).await;
        assert_eq!(view.cards().len(), 1);
    }

    #[tokio::test]
    async fn test_channel_search_matches_description() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        stub.seed_channel("Alpha", "machine learning");
        stub.seed_channel("Beta", "cooking");
        let backend = backend_with(stub).await;

        let mut view = ChannelsView::new();
        view.load(&backend).await;
        view.set_search_term("machine");

        let cards = view.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Alpha");
    }

    #[tokio::test]
    async fn test_type_sort_is_identity_for_channels() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        stub.seed_channel("B", "");
        stub.seed_channel("A", "");
        let backend = backend_with(stub).await;

        let mut view = ChannelsView::new();
        view.load(&backend).await;
        view.set_sort_key(SortKey::Type);

        let cards = view.cards();
        assert_eq!(cards[0].title, "B"); // input order preserved
    }
}
