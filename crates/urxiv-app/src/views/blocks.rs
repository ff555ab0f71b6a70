//! Generic blocks browser: any block list through the dispatching adapter.
//!
//! Click policy: when the owner registered a handler, delegate to it;
//! otherwise file blocks are handed to the OS shell and other block types
//! are ignored.

use tracing::{error, warn};

use urxiv_backend::Backend;
use urxiv_core::{to_browser_item, Block, BlockId, SortKey, SortOption};

use crate::browser::{Browser, BrowserRow, BrowserView};
use crate::views::block_full_path;

type ClickHandler = Box<dyn Fn(BlockId) + Send + Sync>;

pub struct BlocksView {
    browser: Browser,
    blocks: Vec<Block>,
    on_block_click: Option<ClickHandler>,
}

impl Default for BlocksView {
    fn default() -> Self {
        Self::new()
    }
}

impl BlocksView {
    pub fn new() -> Self {
        let browser = Browser::new()
            .with_empty_message("No blocks have been created yet.")
            .with_loading_message("Loading blocks...")
            .with_sort_options(vec![
                SortOption::new(SortKey::Recent, "Most Recent"),
                SortOption::new(SortKey::Alphabetical, "A-Z"),
                SortOption::new(SortKey::Type, "Block Type"),
            ]);
        Self {
            browser,
            blocks: Vec::new(),
            on_block_click: None,
        }
    }

    pub fn with_empty_message(mut self, message: &str) -> Self {
        self.browser = std::mem::take(&mut self.browser).with_empty_message(message);
        self
    }

    pub fn on_block_click(mut self, handler: impl Fn(BlockId) + Send + Sync + 'static) -> Self {
        self.on_block_click = Some(Box::new(handler));
        self
    }

    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.browser
            .set_items(blocks.iter().map(to_browser_item).collect());
        self.blocks = blocks;
    }

    pub async fn load(&mut self, backend: &Backend) {
        self.browser.set_loading(true);
        self.browser.set_error(None);

        match backend.all_blocks().await {
            Ok(blocks) => self.set_blocks(blocks),
            Err(e) => {
                error!(error = %e, "Failed to load blocks");
                self.browser
                    .set_error(Some("Failed to load blocks. Please try again.".to_string()));
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

    pub fn rows(&self) -> Vec<BrowserRow> {
        self.browser.rows()
    }

    pub async fn click(&self, backend: &Backend, id: BlockId) {
        if let Some(handler) = &self.on_block_click {
            handler(id);
            return;
        }

        let Some(block) = self.blocks.iter().find(|b| b.id == id) else {
            return;
        };
        if !block.is_file() {
            return;
        }
        let Some(path) = block_full_path(block) else {
            warn!(block_id = %id, "File has no path to open");
            return;
        };
        if let Err(e) = backend.open_external(&path).await {
            error!(path = %path, error = %e, "Failed to open file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use urxiv_backend::StubBackend;

    #[tokio::test]
    async fn test_load_lists_every_block_type() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        stub.seed_file("a.pdf", "/ws");
        stub.seed_channel("c", "");
        stub.seed_block("mystery", serde_json::Map::new());
        let backend = Backend::new(Arc::new(stub));
        backend.initialize().await.unwrap();

        let mut view = BlocksView::new();
        view.load(&backend).await;
        let BrowserView::Items(items) = view.render() else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn test_click_delegates_when_handler_set() {
        let count = Arc::new(AtomicUsize::new(0));
        let counted = count.clone();
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        let file = stub.seed_file("a.pdf", "/ws");
        let stub = Arc::new(stub);
        let backend = Backend::new(stub.clone());
        backend.initialize().await.unwrap();

        let mut view = BlocksView::new().on_block_click(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });
        view.load(&backend).await;
        view.click(&backend, file).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(stub.opened_paths().is_empty());
    }

    #[tokio::test]
    async fn test_click_opens_file_blocks_without_handler() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        let file = stub.seed_file("a.pdf", "/ws/docs");
        let channel = stub.seed_channel("c", "");
        let stub = Arc::new(stub);
        let backend = Backend::new(stub.clone());
        backend.initialize().await.unwrap();

        let mut view = BlocksView::new();
        view.load(&backend).await;
        view.click(&backend, file).await;
        view.click(&backend, channel).await; // ignored

        assert_eq!(stub.opened_paths(), vec!["/ws/docs/a.pdf".to_string()]);
    }
}
