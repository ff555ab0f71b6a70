//! Files browser: adapted file blocks behind the generic browser, with the
//! sidebar's kind filter applied before adaptation.

use tracing::{error, warn};

use urxiv_backend::Backend;
use urxiv_core::{to_browser_item, Block, BlockId, SortKey, SortOption};

use crate::browser::{Browser, BrowserRow, BrowserView};
use crate::views::block_full_path;
use crate::views::sidebar::FileFilter;

pub struct FilesView {
    browser: Browser,
    blocks: Vec<Block>,
    kind_filter: FileFilter,
    open_error: Option<String>,
}

impl Default for FilesView {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesView {
    pub fn new() -> Self {
        let browser = Browser::new()
            .with_empty_message("No files have been indexed. Check your workspace directory.")
            .with_loading_message("Loading files...")
            .with_sort_options(vec![
                SortOption::new(SortKey::Recent, "Most Recent"),
                SortOption::new(SortKey::Alphabetical, "A-Z"),
                SortOption::new(SortKey::Type, "File Type"),
            ]);
        Self {
            browser,
            blocks: Vec::new(),
            kind_filter: FileFilter::All,
            open_error: None,
        }
    }

    /// Hand in already-loaded file blocks (e.g. the startup indexing
    /// result) without a backend round-trip.
    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.refresh();
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub async fn load(&mut self, backend: &Backend) {
        self.browser.set_loading(true);
        self.browser.set_error(None);

        match backend.all_files().await {
            Ok(blocks) => {
                self.blocks = blocks;
                self.refresh();
            }
            Err(e) => {
                error!(error = %e, "Failed to load files");
                self.browser
                    .set_error(Some("Failed to load files. Please try again.".to_string()));
            }
        }
        self.browser.set_loading(false);
    }

    fn refresh(&mut self) {
        let items = self
            .blocks
            .iter()
            .filter(|block| self.kind_filter.matches(block))
            .map(to_browser_item)
            .collect();
        self.browser.set_items(items);
    }

    pub fn set_kind_filter(&mut self, filter: FileFilter) {
        self.kind_filter = filter;
        self.refresh();
    }

    pub fn kind_filter(&self) -> FileFilter {
        self.kind_filter
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

    /// Click = hand the file to the OS shell. Failures surface as a
    /// view-level message without disturbing the list.
    pub async fn open(&mut self, backend: &Backend, id: BlockId) {
        self.open_error = None;

        let Some(path) = self
            .blocks
            .iter()
            .find(|block| block.id == id)
            .and_then(block_full_path)
        else {
            warn!(block_id = %id, "File has no path to open");
            return;
        };

        if let Err(e) = backend.open_external(&path).await {
            error!(path = %path, error = %e, "Failed to open file");
            self.open_error = Some("Failed to open file.".to_string());
        }
    }

    pub fn open_error(&self) -> Option<&str> {
        self.open_error.as_deref()
    }
}
