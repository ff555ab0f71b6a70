//! View composition: one module per screen, each owning its data, loading
//! it through the injected backend handle and exposing typed render
//! snapshots. Backend errors are caught at the call site, logged, and
//! stored as user-facing strings; they never propagate out of a load
//! method.

pub mod blocks;
pub mod channel;
pub mod channels;
pub mod file;
pub mod files;
pub mod layout;
pub mod shell;
pub mod sidebar;

pub use blocks::BlocksView;
pub use channel::{ChannelDetail, ChannelDetailView, ChannelEvent};
pub use channels::{ChannelCard, ChannelsView};
pub use file::{FileDetail, FileDetailView, FilePreview, FileTab};
pub use files::FilesView;
pub use layout::{MainEvent, MainLayout, ViewKind};
pub use shell::{AppShell, Route};
pub use sidebar::{file_counts, FileCounts, FileFilter, Sidebar};

use urxiv_core::{Block, BlockContent};

/// Absolute path of a file block, if it has one.
pub(crate) fn block_full_path(block: &Block) -> Option<String> {
    match &block.content {
        BlockContent::File(content) => content.full_path.clone(),
        _ => None,
    }
}
