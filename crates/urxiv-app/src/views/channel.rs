//! Channel detail: members, the title/description editor, deletion, and
//! the add/remove-files flow. Loads are generation-guarded so rapid channel
//! switching cannot apply a stale response over a newer one.

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use urxiv_backend::{Backend, BackendError};
use urxiv_core::{to_browser_item, Block, BlockContent, BlockId, BrowserItem};

use crate::generation::Generations;
use crate::views::block_full_path;

/// Signals consumed by the owning layer (the main layout reloads its
/// sidebar channels on both).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent {
    Updated(BlockId),
    Deleted(BlockId),
}

/// Draft state of the title/description editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditDraft {
    pub title: String,
    pub description: String,
}

/// Render snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelDetailView {
    Loading,
    Error { message: String },
    Ready(ChannelSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSummary {
    pub id: BlockId,
    pub title: String,
    pub description: String,
    pub block_count: usize,
    pub members: Vec<BrowserItem>,
    pub editing: bool,
}

pub struct ChannelDetail {
    id: BlockId,
    channel: Option<Block>,
    members: Vec<Block>,
    available: Vec<Block>,
    is_loading: bool,
    error: Option<String>,
    edit: Option<EditDraft>,
    generations: Generations,
}

impl ChannelDetail {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            channel: None,
            members: Vec::new(),
            available: Vec::new(),
            is_loading: false,
            error: None,
            edit: None,
            generations: Generations::new(),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn members(&self) -> &[Block] {
        &self.members
    }

    /// Load the channel block and its members in one step. Owners that can
    /// overlap requests (rapid channel switching) drive [`Self::begin_load`],
    /// [`Self::fetch`] and [`Self::apply`] themselves so an older response
    /// landing late is discarded.
    pub async fn load(&mut self, backend: &Backend) {
        let ticket = self.begin_load();
        let result = Self::fetch(backend, self.id).await;
        self.apply(ticket, result);
    }

    /// Take a ticket for a new load, superseding every earlier one.
    pub fn begin_load(&mut self) -> u64 {
        self.is_loading = true;
        self.error = None;
        self.generations.begin()
    }

    /// Fetch the channel and its members without touching view state, so a
    /// newer load can start while this one is in flight.
    pub async fn fetch(backend: &Backend, id: BlockId) -> Result<(Block, Vec<Block>), BackendError> {
        let channel = backend.block(id).await?;
        let members = backend.blocks_in_channel(id).await?;
        Ok((channel, members))
    }

    /// Apply a fetch result. A stale ticket is discarded without disturbing
    /// whatever the newer load has done.
    pub fn apply(&mut self, ticket: u64, result: Result<(Block, Vec<Block>), BackendError>) {
        if !self.generations.is_current(ticket) {
            debug!(channel_id = %self.id, "Discarding stale channel load");
            return;
        }
        match result {
            Ok((channel, members)) => {
                self.channel = Some(channel);
                self.members = members;
            }
            Err(e) => {
                error!(channel_id = %self.id, error = %e, "Failed to load channel");
                self.error = Some("Failed to load channel data".to_string());
            }
        }
        self.is_loading = false;
    }

    // -- editor --

    pub fn begin_edit(&mut self) {
        let Some(BlockContent::Channel(content)) = self.channel.as_ref().map(|c| &c.content)
        else {
            return;
        };
        self.edit = Some(EditDraft {
            title: content.title.clone().unwrap_or_default(),
            description: content.description.clone().unwrap_or_default(),
        });
    }

    pub fn editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn set_draft_title(&mut self, title: &str) {
        if let Some(draft) = &mut self.edit {
            draft.title = title.to_string();
        }
    }

    pub fn set_draft_description(&mut self, description: &str) {
        if let Some(draft) = &mut self.edit {
            draft.description = description.to_string();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Merge the drafts into the channel's content map and push the full
    /// replacement to the backend. Unmodeled content fields survive.
    pub async fn save_edit(&mut self, backend: &Backend) -> Option<ChannelEvent> {
        let draft = self.edit.clone()?;
        let channel = self.channel.as_ref()?;

        let mut overrides = Map::new();
        overrides.insert("title".to_string(), Value::String(draft.title));
        overrides.insert("description".to_string(), Value::String(draft.description));
        let merged = channel.merged_content(overrides);

        match backend.update_block_content(self.id, merged).await {
            Ok(updated) => {
                self.channel = Some(updated);
                self.edit = None;
                Some(ChannelEvent::Updated(self.id))
            }
            Err(e) => {
                error!(channel_id = %self.id, error = %e, "Failed to update channel");
                self.error = Some("Failed to save changes".to_string());
                None
            }
        }
    }

    pub async fn delete(&mut self, backend: &Backend) -> Option<ChannelEvent> {
        match backend.delete_block(self.id).await {
            Ok(()) => Some(ChannelEvent::Deleted(self.id)),
            Err(e) => {
                error!(channel_id = %self.id, error = %e, "Failed to delete channel");
                self.error = Some("Failed to delete channel".to_string());
                None
            }
        }
    }

    // -- membership --

    /// Files that can still be added: all files minus current members.
    pub async fn load_available_files(&mut self, backend: &Backend) {
        match backend.all_files().await {
            Ok(files) => {
                self.available = files
                    .into_iter()
                    .filter(|f| !self.members.iter().any(|m| m.id == f.id))
                    .collect();
            }
            Err(e) => {
                error!(channel_id = %self.id, error = %e, "Failed to get available files");
                self.error = Some("Failed to load available files".to_string());
            }
        }
    }

    pub fn available_files(&self) -> Vec<BrowserItem> {
        self.available.iter().map(to_browser_item).collect()
    }

    /// Connect a file, then reload the member list from the backend (the
    /// local copy is a cache; membership order is backend-owned).
    pub async fn add_file(&mut self, backend: &Backend, file_id: BlockId) {
        if let Err(e) = backend.connect_blocks(self.id, file_id).await {
            error!(channel_id = %self.id, file_id = %file_id, error = %e,
                "Failed to add file to channel");
            self.error = Some("Failed to add file to channel".to_string());
            return;
        }

        match backend.blocks_in_channel(self.id).await {
            Ok(members) => self.members = members,
            Err(e) => {
                error!(channel_id = %self.id, error = %e, "Failed to reload members");
                self.error = Some("Failed to load channel data".to_string());
            }
        }
        self.available.retain(|f| f.id != file_id);
    }

    pub async fn remove_file(&mut self, backend: &Backend, file_id: BlockId) {
        if let Err(e) = backend.disconnect_blocks(self.id, file_id).await {
            error!(channel_id = %self.id, file_id = %file_id, error = %e,
                "Failed to remove file from channel");
            self.error = Some("Failed to remove file from channel".to_string());
            return;
        }
        self.members.retain(|m| m.id != file_id);
    }

    /// Member click = hand the file to the OS shell.
    pub async fn open_member(&self, backend: &Backend, member_id: BlockId) {
        let Some(path) = self
            .members
            .iter()
            .find(|m| m.id == member_id)
            .and_then(block_full_path)
        else {
            warn!(block_id = %member_id, "Member has no path to open");
            return;
        };
        if let Err(e) = backend.open_external(&path).await {
            error!(path = %path, error = %e, "Failed to open file");
        }
    }

    pub fn render(&self) -> ChannelDetailView {
        if self.is_loading {
            return ChannelDetailView::Loading;
        }
        let channel = match (&self.error, &self.channel) {
            (Some(message), _) => {
                return ChannelDetailView::Error {
                    message: message.clone(),
                }
            }
            (None, None) => {
                return ChannelDetailView::Error {
                    message: "Channel not found".to_string(),
                }
            }
            (None, Some(channel)) => channel,
        };

        let item = to_browser_item(channel);
        ChannelDetailView::Ready(ChannelSummary {
            id: self.id,
            title: item.title,
            description: item.subtitle.unwrap_or_default(),
            block_count: self.members.len(),
            members: self.members.iter().map(to_browser_item).collect(),
            editing: self.edit.is_some(),
        })
    }
}
