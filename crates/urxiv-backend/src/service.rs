use async_trait::async_trait;
use serde_json::{Map, Value};

use urxiv_core::{Block, BlockId};

use crate::error::Result;

/// Request payload for [`BackendService::create_annotation`].
#[derive(Debug, Clone, Default)]
pub struct NewAnnotation {
    pub text: String,
    /// File block the annotation was taken from. When set, the backend
    /// links the annotation to the file and records the file's name.
    pub source_file_id: Option<BlockId>,
    /// Page number for PDF sources, line number otherwise.
    pub position: Option<u64>,
    /// Text selected in the viewer when the annotation was made.
    pub selected_text: Option<String>,
    /// Channel to add the annotation to on creation.
    pub parent_channel_id: Option<BlockId>,
}

/// The remote-procedure surface of the native backend.
///
/// Every method is a suspension point; every method may fail with an opaque
/// error. Implementations must be `Send + Sync` and safe for concurrent
/// access.
#[async_trait]
pub trait BackendService: Send + Sync {
    /// Whether a workspace root is configured.
    async fn workspace_status(&self) -> Result<bool>;

    /// Set the workspace root. The directory is chosen by the host
    /// environment's folder picker; this call receives the chosen path.
    async fn select_workspace(&self, path: &str) -> Result<()>;

    /// Trigger backend-side file indexing; returns the file blocks known
    /// after the run.
    async fn index_workspace_files(&self) -> Result<Vec<Block>>;

    async fn all_blocks(&self) -> Result<Vec<Block>>;

    /// Fails if the id is unknown.
    async fn block(&self, id: BlockId) -> Result<Block>;

    async fn all_files(&self) -> Result<Vec<Block>>;

    async fn all_channels(&self) -> Result<Vec<Block>>;

    /// Members of a channel, most recently updated first.
    async fn blocks_in_channel(&self, channel_id: BlockId) -> Result<Vec<Block>>;

    async fn create_channel(&self, title: &str, description: &str) -> Result<Block>;

    /// Full content replacement; the block type is unchanged.
    async fn update_block_content(
        &self,
        id: BlockId,
        content: Map<String, Value>,
    ) -> Result<Block>;

    async fn delete_block(&self, id: BlockId) -> Result<()>;

    async fn connect_blocks(&self, source_id: BlockId, target_id: BlockId) -> Result<()>;

    async fn disconnect_blocks(&self, source_id: BlockId, target_id: BlockId) -> Result<()>;

    async fn create_annotation(&self, annotation: NewAnnotation) -> Result<Block>;

    /// Annotations linked to a file, ordered by position when available,
    /// otherwise most recently updated first.
    async fn file_annotations(&self, file_id: BlockId) -> Result<Vec<Block>>;

    /// Raw bytes of a file, used for preview rendering.
    async fn file_content(&self, path: &str) -> Result<Vec<u8>>;

    /// Hand a file to the OS shell. Fire-and-forget: success means the
    /// hand-off was accepted, nothing more.
    async fn open_external(&self, path: &str) -> Result<()>;
}
