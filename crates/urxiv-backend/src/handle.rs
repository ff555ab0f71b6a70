//! The dependency-injected backend handle.
//!
//! Views never talk to a [`BackendService`] directly; they receive a
//! [`Backend`] constructed at startup. The handle tracks readiness as a
//! typed state rather than a boolean flag, refuses calls until
//! [`Backend::initialize`] has succeeded, and logs every failed call with
//! the operation name before returning the error to the caller.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};
use tracing::{error, info};

use urxiv_core::{Block, BlockId};

use crate::error::{BackendError, Result};
use crate::service::{BackendService, NewAnnotation};

/// Connection state of the backend collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Uninitialized,
    Ready,
    Failed,
}

/// Handle wrapping a [`BackendService`] with readiness gating and logging.
pub struct Backend {
    service: Arc<dyn BackendService>,
    readiness: Mutex<Readiness>,
}

impl Backend {
    pub fn new(service: Arc<dyn BackendService>) -> Self {
        Self {
            service,
            readiness: Mutex::new(Readiness::Uninitialized),
        }
    }

    pub fn readiness(&self) -> Readiness {
        *self.lock_readiness()
    }

    fn lock_readiness(&self) -> MutexGuard<'_, Readiness> {
        // Readiness is a plain enum; a poisoned lock cannot leave it in a
        // torn state, so recover the value.
        self.readiness.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Probe the service and transition `Uninitialized -> Ready | Failed`.
    /// Returns whether a workspace root is configured.
    pub async fn initialize(&self) -> Result<bool> {
        match self.service.workspace_status().await {
            Ok(has_workspace) => {
                *self.lock_readiness() = Readiness::Ready;
                info!(has_workspace, "Backend ready");
                Ok(has_workspace)
            }
            Err(e) => {
                *self.lock_readiness() = Readiness::Failed;
                error!(error = %e, "Backend initialization failed");
                Err(e)
            }
        }
    }

    fn ensure_ready(&self, op: &'static str) -> Result<()> {
        if self.readiness() == Readiness::Ready {
            Ok(())
        } else {
            error!(op, "Backend call before ready");
            Err(BackendError::NotReady)
        }
    }

    fn log_failure(op: &'static str, e: BackendError) -> BackendError {
        error!(op, error = %e, "Backend call failed");
        e
    }

    pub async fn workspace_status(&self) -> Result<bool> {
        self.ensure_ready("get_workspace_status")?;
        self.service
            .workspace_status()
            .await
            .map_err(|e| Self::log_failure("get_workspace_status", e))
    }

    pub async fn select_workspace(&self, path: &str) -> Result<()> {
        self.ensure_ready("select_workspace")?;
        self.service
            .select_workspace(path)
            .await
            .map_err(|e| Self::log_failure("select_workspace", e))
    }

    pub async fn index_workspace_files(&self) -> Result<Vec<Block>> {
        self.ensure_ready("index_workspace_files")?;
        self.service
            .index_workspace_files()
            .await
            .map_err(|e| Self::log_failure("index_workspace_files", e))
    }

    pub async fn all_blocks(&self) -> Result<Vec<Block>> {
        self.ensure_ready("get_all_blocks")?;
        self.service
            .all_blocks()
            .await
            .map_err(|e| Self::log_failure("get_all_blocks", e))
    }

    pub async fn block(&self, id: BlockId) -> Result<Block> {
        self.ensure_ready("get_block")?;
        self.service
            .block(id)
            .await
            .map_err(|e| Self::log_failure("get_block", e))
    }

    pub async fn all_files(&self) -> Result<Vec<Block>> {
        self.ensure_ready("get_all_files")?;
        self.service
            .all_files()
            .await
            .map_err(|e| Self::log_failure("get_all_files", e))
    }

    pub async fn all_channels(&self) -> Result<Vec<Block>> {
        self.ensure_ready("get_all_channels")?;
        self.service
            .all_channels()
            .await
            .map_err(|e| Self::log_failure("get_all_channels", e))
    }

    pub async fn blocks_in_channel(&self, channel_id: BlockId) -> Result<Vec<Block>> {
        self.ensure_ready("get_blocks_in_channel")?;
        self.service
            .blocks_in_channel(channel_id)
            .await
            .map_err(|e| Self::log_failure("get_blocks_in_channel", e))
    }

    pub async fn create_channel(&self, title: &str, description: &str) -> Result<Block> {
        self.ensure_ready("create_channel")?;
        let block = self
            .service
            .create_channel(title, description)
            .await
            .map_err(|e| Self::log_failure("create_channel", e))?;
        info!(channel_id = %block.id, title, "Channel created");
        Ok(block)
    }

    pub async fn update_block_content(
        &self,
        id: BlockId,
        content: Map<String, Value>,
    ) -> Result<Block> {
        self.ensure_ready("update_block_content")?;
        self.service
            .update_block_content(id, content)
            .await
            .map_err(|e| Self::log_failure("update_block_content", e))
    }

    pub async fn delete_block(&self, id: BlockId) -> Result<()> {
        self.ensure_ready("delete_block")?;
        self.service
            .delete_block(id)
            .await
            .map_err(|e| Self::log_failure("delete_block", e))?;
        info!(block_id = %id, "Block deleted");
        Ok(())
    }

    pub async fn connect_blocks(&self, source_id: BlockId, target_id: BlockId) -> Result<()> {
        self.ensure_ready("connect_blocks")?;
        self.service
            .connect_blocks(source_id, target_id)
            .await
            .map_err(|e| Self::log_failure("connect_blocks", e))
    }

    pub async fn disconnect_blocks(&self, source_id: BlockId, target_id: BlockId) -> Result<()> {
        self.ensure_ready("disconnect_blocks")?;
        self.service
            .disconnect_blocks(source_id, target_id)
            .await
            .map_err(|e| Self::log_failure("disconnect_blocks", e))
    }

    pub async fn create_annotation(&self, annotation: NewAnnotation) -> Result<Block> {
        self.ensure_ready("create_annotation")?;
        self.service
            .create_annotation(annotation)
            .await
            .map_err(|e| Self::log_failure("create_annotation", e))
    }

    pub async fn file_annotations(&self, file_id: BlockId) -> Result<Vec<Block>> {
        self.ensure_ready("get_file_annotations")?;
        self.service
            .file_annotations(file_id)
            .await
            .map_err(|e| Self::log_failure("get_file_annotations", e))
    }

    pub async fn file_content(&self, path: &str) -> Result<Vec<u8>> {
        self.ensure_ready("get_file_content")?;
        self.service
            .file_content(path)
            .await
            .map_err(|e| Self::log_failure("get_file_content", e))
    }

    pub async fn open_external(&self, path: &str) -> Result<()> {
        self.ensure_ready("open_external")?;
        self.service
            .open_external(path)
            .await
            .map_err(|e| Self::log_failure("open_external", e))
    }
}
