//! In-memory [`BackendService`] double.
//!
//! Mirrors the observable semantics of the native backend commands so the
//! view layer can be exercised in tests and in the headless demo: block
//! storage with backend-assigned ids, workspace gating on mutations,
//! connection dedup and reverse-connection scrubbing, and the member and
//! annotation sort orders. It is test tooling, not a storage engine:
//! nothing is persisted and no directories are walked — "indexing" returns
//! the file blocks that were seeded.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use urxiv_core::{Block, BlockContent, BlockId, FileKind};

use crate::error::{BackendError, Result};
use crate::service::{BackendService, NewAnnotation};

#[derive(Default)]
struct StubState {
    blocks: BTreeMap<BlockId, Block>,
    next_id: u64,
    workspace: Option<String>,
    file_data: BTreeMap<String, Vec<u8>>,
    opened: Vec<String>,
    fail_next: Option<String>,
}

/// Seedable in-memory backend double.
#[derive(Default)]
pub struct StubBackend {
    state: Mutex<StubState>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Arrange for the next call to `op` to fail with an opaque error.
    pub fn fail_next(&self, op: &str) {
        self.lock().fail_next = Some(op.to_string());
    }

    pub fn set_workspace(&self, path: &str) {
        self.lock().workspace = Some(path.to_string());
    }

    /// Register raw bytes behind a path for `get_file_content`.
    pub fn set_file_content(&self, path: &str, bytes: Vec<u8>) {
        self.lock().file_data.insert(path.to_string(), bytes);
    }

    /// Paths handed to the OS shell so far, in call order.
    pub fn opened_paths(&self) -> Vec<String> {
        self.lock().opened.clone()
    }

    /// Insert a block with backend-assigned id and the given timestamps.
    pub fn seed_block_at(
        &self,
        block_type: &str,
        content: Map<String, Value>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> BlockId {
        let mut state = self.lock();
        let id = Self::insert_block(&mut state, block_type, content, created_at);
        if let Some(block) = state.blocks.get_mut(&id) {
            block.updated_at = updated_at;
        }
        id
    }

    /// Insert a block with backend-assigned id, timestamped now.
    pub fn seed_block(&self, block_type: &str, content: Map<String, Value>) -> BlockId {
        let mut state = self.lock();
        Self::insert_block(&mut state, block_type, content, Utc::now())
    }

    /// Seed a file block the way workspace indexing would shape it.
    pub fn seed_file(&self, filename: &str, dir: &str) -> BlockId {
        let mut content = Map::new();
        content.insert("filename".to_string(), Value::String(filename.to_string()));
        content.insert("path".to_string(), Value::String(dir.to_string()));
        content.insert(
            "full_path".to_string(),
            Value::String(format!("{dir}/{filename}")),
        );
        content.insert(
            "file_type".to_string(),
            Value::String(FileKind::from_name(filename).as_str().to_string()),
        );
        self.seed_block("file", content)
    }

    pub fn seed_channel(&self, title: &str, description: &str) -> BlockId {
        let mut content = Map::new();
        content.insert("title".to_string(), Value::String(title.to_string()));
        content.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
        self.seed_block("channel", content)
    }

    fn insert_block(
        state: &mut StubState,
        block_type: &str,
        content: Map<String, Value>,
        at: DateTime<Utc>,
    ) -> BlockId {
        state.next_id += 1;
        let id = BlockId(state.next_id);
        state.blocks.insert(
            id,
            Block {
                id,
                created_at: at,
                updated_at: at,
                content: BlockContent::from_tagged(block_type, content),
                connections: Vec::new(),
            },
        );
        id
    }

    fn check_fail(state: &mut StubState, op: &'static str) -> Result<()> {
        if state.fail_next.as_deref() == Some(op) {
            state.fail_next = None;
            return Err(BackendError::call(op, "injected failure"));
        }
        Ok(())
    }

    fn require_workspace(state: &StubState, op: &'static str) -> Result<()> {
        if state.workspace.is_none() {
            return Err(BackendError::call(op, "No workspace selected"));
        }
        Ok(())
    }

    fn get(state: &StubState, id: BlockId, op: &'static str) -> Result<Block> {
        state
            .blocks
            .get(&id)
            .cloned()
            .ok_or_else(|| BackendError::call(op, format!("Block {id} not found")))
    }

    /// Append `target` to `source`'s connections, deduplicated, touching
    /// `source`'s update timestamp only when the set actually changed.
    fn connect_locked(
        state: &mut StubState,
        source_id: BlockId,
        target_id: BlockId,
        op: &'static str,
    ) -> Result<()> {
        if !state.blocks.contains_key(&source_id) {
            return Err(BackendError::call(
                op,
                format!("Source block {source_id} not found"),
            ));
        }
        if !state.blocks.contains_key(&target_id) {
            return Err(BackendError::call(
                op,
                format!("Target block {target_id} not found"),
            ));
        }
        let source = state
            .blocks
            .get_mut(&source_id)
            .ok_or_else(|| BackendError::call(op, format!("Source block {source_id} not found")))?;
        if !source.connections.contains(&target_id) {
            source.connections.push(target_id);
            source.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl BackendService for StubBackend {
    async fn workspace_status(&self) -> Result<bool> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "get_workspace_status")?;
        Ok(state.workspace.is_some())
    }

    async fn select_workspace(&self, path: &str) -> Result<()> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "select_workspace")?;
        state.workspace = Some(path.to_string());
        Ok(())
    }

    async fn index_workspace_files(&self) -> Result<Vec<Block>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "index_workspace_files")?;
        Self::require_workspace(&state, "index_workspace_files")?;
        Ok(state
            .blocks
            .values()
            .filter(|b| b.is_file())
            .cloned()
            .collect())
    }

    async fn all_blocks(&self) -> Result<Vec<Block>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "get_all_blocks")?;
        Ok(state.blocks.values().cloned().collect())
    }

    async fn block(&self, id: BlockId) -> Result<Block> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "get_block")?;
        Self::get(&state, id, "get_block")
    }

    async fn all_files(&self) -> Result<Vec<Block>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "get_all_files")?;
        Ok(state
            .blocks
            .values()
            .filter(|b| b.is_file())
            .cloned()
            .collect())
    }

    async fn all_channels(&self) -> Result<Vec<Block>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "get_all_channels")?;
        Ok(state
            .blocks
            .values()
            .filter(|b| b.is_channel())
            .cloned()
            .collect())
    }

    async fn blocks_in_channel(&self, channel_id: BlockId) -> Result<Vec<Block>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "get_blocks_in_channel")?;
        let channel = state.blocks.get(&channel_id).ok_or_else(|| {
            BackendError::call(
                "get_blocks_in_channel",
                format!("Channel {channel_id} not found"),
            )
        })?;
        if !channel.is_channel() {
            return Err(BackendError::call(
                "get_blocks_in_channel",
                format!("Block {channel_id} is not a channel"),
            ));
        }

        let mut members: Vec<Block> = channel
            .connections
            .iter()
            .filter_map(|id| state.blocks.get(id).cloned())
            .collect();
        members.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(members)
    }

    async fn create_channel(&self, title: &str, description: &str) -> Result<Block> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "create_channel")?;
        Self::require_workspace(&state, "create_channel")?;

        let mut content = Map::new();
        content.insert("title".to_string(), Value::String(title.to_string()));
        content.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
        let id = Self::insert_block(&mut state, "channel", content, Utc::now());
        Self::get(&state, id, "create_channel")
    }

    async fn update_block_content(
        &self,
        id: BlockId,
        content: Map<String, Value>,
    ) -> Result<Block> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "update_block_content")?;
        Self::require_workspace(&state, "update_block_content")?;

        let block_type = Self::get(&state, id, "update_block_content")?
            .block_type()
            .to_string();
        let block = state
            .blocks
            .get_mut(&id)
            .ok_or_else(|| BackendError::call("update_block_content", "Block not found"))?;
        block.content = BlockContent::from_tagged(&block_type, content);
        block.updated_at = Utc::now();
        Ok(block.clone())
    }

    async fn delete_block(&self, id: BlockId) -> Result<()> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "delete_block")?;
        Self::require_workspace(&state, "delete_block")?;

        if !state.blocks.contains_key(&id) {
            return Err(BackendError::call(
                "delete_block",
                format!("Block {id} not found"),
            ));
        }

        // Scrub reverse connections.
        let now = Utc::now();
        for block in state.blocks.values_mut() {
            if let Some(pos) = block.connections.iter().position(|&c| c == id) {
                block.connections.remove(pos);
                block.updated_at = now;
            }
        }
        state.blocks.remove(&id);
        Ok(())
    }

    async fn connect_blocks(&self, source_id: BlockId, target_id: BlockId) -> Result<()> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "connect_blocks")?;
        Self::require_workspace(&state, "connect_blocks")?;
        Self::connect_locked(&mut state, source_id, target_id, "connect_blocks")
    }

    async fn disconnect_blocks(&self, source_id: BlockId, target_id: BlockId) -> Result<()> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "disconnect_blocks")?;
        Self::require_workspace(&state, "disconnect_blocks")?;

        let source = state.blocks.get_mut(&source_id).ok_or_else(|| {
            BackendError::call(
                "disconnect_blocks",
                format!("Source block {source_id} not found"),
            )
        })?;
        if let Some(pos) = source.connections.iter().position(|&c| c == target_id) {
            source.connections.remove(pos);
            source.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn create_annotation(&self, annotation: NewAnnotation) -> Result<Block> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "create_annotation")?;
        Self::require_workspace(&state, "create_annotation")?;

        let mut content = Map::new();
        content.insert("text".to_string(), Value::String(annotation.text.clone()));

        if let Some(file_id) = annotation.source_file_id {
            content.insert(
                "source_file_id".to_string(),
                Value::Number(file_id.0.into()),
            );
            if let Some(BlockContent::File(file)) =
                state.blocks.get(&file_id).map(|b| &b.content)
            {
                if let Some(filename) = &file.filename {
                    content.insert(
                        "source_file_name".to_string(),
                        Value::String(filename.clone()),
                    );
                }
                if let Some(file_type) = &file.file_type {
                    content.insert("file_type".to_string(), Value::String(file_type.clone()));
                }
            }
        }
        if let Some(position) = annotation.position {
            content.insert("position".to_string(), Value::Number(position.into()));
        }
        if let Some(selected) = &annotation.selected_text {
            content.insert("selected_text".to_string(), Value::String(selected.clone()));
        }
        content.insert(
            "annotation_type".to_string(),
            Value::String("note".to_string()),
        );

        let id = Self::insert_block(&mut state, "annotation", content, Utc::now());

        if let Some(file_id) = annotation.source_file_id {
            Self::connect_locked(&mut state, file_id, id, "create_annotation")?;
        }
        if let Some(channel_id) = annotation.parent_channel_id {
            Self::connect_locked(&mut state, channel_id, id, "create_annotation")?;
        }

        Self::get(&state, id, "create_annotation")
    }

    async fn file_annotations(&self, file_id: BlockId) -> Result<Vec<Block>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "get_file_annotations")?;
        let file = state.blocks.get(&file_id).ok_or_else(|| {
            BackendError::call(
                "get_file_annotations",
                format!("File {file_id} not found"),
            )
        })?;

        let mut annotations: Vec<Block> = state
            .blocks
            .values()
            .filter(|b| {
                matches!(b.content, BlockContent::Annotation(_))
                    && (file.connections.contains(&b.id) || b.connections.contains(&file_id))
            })
            .cloned()
            .collect();

        // Positioned annotations first in position order, the rest by
        // recency. The key is total, so mixed lists sort consistently.
        annotations.sort_by_key(|block| {
            let position = match &block.content {
                BlockContent::Annotation(c) => c.position,
                _ => None,
            };
            (position.is_none(), position, Reverse(block.updated_at))
        });
        Ok(annotations)
    }

    async fn file_content(&self, path: &str) -> Result<Vec<u8>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "get_file_content")?;
        state
            .file_data
            .get(path)
            .cloned()
            .ok_or_else(|| BackendError::call("get_file_content", format!("File not found: {path}")))
    }

    async fn open_external(&self, path: &str) -> Result<()> {
        let mut state = self.lock();
        Self::check_fail(&mut state, "open_external")?;
        state.opened.push(path.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ready_stub() -> StubBackend {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        stub
    }

    #[tokio::test]
    async fn test_mutations_require_workspace() {
        let stub = StubBackend::new();
        let err = stub.create_channel("a", "b").await.unwrap_err();
        assert_eq!(
            err,
            BackendError::call("create_channel", "No workspace selected")
        );
    }

    #[tokio::test]
    async fn test_connect_dedups_and_touches_source() {
        let stub = ready_stub();
        let channel = stub.seed_channel("c", "");
        let file = stub.seed_file("a.pdf", "docs");

        let before = stub.block(channel).await.unwrap().updated_at;
        stub.connect_blocks(channel, file).await.unwrap();
        stub.connect_blocks(channel, file).await.unwrap();

        let after = stub.block(channel).await.unwrap();
        assert_eq!(after.connections, vec![file]);
        assert!(after.updated_at >= before);
    }

    #[tokio::test]
    async fn test_blocks_in_channel_sorted_by_recency() {
        let stub = ready_stub();
        let channel = stub.seed_channel("c", "");
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let older = stub.seed_block_at("text", Map::new(), t1, t1);
        let newer = stub.seed_block_at("text", Map::new(), t2, t2);
        stub.connect_blocks(channel, older).await.unwrap();
        stub.connect_blocks(channel, newer).await.unwrap();

        let members = stub.blocks_in_channel(channel).await.unwrap();
        assert_eq!(
            members.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![newer, older]
        );
    }

    #[tokio::test]
    async fn test_blocks_in_channel_rejects_non_channel() {
        let stub = ready_stub();
        let file = stub.seed_file("a.pdf", "docs");
        let err = stub.blocks_in_channel(file).await.unwrap_err();
        assert!(matches!(err, BackendError::Call { .. }));
    }

    #[tokio::test]
    async fn test_delete_scrubs_reverse_connections() {
        let stub = ready_stub();
        let channel = stub.seed_channel("c", "");
        let file = stub.seed_file("a.pdf", "docs");
        stub.connect_blocks(channel, file).await.unwrap();

        stub.delete_block(file).await.unwrap();
        let channel = stub.block(channel).await.unwrap();
        assert!(channel.connections.is_empty());
    }

    #[tokio::test]
    async fn test_update_block_content_replaces_and_keeps_type() {
        let stub = ready_stub();
        let channel = stub.seed_channel("old", "desc");

        let mut content = Map::new();
        content.insert("title".to_string(), Value::String("new".to_string()));
        let updated = stub.update_block_content(channel, content).await.unwrap();

        assert!(updated.is_channel());
        let BlockContent::Channel(c) = &updated.content else {
            panic!("expected channel");
        };
        assert_eq!(c.title.as_deref(), Some("new"));
        assert_eq!(c.description, None); // full replacement
    }

    #[tokio::test]
    async fn test_create_annotation_links_and_names_source() {
        let stub = ready_stub();
        let file = stub.seed_file("paper.pdf", "docs");
        let channel = stub.seed_channel("notes", "");

        let annotation = stub
            .create_annotation(NewAnnotation {
                text: "margin note".to_string(),
                source_file_id: Some(file),
                position: Some(3),
                selected_text: Some("quoted".to_string()),
                parent_channel_id: Some(channel),
            })
            .await
            .unwrap();

        let BlockContent::Annotation(c) = &annotation.content else {
            panic!("expected annotation");
        };
        assert_eq!(c.source_file_name.as_deref(), Some("paper.pdf"));
        assert_eq!(c.annotation_type.as_deref(), Some("note"));
        assert_eq!(c.file_type.as_deref(), Some("pdf"));

        let file_block = stub.block(file).await.unwrap();
        assert!(file_block.connections.contains(&annotation.id));
        let channel_block = stub.block(channel).await.unwrap();
        assert!(channel_block.connections.contains(&annotation.id));
    }

    #[tokio::test]
    async fn test_file_annotations_position_order() {
        let stub = ready_stub();
        let file = stub.seed_file("paper.pdf", "docs");
        for position in [9, 2, 5] {
            stub.create_annotation(NewAnnotation {
                text: format!("note at {position}"),
                source_file_id: Some(file),
                position: Some(position),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let annotations = stub.file_annotations(file).await.unwrap();
        let positions: Vec<u64> = annotations
            .iter()
            .filter_map(|b| match &b.content {
                BlockContent::Annotation(c) => c.position,
                _ => None,
            })
            .collect();
        assert_eq!(positions, vec![2, 5, 9]);
    }

    #[tokio::test]
    async fn test_file_annotations_mixed_positions() {
        let stub = ready_stub();
        let file = stub.seed_file("paper.pdf", "docs");
        let at = |month| Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap();
        let seed = |position: Option<u64>, month: u32| {
            let mut content = Map::new();
            content.insert("text".to_string(), Value::String("n".to_string()));
            if let Some(p) = position {
                content.insert("position".to_string(), Value::Number(p.into()));
            }
            stub.seed_block_at("annotation", content, at(month), at(month))
        };
        // Deliberately interleave recency and position.
        let pos2 = seed(Some(2), 3);
        let unpos_old = seed(None, 2);
        let pos1 = seed(Some(1), 1);
        let unpos_new = seed(None, 5);
        for id in [pos2, unpos_old, pos1, unpos_new] {
            stub.connect_blocks(file, id).await.unwrap();
        }

        let annotations = stub.file_annotations(file).await.unwrap();
        assert_eq!(
            annotations.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![pos1, pos2, unpos_new, unpos_old]
        );
    }

    #[tokio::test]
    async fn test_fail_next_hits_named_op_once() {
        let stub = ready_stub();
        stub.fail_next("get_all_files");
        assert!(stub.all_files().await.is_err());
        assert!(stub.all_files().await.is_ok());
    }

    #[tokio::test]
    async fn test_open_external_records_paths() {
        let stub = ready_stub();
        stub.open_external("/ws/docs/a.pdf").await.unwrap();
        assert_eq!(stub.opened_paths(), vec!["/ws/docs/a.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_file_content_lookup() {
        let stub = ready_stub();
        stub.set_file_content("/ws/a.txt", b"hello".to_vec());
        assert_eq!(stub.file_content("/ws/a.txt").await.unwrap(), b"hello");
        assert!(stub.file_content("/ws/missing.txt").await.is_err());
    }
}
