//! The Block entity and its tagged content union.
//!
//! On the wire a block is `{ id, created_at, updated_at, block_type,
//! content, connections }` where `content` is a JSON object whose shape
//! depends on `block_type`. In memory the tag and the map are folded into
//! [`BlockContent`], one variant per known type plus a catch-all that keeps
//! the raw tag and map verbatim, so unrecognized types are carried
//! generically instead of rejected.
//!
//! Deserialization is total over JSON objects: typed fields that are absent
//! stay `None`, fields with an unexpected JSON type are left untouched in
//! the variant's `extra` map, and serializing back reproduces the full
//! original content map. A block can therefore round-trip through the UI and
//! back into `update_block_content` without dropping backend-owned fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::BlockId;

pub const BLOCK_TYPE_FILE: &str = "file";
pub const BLOCK_TYPE_CHANNEL: &str = "channel";
pub const BLOCK_TYPE_ANNOTATION: &str = "annotation";
pub const BLOCK_TYPE_TEXT: &str = "text";

/// Content of a file block produced by workspace indexing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileContent {
    pub filename: Option<String>,
    pub path: Option<String>,
    pub full_path: Option<String>,
    pub file_type: Option<String>,
    pub indexed_at: Option<String>,
    /// Backend-owned fields this layer does not model.
    pub extra: Map<String, Value>,
}

/// Content of a channel block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub extra: Map<String, Value>,
}

/// Content of an annotation block linked to a source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationContent {
    pub text: Option<String>,
    pub selected_text: Option<String>,
    pub source_file_id: Option<u64>,
    pub source_file_name: Option<String>,
    pub position: Option<u64>,
    pub annotation_type: Option<String>,
    pub file_type: Option<String>,
    pub extra: Map<String, Value>,
}

/// Content of a free-standing text block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextContent {
    pub text: Option<String>,
    pub extra: Map<String, Value>,
}

/// Tagged content union. The tag is implicit in the variant; `Other` keeps
/// it explicitly for unrecognized types.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    File(FileContent),
    Channel(ChannelContent),
    Annotation(AnnotationContent),
    Text(TextContent),
    Other {
        block_type: String,
        fields: Map<String, Value>,
    },
}

/// Remove a string field; non-string values stay in the map so they are
/// preserved in `extra`.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            map.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

fn take_u64(map: &mut Map<String, Value>, key: &str) -> Option<u64> {
    match map.remove(key) {
        Some(value) => match value.as_u64() {
            Some(n) => Some(n),
            None => {
                map.insert(key.to_string(), value);
                None
            }
        },
        None => None,
    }
}

fn put_string(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(s) = value {
        map.insert(key.to_string(), Value::String(s.clone()));
    }
}

fn put_u64(map: &mut Map<String, Value>, key: &str, value: Option<u64>) {
    if let Some(n) = value {
        map.insert(key.to_string(), Value::Number(n.into()));
    }
}

impl FileContent {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            filename: take_string(&mut map, "filename"),
            path: take_string(&mut map, "path"),
            full_path: take_string(&mut map, "full_path"),
            file_type: take_string(&mut map, "file_type"),
            indexed_at: take_string(&mut map, "indexed_at"),
            extra: map,
        }
    }

    pub(crate) fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        put_string(&mut map, "filename", &self.filename);
        put_string(&mut map, "path", &self.path);
        put_string(&mut map, "full_path", &self.full_path);
        put_string(&mut map, "file_type", &self.file_type);
        put_string(&mut map, "indexed_at", &self.indexed_at);
        map
    }
}

impl ChannelContent {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            title: take_string(&mut map, "title"),
            description: take_string(&mut map, "description"),
            extra: map,
        }
    }

    pub(crate) fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        put_string(&mut map, "title", &self.title);
        put_string(&mut map, "description", &self.description);
        map
    }
}

impl AnnotationContent {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            text: take_string(&mut map, "text"),
            selected_text: take_string(&mut map, "selected_text"),
            source_file_id: take_u64(&mut map, "source_file_id"),
            source_file_name: take_string(&mut map, "source_file_name"),
            position: take_u64(&mut map, "position"),
            annotation_type: take_string(&mut map, "annotation_type"),
            file_type: take_string(&mut map, "file_type"),
            extra: map,
        }
    }

    pub(crate) fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        put_string(&mut map, "text", &self.text);
        put_string(&mut map, "selected_text", &self.selected_text);
        put_u64(&mut map, "source_file_id", self.source_file_id);
        put_string(&mut map, "source_file_name", &self.source_file_name);
        put_u64(&mut map, "position", self.position);
        put_string(&mut map, "annotation_type", &self.annotation_type);
        put_string(&mut map, "file_type", &self.file_type);
        map
    }
}

impl TextContent {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            text: take_string(&mut map, "text"),
            extra: map,
        }
    }

    pub(crate) fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        put_string(&mut map, "text", &self.text);
        map
    }
}

impl BlockContent {
    /// Build from a wire tag and content map. Total: any tag parses, any
    /// object shape parses.
    pub fn from_tagged(block_type: &str, content: Map<String, Value>) -> Self {
        match block_type {
            BLOCK_TYPE_FILE => Self::File(FileContent::from_map(content)),
            BLOCK_TYPE_CHANNEL => Self::Channel(ChannelContent::from_map(content)),
            BLOCK_TYPE_ANNOTATION => Self::Annotation(AnnotationContent::from_map(content)),
            BLOCK_TYPE_TEXT => Self::Text(TextContent::from_map(content)),
            other => Self::Other {
                block_type: other.to_string(),
                fields: content,
            },
        }
    }

    /// The wire `block_type` tag.
    pub fn block_type(&self) -> &str {
        match self {
            Self::File(_) => BLOCK_TYPE_FILE,
            Self::Channel(_) => BLOCK_TYPE_CHANNEL,
            Self::Annotation(_) => BLOCK_TYPE_ANNOTATION,
            Self::Text(_) => BLOCK_TYPE_TEXT,
            Self::Other { block_type, .. } => block_type,
        }
    }

    /// The full content map as the backend would store it.
    pub fn to_map(&self) -> Map<String, Value> {
        match self {
            Self::File(c) => c.to_map(),
            Self::Channel(c) => c.to_map(),
            Self::Annotation(c) => c.to_map(),
            Self::Text(c) => c.to_map(),
            Self::Other { fields, .. } => fields.clone(),
        }
    }
}

/// The universal content entity. Backend-owned; the UI treats it as
/// immutable except through explicit update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireBlock", into = "WireBlock")]
pub struct Block {
    pub id: BlockId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub content: BlockContent,
    /// Ids of blocks this block references (channel membership,
    /// annotation-to-file linkage). The backend is the sole authority on
    /// this relation.
    pub connections: Vec<BlockId>,
}

impl Block {
    pub fn block_type(&self) -> &str {
        self.content.block_type()
    }

    pub fn is_file(&self) -> bool {
        matches!(self.content, BlockContent::File(_))
    }

    pub fn is_channel(&self) -> bool {
        matches!(self.content, BlockContent::Channel(_))
    }

    /// Content as a JSON map, suitable for `update_block_content`.
    pub fn content_map(&self) -> Map<String, Value> {
        self.content.to_map()
    }

    /// Content map with `overrides` applied on top, preserving every field
    /// the overrides do not name. Used by the channel editor's save path.
    pub fn merged_content(&self, overrides: Map<String, Value>) -> Map<String, Value> {
        let mut map = self.content_map();
        for (key, value) in overrides {
            map.insert(key, value);
        }
        map
    }
}

/// Exact mirror of the backend's JSON shape.
#[derive(Clone, Serialize, Deserialize)]
struct WireBlock {
    id: BlockId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    block_type: String,
    #[serde(default)]
    content: Map<String, Value>,
    #[serde(default)]
    connections: Vec<BlockId>,
}

impl From<WireBlock> for Block {
    fn from(wire: WireBlock) -> Self {
        Self {
            id: wire.id,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            content: BlockContent::from_tagged(&wire.block_type, wire.content),
            connections: wire.connections,
        }
    }
}

impl From<Block> for WireBlock {
    fn from(block: Block) -> Self {
        Self {
            id: block.id,
            created_at: block.created_at,
            updated_at: block.updated_at,
            block_type: block.content.block_type().to_string(),
            content: block.content.to_map(),
            connections: block.connections,
        }
    }
}
