//! Block-to-BrowserItem adapters.
//!
//! One adapter per known content variant plus a generic fallback, selected
//! by an exhaustive match in [`to_browser_item`]. All adapters are pure and
//! total: every block, whatever its type and content shape, produces a valid
//! item. Missing fields degrade to empty strings or id-based placeholders,
//! never an error, and adapters never fabricate ids.

use serde_json::Value;

use crate::block::{AnnotationContent, Block, BlockContent, ChannelContent, FileContent, TextContent};
use crate::item::BrowserItem;
use crate::text::truncate_text;
use crate::types::{FileKind, Icon};

/// Character budget for titles derived from free-form text.
const TEXT_TITLE_LEN: usize = 80;

/// Convert any block to a browser item, dispatching on its content variant.
pub fn to_browser_item(block: &Block) -> BrowserItem {
    match &block.content {
        BlockContent::File(content) => file_item(block, content),
        BlockContent::Channel(content) => channel_item(block, content),
        BlockContent::Annotation(content) => annotation_item(block, content),
        BlockContent::Text(content) => text_item(block, content),
        BlockContent::Other { block_type, .. } => generic_item(block, block_type),
    }
}

fn file_item(block: &Block, content: &FileContent) -> BrowserItem {
    let kind = content.file_type.clone().unwrap_or_else(|| "file".to_string());
    let icon = Icon::for_file_kind(&FileKind::parse(&kind));

    let mut metadata = content.to_map();
    if let Some(full_path) = &content.full_path {
        metadata.insert("fullPath".to_string(), Value::String(full_path.clone()));
    }

    BrowserItem {
        id: block.id,
        title: content
            .filename
            .clone()
            .unwrap_or_else(|| format!("File {}", block.id)),
        subtitle: Some(content.path.clone().unwrap_or_default()),
        kind,
        icon: Some(icon),
        created_at: block.created_at,
        updated_at: Some(block.updated_at),
        metadata,
    }
}

fn channel_item(block: &Block, content: &ChannelContent) -> BrowserItem {
    BrowserItem {
        id: block.id,
        title: content
            .title
            .clone()
            .unwrap_or_else(|| format!("Channel {}", block.id)),
        subtitle: Some(content.description.clone().unwrap_or_default()),
        kind: "channel".to_string(),
        icon: Some(Icon::Hash),
        created_at: block.created_at,
        updated_at: Some(block.updated_at),
        metadata: content.to_map(),
    }
}

fn annotation_item(block: &Block, content: &AnnotationContent) -> BrowserItem {
    let title = match &content.text {
        Some(text) if !text.is_empty() => truncate_text(text, TEXT_TITLE_LEN),
        _ => format!("Annotation {}", block.id),
    };

    // Prefer naming the source file; otherwise locate the annotation within
    // it (pages for PDFs, lines for everything else).
    let subtitle = match (&content.source_file_name, content.position) {
        (Some(name), _) => format!("From {name}"),
        (None, Some(position)) => {
            if content.file_type.as_deref() == Some("pdf") {
                format!("Page {position}")
            } else {
                format!("Line {position}")
            }
        }
        (None, None) => String::new(),
    };

    BrowserItem {
        id: block.id,
        title,
        subtitle: Some(subtitle),
        kind: "annotation".to_string(),
        icon: Some(Icon::Note),
        created_at: block.created_at,
        updated_at: Some(block.updated_at),
        metadata: content.to_map(),
    }
}

fn text_item(block: &Block, content: &TextContent) -> BrowserItem {
    let title = match &content.text {
        Some(text) if !text.is_empty() => truncate_text(text, TEXT_TITLE_LEN),
        _ => format!("Block {}", block.id),
    };

    BrowserItem {
        id: block.id,
        title,
        subtitle: Some(String::new()),
        kind: "text".to_string(),
        icon: Some(Icon::FileText),
        created_at: block.created_at,
        updated_at: Some(block.updated_at),
        metadata: content.to_map(),
    }
}

fn generic_item(block: &Block, block_type: &str) -> BrowserItem {
    BrowserItem {
        id: block.id,
        title: format!("Block {}", block.id),
        subtitle: Some(format!("Type: {block_type}")),
        kind: block_type.to_string(),
        icon: None,
        created_at: block.created_at,
        updated_at: Some(block.updated_at),
        metadata: block.content.to_map(),
    }
}
