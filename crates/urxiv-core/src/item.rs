use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{BlockId, Icon, SortKey};

/// Normalized, display-ready projection of a [`Block`](crate::Block).
///
/// Recomputed on every render by the adapters in [`adapt`](crate::adapt);
/// never persisted. `id` always refers back to exactly one source block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserItem {
    pub id: BlockId,
    pub title: String,
    /// Human-readable secondary line; empty means "nothing to show" and is
    /// ignored by the search stage.
    pub subtitle: Option<String>,
    /// The block type, or the finer file sub-type for file blocks.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip)]
    pub icon: Option<Icon>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Pass-through bag retaining the original content plus any extra
    /// computed fields (e.g. channel block counts).
    pub metadata: Map<String, Value>,
}

impl BrowserItem {
    /// Timestamp used by the "recent" ordering.
    pub fn effective_timestamp(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Label/value pair driving a sort-selector UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SortOption {
    pub value: SortKey,
    pub label: String,
}

impl SortOption {
    pub fn new(value: SortKey, label: &str) -> Self {
        Self {
            value,
            label: label.to_string(),
        }
    }
}
