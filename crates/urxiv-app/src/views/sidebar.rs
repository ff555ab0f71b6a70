//! Sidebar: the view switcher plus the per-kind file filter with counts.

use urxiv_core::{Block, BlockContent};

/// File-kind pre-filter applied to the files browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFilter {
    #[default]
    All,
    Pdf,
    Epub,
    Code,
    Text,
}

impl FileFilter {
    pub const ALL: [FileFilter; 5] = [
        FileFilter::All,
        FileFilter::Pdf,
        FileFilter::Epub,
        FileFilter::Code,
        FileFilter::Text,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Pdf => "PDF",
            Self::Epub => "EPUB",
            Self::Code => "Code",
            Self::Text => "Text",
        }
    }

    fn kind_str(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Pdf => Some("pdf"),
            Self::Epub => Some("epub"),
            Self::Code => Some("code"),
            Self::Text => Some("text"),
        }
    }

    /// Whether a file block passes this filter. Non-file blocks never do.
    pub fn matches(&self, block: &Block) -> bool {
        let BlockContent::File(content) = &block.content else {
            return false;
        };
        match self.kind_str() {
            None => true,
            Some(kind) => content.file_type.as_deref() == Some(kind),
        }
    }
}

/// Per-filter file counts shown next to the sidebar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileCounts {
    pub all: usize,
    pub pdf: usize,
    pub epub: usize,
    pub code: usize,
    pub text: usize,
}

impl FileCounts {
    pub fn get(&self, filter: FileFilter) -> usize {
        match filter {
            FileFilter::All => self.all,
            FileFilter::Pdf => self.pdf,
            FileFilter::Epub => self.epub,
            FileFilter::Code => self.code,
            FileFilter::Text => self.text,
        }
    }
}

/// Count the files list once for all filters.
pub fn file_counts(files: &[Block]) -> FileCounts {
    let mut counts = FileCounts::default();
    for block in files {
        if FileFilter::All.matches(block) {
            counts.all += 1;
        }
        if FileFilter::Pdf.matches(block) {
            counts.pdf += 1;
        }
        if FileFilter::Epub.matches(block) {
            counts.epub += 1;
        }
        if FileFilter::Code.matches(block) {
            counts.code += 1;
        }
        if FileFilter::Text.matches(block) {
            counts.text += 1;
        }
    }
    counts
}

/// Sidebar state: the active file filter. The view switcher itself lives
/// on the main layout; the sidebar only reflects it.
#[derive(Debug, Default)]
pub struct Sidebar {
    filter: FileFilter,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> FileFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FileFilter) {
        self.filter = filter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{json, Map, Value};
    use urxiv_core::BlockId;

    fn file(id: u64, file_type: &str) -> Block {
        let mut content = Map::new();
        content.insert("filename".to_string(), json!(format!("f{id}")));
        content.insert("file_type".to_string(), Value::String(file_type.to_string()));
        let now = Utc::now();
        Block {
            id: BlockId(id),
            created_at: now,
            updated_at: now,
            content: BlockContent::from_tagged("file", content),
            connections: Vec::new(),
        }
    }

    #[test]
    fn test_counts() {
        let files = vec![file(1, "pdf"), file(2, "pdf"), file(3, "code"), file(4, "text")];
        let counts = file_counts(&files);
        assert_eq!(counts.all, 4);
        assert_eq!(counts.pdf, 2);
        assert_eq!(counts.epub, 0);
        assert_eq!(counts.code, 1);
        assert_eq!(counts.text, 1);
        assert_eq!(counts.get(FileFilter::Pdf), 2);
    }

    #[test]
    fn test_filter_matches() {
        let pdf = file(1, "pdf");
        assert!(FileFilter::All.matches(&pdf));
        assert!(FileFilter::Pdf.matches(&pdf));
        assert!(!FileFilter::Code.matches(&pdf));

        let channel = Block {
            content: BlockContent::from_tagged("channel", Map::new()),
            ..file(2, "pdf")
        };
        assert!(!FileFilter::All.matches(&channel));
    }
}
