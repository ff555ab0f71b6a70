use serde::{Deserialize, Serialize};

use crate::text::file_extension;

/// Backend-assigned block identifier. Unique, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Coarse file classification derived from the extension.
///
/// The backend stores the classification as a plain string in the file
/// block's `file_type` field; `parse` maps it back without losing
/// unrecognized values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Epub,
    Code,
    Text,
    Image,
    Other(String),
}

const CODE_EXTENSIONS: &[&str] = &[
    "rs", "js", "ts", "jsx", "tsx", "py", "java", "c", "cpp", "h", "hpp", "cs", "go", "html",
    "css", "json", "yaml", "yml", "toml", "xml",
];

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];

impl FileKind {
    /// Classify by extension. Total: anything unrecognized is `Other`.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "epub" | "mobi" => Self::Epub,
            e if CODE_EXTENSIONS.contains(&e) => Self::Code,
            e if TEXT_EXTENSIONS.contains(&e) => Self::Text,
            e if IMAGE_EXTENSIONS.contains(&e) => Self::Image,
            _ => Self::Other(ext),
        }
    }

    /// Classify a filename (or full path) by its extension.
    pub fn from_name(name: &str) -> Self {
        Self::from_extension(&file_extension(name))
    }

    /// Map a stored `file_type` string back to a kind.
    pub fn parse(s: &str) -> Self {
        match s {
            "pdf" => Self::Pdf,
            "epub" => Self::Epub,
            "code" => Self::Code,
            "text" => Self::Text,
            "image" => Self::Image,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pdf => "pdf",
            Self::Epub => "epub",
            Self::Code => "code",
            Self::Text => "text",
            Self::Image => "image",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Glyph reference attached to a browser item. Carries no behavior; the
/// embedding UI decides how (or whether) to draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    File,
    Book,
    FileCode,
    FileText,
    Image,
    Hash,
    Note,
    Block,
}

impl Icon {
    /// Icon for a file kind, with `File` as the default for anything
    /// unrecognized.
    pub fn for_file_kind(kind: &FileKind) -> Self {
        match kind {
            FileKind::Pdf => Self::File,
            FileKind::Epub => Self::Book,
            FileKind::Code => Self::FileCode,
            FileKind::Text => Self::FileText,
            FileKind::Image => Self::Image,
            FileKind::Other(_) => Self::File,
        }
    }
}

/// Ordering applied by the filter/sort engine.
///
/// `parse` is total: unknown strings become `Other`, which the engine treats
/// as "no reordering" rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Recent,
    Alphabetical,
    Type,
    Other(String),
}

impl SortKey {
    pub fn parse(s: &str) -> Self {
        match s {
            "recent" => Self::Recent,
            "alphabetical" => Self::Alphabetical,
            "type" => Self::Type,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Recent => "recent",
            Self::Alphabetical => "alphabetical",
            Self::Type => "type",
            Self::Other(s) => s,
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::Recent
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_name() {
        assert_eq!(FileKind::from_name("paper.pdf"), FileKind::Pdf);
        assert_eq!(FileKind::from_name("book.EPUB"), FileKind::Epub);
        assert_eq!(FileKind::from_name("main.rs"), FileKind::Code);
        assert_eq!(FileKind::from_name("notes.md"), FileKind::Text);
        assert_eq!(FileKind::from_name("photo.jpeg"), FileKind::Image);
        assert_eq!(
            FileKind::from_name("archive.tar.gz"),
            FileKind::Other("gz".to_string())
        );
        assert_eq!(
            FileKind::from_name("no_extension"),
            FileKind::Other(String::new())
        );
    }

    #[test]
    fn test_file_kind_parse_round_trip() {
        for s in ["pdf", "epub", "code", "text", "image", "mystery"] {
            assert_eq!(FileKind::parse(s).as_str(), s);
        }
    }

    #[test]
    fn test_icon_defaults_to_file() {
        let kind = FileKind::Other("blob".to_string());
        assert_eq!(Icon::for_file_kind(&kind), Icon::File);
    }

    #[test]
    fn test_sort_key_parse_total() {
        assert_eq!(SortKey::parse("recent"), SortKey::Recent);
        assert_eq!(SortKey::parse("alphabetical"), SortKey::Alphabetical);
        assert_eq!(SortKey::parse("type"), SortKey::Type);
        assert_eq!(
            SortKey::parse("reverse-chrono"),
            SortKey::Other("reverse-chrono".to_string())
        );
        assert_eq!(SortKey::default(), SortKey::Recent);
    }

    #[test]
    fn test_block_id_display() {
        assert_eq!(BlockId(42).to_string(), "42");
    }
}
