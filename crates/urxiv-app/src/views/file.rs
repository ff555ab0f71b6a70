//! File detail: raw content loading, preview dispatch by file kind, and
//! the annotation flow (draft, save, listing).
//!
//! Rendering a preview (PDF engine, syntax highlighting) belongs to the
//! embedding UI; the dispatch result here is the contract.

use tracing::{error, warn};

use urxiv_backend::{Backend, NewAnnotation};
use urxiv_core::text::mime_type;
use urxiv_core::{Block, BlockContent, BlockId, FileKind};

use crate::views::blocks::BlocksView;

/// What the viewer should draw for the active file.
#[derive(Debug, Clone, PartialEq)]
pub enum FilePreview {
    Pdf { bytes: Vec<u8> },
    Text { text: String },
    Code { text: String },
    Image { mime: &'static str, bytes: Vec<u8> },
    Unsupported { kind: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileTab {
    #[default]
    File,
    Annotations,
}

/// Draft of an annotation being written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationDraft {
    pub text: String,
    pub selected_text: Option<String>,
    pub position: Option<u64>,
}

/// Render snapshot for the header/tab chrome.
#[derive(Debug, Clone, PartialEq)]
pub enum FileDetailView {
    Loading,
    Error { message: String },
    Ready {
        title: String,
        kind: String,
        tab: FileTab,
        annotation_count: usize,
    },
}

pub struct FileDetail {
    id: BlockId,
    file: Option<Block>,
    preview: Option<FilePreview>,
    annotations: Vec<Block>,
    tab: FileTab,
    draft: Option<AnnotationDraft>,
    /// Current page (PDF) or line (everything else), fed by the viewer.
    position: u64,
    /// Selection captured from the viewer, attached to the next draft.
    selected_text: Option<String>,
    is_loading: bool,
    error: Option<String>,
}

impl FileDetail {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            file: None,
            preview: None,
            annotations: Vec::new(),
            tab: FileTab::File,
            draft: None,
            position: 1,
            selected_text: None,
            is_loading: false,
            error: None,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Load the block, its raw bytes and its annotations. A failed
    /// annotation load degrades to an empty list; a failed content load is
    /// the view's error state.
    pub async fn load(&mut self, backend: &Backend) {
        self.is_loading = true;
        self.error = None;

        let block = match backend.block(self.id).await {
            Ok(block) => block,
            Err(e) => {
                error!(block_id = %self.id, error = %e, "Failed to load file block");
                self.error = Some("Failed to load file content. Please try again.".to_string());
                self.is_loading = false;
                return;
            }
        };

        if let BlockContent::File(content) = &block.content {
            let filename = content.filename.clone().unwrap_or_default();
            let kind = match &content.file_type {
                Some(t) => FileKind::parse(t),
                None => FileKind::from_name(&filename),
            };
            match &content.full_path {
                Some(path) => match backend.file_content(path).await {
                    Ok(bytes) => {
                        self.preview = Some(dispatch_preview(&kind, &filename, bytes));
                    }
                    Err(e) => {
                        error!(path = %path, error = %e, "Failed to read file");
                        self.error =
                            Some("Failed to load file content. Please try again.".to_string());
                        self.is_loading = false;
                        return;
                    }
                },
                None => {
                    self.preview = Some(FilePreview::Unsupported {
                        kind: kind.as_str().to_string(),
                    });
                }
            }
        }

        match backend.file_annotations(self.id).await {
            Ok(annotations) => self.annotations = annotations,
            Err(e) => {
                warn!(block_id = %self.id, error = %e, "Failed to load annotations");
                self.annotations = Vec::new();
            }
        }

        self.file = Some(block);
        self.is_loading = false;
    }

    pub fn preview(&self) -> Option<&FilePreview> {
        self.preview.as_ref()
    }

    pub fn annotations(&self) -> &[Block] {
        &self.annotations
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    pub fn tab(&self) -> FileTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: FileTab) {
        self.tab = tab;
    }

    // -- viewer feedback --

    pub fn set_position(&mut self, position: u64) {
        self.position = position;
    }

    pub fn set_selected_text(&mut self, selected: Option<String>) {
        self.selected_text = selected;
    }

    // -- annotation drafting --

    pub fn begin_annotation(&mut self) {
        self.draft = Some(AnnotationDraft {
            text: String::new(),
            selected_text: self.selected_text.clone(),
            position: Some(self.position),
        });
    }

    pub fn draft(&self) -> Option<&AnnotationDraft> {
        self.draft.as_ref()
    }

    pub fn set_draft_text(&mut self, text: &str) {
        if let Some(draft) = &mut self.draft {
            draft.text = text.to_string();
        }
    }

    pub fn cancel_annotation(&mut self) {
        self.draft = None;
    }

    /// Create the annotation and append it to the local list. Empty drafts
    /// are rejected without a backend call.
    pub async fn save_annotation(&mut self, backend: &Backend) -> Option<Block> {
        let draft = self.draft.clone()?;
        let text = draft.text.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let result = backend
            .create_annotation(NewAnnotation {
                text,
                source_file_id: Some(self.id),
                position: draft.position,
                selected_text: draft.selected_text,
                parent_channel_id: None,
            })
            .await;

        match result {
            Ok(annotation) => {
                self.annotations.push(annotation.clone());
                self.draft = None;
                self.selected_text = None;
                Some(annotation)
            }
            Err(e) => {
                error!(block_id = %self.id, error = %e, "Failed to create annotation");
                self.error = Some("Failed to create annotation. Please try again.".to_string());
                None
            }
        }
    }

    /// Browser over this file's annotations, for the annotations tab.
    pub fn annotations_view(&self) -> BlocksView {
        let mut view = BlocksView::new()
            .with_empty_message("No annotations yet. Switch to the File tab to add some.");
        view.set_blocks(self.annotations.clone());
        view
    }

    pub async fn open_externally(&self, backend: &Backend) {
        let Some(path) = self.file.as_ref().and_then(crate::views::block_full_path) else {
            warn!(block_id = %self.id, "File has no path to open");
            return;
        };
        if let Err(e) = backend.open_external(&path).await {
            error!(path = %path, error = %e, "Failed to open file");
        }
    }

    pub fn render(&self) -> FileDetailView {
        if self.is_loading {
            return FileDetailView::Loading;
        }
        if let Some(message) = &self.error {
            return FileDetailView::Error {
                message: message.clone(),
            };
        }
        let Some(file) = &self.file else {
            return FileDetailView::Error {
                message: "No file selected".to_string(),
            };
        };

        let item = urxiv_core::to_browser_item(file);
        FileDetailView::Ready {
            title: item.title,
            kind: item.kind,
            tab: self.tab,
            annotation_count: self.annotations.len(),
        }
    }
}

fn dispatch_preview(kind: &FileKind, filename: &str, bytes: Vec<u8>) -> FilePreview {
    match kind {
        FileKind::Pdf => FilePreview::Pdf { bytes },
        FileKind::Text => FilePreview::Text {
            text: String::from_utf8_lossy(&bytes).into_owned(),
        },
        FileKind::Code => FilePreview::Code {
            text: String::from_utf8_lossy(&bytes).into_owned(),
        },
        FileKind::Image => FilePreview::Image {
            mime: mime_type(filename),
            bytes,
        },
        other => FilePreview::Unsupported {
            kind: other.as_str().to_string(),
        },
    }
}
