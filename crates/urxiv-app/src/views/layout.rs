//! Main layout: the active view, the sidebar's channel list, the files
//! list, the header search box and the new-channel form.

use tracing::error;

use urxiv_backend::Backend;
use urxiv_core::{Block, BlockId};

use crate::views::channel::ChannelEvent;

/// Which collection is active in the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Files,
    Channels,
    Blocks,
    Channel(BlockId),
}

/// Navigation signals from child views, applied by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainEvent {
    OpenChannel(BlockId),
    ChannelCreated(BlockId),
}

/// New-channel form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewChannelForm {
    pub title: String,
    pub description: String,
    pub submitting: bool,
    pub error: Option<String>,
}

pub struct MainLayout {
    view: ViewKind,
    channels: Vec<Block>,
    files: Vec<Block>,
    search_query: String,
    show_new_channel_form: bool,
    form: NewChannelForm,
    error: Option<String>,
}

impl MainLayout {
    /// `initial_files` is the startup indexing result handed down by the
    /// shell.
    pub fn new(initial_files: Vec<Block>) -> Self {
        Self {
            view: ViewKind::Files,
            channels: Vec::new(),
            files: initial_files,
            search_query: String::new(),
            show_new_channel_form: false,
            form: NewChannelForm::default(),
            error: None,
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn set_view(&mut self, view: ViewKind) {
        self.view = view;
    }

    pub fn open_channel(&mut self, id: BlockId) {
        self.view = ViewKind::Channel(id);
    }

    pub fn channels(&self) -> &[Block] {
        &self.channels
    }

    pub fn files(&self) -> &[Block] {
        &self.files
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Header search box. The owner pushes it into the active browser's
    /// search term whenever it changes.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    pub async fn load_channels(&mut self, backend: &Backend) {
        match backend.all_channels().await {
            Ok(channels) => self.channels = channels,
            Err(e) => {
                error!(error = %e, "Failed to load channels");
                self.error = Some("Failed to load channels. Please try again.".to_string());
            }
        }
    }

    pub async fn load_files(&mut self, backend: &Backend) {
        match backend.all_files().await {
            Ok(files) => self.files = files,
            Err(e) => {
                error!(error = %e, "Failed to load files");
                self.error = Some("Failed to load files. Please try again.".to_string());
            }
        }
    }

    // -- new-channel form --

    pub fn show_new_channel_form(&self) -> bool {
        self.show_new_channel_form
    }

    pub fn open_new_channel_form(&mut self) {
        self.show_new_channel_form = true;
        self.form = NewChannelForm::default();
    }

    pub fn close_new_channel_form(&mut self) {
        self.show_new_channel_form = false;
        self.form = NewChannelForm::default();
    }

    pub fn form(&self) -> &NewChannelForm {
        &self.form
    }

    pub fn set_form_title(&mut self, title: &str) {
        self.form.title = title.to_string();
    }

    pub fn set_form_description(&mut self, description: &str) {
        self.form.description = description.to_string();
    }

    /// Submit the form. On success the new channel joins the sidebar list
    /// and becomes the active view.
    pub async fn submit_new_channel(&mut self, backend: &Backend) -> Option<Block> {
        let title = self.form.title.trim().to_string();
        if title.is_empty() {
            self.form.error = Some("Title is required".to_string());
            return None;
        }
        let description = self.form.description.trim().to_string();

        self.form.error = None;
        self.form.submitting = true;
        let result = backend.create_channel(&title, &description).await;
        self.form.submitting = false;

        match result {
            Ok(channel) => {
                self.channels.push(channel.clone());
                self.close_new_channel_form();
                self.view = ViewKind::Channel(channel.id);
                Some(channel)
            }
            Err(e) => {
                error!(error = %e, "Failed to create channel");
                self.form.error = Some("Failed to create channel. Please try again.".to_string());
                None
            }
        }
    }

    // -- events from child views --

    pub fn apply(&mut self, event: MainEvent) {
        match event {
            MainEvent::OpenChannel(id) | MainEvent::ChannelCreated(id) => self.open_channel(id),
        }
    }

    /// A channel detail reported a mutation: refresh the sidebar list and,
    /// after a deletion, leave the dead channel view.
    pub async fn handle_channel_event(&mut self, backend: &Backend, event: ChannelEvent) {
        match event {
            ChannelEvent::Updated(_) => self.load_channels(backend).await,
            ChannelEvent::Deleted(id) => {
                self.load_channels(backend).await;
                if self.view == ViewKind::Channel(id) {
                    self.view = ViewKind::Channels;
                }
            }
        }
    }
}
