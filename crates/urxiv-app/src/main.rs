//! Headless demo: walks the main flows of the front-end core over a seeded
//! in-memory backend, logging each rendered state. Exercises the public API
//! end to end outside the test suite; there are no CLI flags.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use urxiv_app::views::{
    AppShell, ChannelDetail, ChannelsView, FileDetail, FilesView, MainLayout, Route,
};
use urxiv_app::AppConfig;
use urxiv_backend::{Backend, StubBackend};
use urxiv_core::SortKey;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting urXiv demo v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env();
    info!(?config, "Loaded configuration");

    let stub = Arc::new(StubBackend::new());
    stub.seed_file("attention.pdf", "/ws/papers");
    stub.seed_file("main.rs", "/ws/src");
    stub.seed_file("notes.md", "/ws");
    stub.set_file_content("/ws/papers/attention.pdf", b"%PDF-1.7".to_vec());
    stub.set_file_content("/ws/notes.md", b"# notes".to_vec());
    let backend = Backend::new(stub.clone());

    // Startup: readiness, workspace gate, indexing.
    let mut shell = AppShell::new();
    shell.initialize(&backend, &config).await;
    if shell.route() == Route::Welcome {
        info!("No workspace configured; selecting one");
        shell.choose_workspace(&backend, "/ws").await;
    }
    anyhow::ensure!(shell.route() == Route::Main, "workspace gate did not open");

    let mut layout = MainLayout::new(shell.initial_files().to_vec());
    layout.load_channels(&backend).await;

    // Browse files: sort, then search.
    let mut files = FilesView::new();
    files.set_blocks(layout.files().to_vec());
    files.set_sort_key(SortKey::Alphabetical);
    for row in files.rows() {
        info!(title = %row.title, kind = %row.kind, date = %row.date, "file row");
    }
    layout.set_search_query("notes");
    files.set_search_term(layout.search_query());
    info!(state = ?files.render(), "files after search");

    // Create a channel and add a file to it.
    layout.open_new_channel_form();
    layout.set_form_title("Reading");
    layout.set_form_description("papers to read");
    let channel = layout
        .submit_new_channel(&backend)
        .await
        .ok_or_else(|| anyhow::anyhow!("channel creation failed"))?;

    let mut detail = ChannelDetail::new(channel.id);
    detail.load(&backend).await;
    detail.load_available_files(&backend).await;
    if let Some(first) = detail.available_files().first().map(|f| f.id) {
        detail.add_file(&backend, first).await;
    }
    info!(state = ?detail.render(), "channel detail");

    let mut channels = ChannelsView::new();
    channels.load(&backend).await;
    for card in channels.cards() {
        info!(title = %card.title, blocks = card.block_count, edited = %card.last_edited, "channel card");
    }

    // Annotate a file.
    if let Some(file_id) = detail.members().first().map(|m| m.id) {
        let mut file = FileDetail::new(file_id);
        file.load(&backend).await;
        file.set_position(2);
        file.begin_annotation();
        file.set_draft_text("follow the references here");
        file.save_annotation(&backend).await;
        info!(state = ?file.render(), "file detail after annotating");
    }

    info!(opened = ?stub.opened_paths(), "Demo complete");
    Ok(())
}
