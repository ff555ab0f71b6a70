//! The application shell: backend readiness, workspace gating and the
//! initial indexing pass.

use tracing::{error, info};

use urxiv_backend::Backend;
use urxiv_core::Block;

use crate::config::AppConfig;

/// Top-level route: the welcome flow until a workspace is selected, the
/// main layout afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Welcome,
    Main,
}

pub struct AppShell {
    route: Route,
    has_workspace: bool,
    initial_files: Vec<Block>,
    error: Option<String>,
}

impl Default for AppShell {
    fn default() -> Self {
        Self::new()
    }
}

impl AppShell {
    pub fn new() -> Self {
        Self {
            route: Route::Welcome,
            has_workspace: false,
            initial_files: Vec::new(),
            error: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn has_workspace(&self) -> bool {
        self.has_workspace
    }

    /// File blocks produced by the startup indexing pass, handed to the
    /// main layout as its initial files list.
    pub fn initial_files(&self) -> &[Block] {
        &self.initial_files
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drive the backend to readiness and resolve the startup route. With a
    /// workspace already configured (or preselected via configuration) the
    /// shell lands on `Main`, indexing first when enabled; otherwise it
    /// stays on the welcome flow.
    pub async fn initialize(&mut self, backend: &Backend, config: &AppConfig) {
        self.error = None;

        match backend.initialize().await {
            Ok(has_workspace) => self.has_workspace = has_workspace,
            Err(e) => {
                error!(error = %e, "Backend unavailable");
                self.error = Some("Failed to connect to the backend. Please try again.".to_string());
                return;
            }
        }

        if !self.has_workspace {
            if let Some(path) = config.workspace.clone() {
                info!(path = %path, "Selecting preconfigured workspace");
                self.choose_workspace(backend, &path).await;
                return;
            }
            self.route = Route::Welcome;
            return;
        }

        if config.auto_index {
            self.index(backend).await;
        }
        self.route = Route::Main;
    }

    /// Select a workspace root (the path comes from the host environment's
    /// folder picker) and index it. On success the shell routes to `Main`.
    pub async fn choose_workspace(&mut self, backend: &Backend, path: &str) {
        self.error = None;

        if let Err(e) = backend.select_workspace(path).await {
            error!(path = %path, error = %e, "Workspace selection failed");
            self.error = Some("Failed to select workspace. Please try again.".to_string());
            return;
        }

        self.has_workspace = true;
        self.index(backend).await;
        self.route = Route::Main;
    }

    /// Re-run indexing, refreshing the initial files list.
    pub async fn index(&mut self, backend: &Backend) {
        match backend.index_workspace_files().await {
            Ok(files) => {
                info!(count = files.len(), "Workspace indexed");
                self.initial_files = files;
            }
            Err(e) => {
                error!(error = %e, "Workspace indexing failed");
                self.error = Some("Failed to index workspace files.".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use urxiv_backend::StubBackend;

    fn config() -> AppConfig {
        AppConfig {
            workspace: None,
            auto_index: true,
        }
    }

    #[tokio::test]
    async fn test_no_workspace_routes_to_welcome() {
        let backend = Backend::new(Arc::new(StubBackend::new()));
        let mut shell = AppShell::new();
        shell.initialize(&backend, &config()).await;
        assert_eq!(shell.route(), Route::Welcome);
        assert!(!shell.has_workspace());
    }

    #[tokio::test]
    async fn test_workspace_routes_to_main_and_indexes() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        stub.seed_file("a.pdf", "/ws/docs");
        let backend = Backend::new(Arc::new(stub));

        let mut shell = AppShell::new();
        shell.initialize(&backend, &config()).await;
        assert_eq!(shell.route(), Route::Main);
        assert_eq!(shell.initial_files().len(), 1);
    }

    #[tokio::test]
    async fn test_auto_index_disabled_skips_indexing() {
        let stub = StubBackend::new();
        stub.set_workspace("/ws");
        stub.seed_file("a.pdf", "/ws/docs");
        let backend = Backend::new(Arc::new(stub));

        let mut shell = AppShell::new();
        shell
            .initialize(
                &backend,
                &AppConfig {
                    workspace: None,
                    auto_index: false,
                },
            )
            .await;
        assert_eq!(shell.route(), Route::Main);
        assert!(shell.initial_files().is_empty());
    }

    #[tokio::test]
    async fn test_preconfigured_workspace_selected_at_startup() {
        let backend = Backend::new(Arc::new(StubBackend::new()));
        let mut shell = AppShell::new();
        shell
            .initialize(
                &backend,
                &AppConfig {
                    workspace: Some("/ws".to_string()),
                    auto_index: true,
                },
            )
            .await;
        assert_eq!(shell.route(), Route::Main);
        assert!(shell.has_workspace());
    }

    #[tokio::test]
    async fn test_choose_workspace_from_welcome() {
        let backend = Backend::new(Arc::new(StubBackend::new()));
        let mut shell = AppShell::new();
        shell.initialize(&backend, &config()).await;
        assert_eq!(shell.route(), Route::Welcome);

        shell.choose_workspace(&backend, "/ws").await;
        assert_eq!(shell.route(), Route::Main);
        assert!(shell.error().is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_error() {
        let stub = StubBackend::new();
        stub.fail_next("get_workspace_status");
        let backend = Backend::new(Arc::new(stub));

        let mut shell = AppShell::new();
        shell.initialize(&backend, &config()).await;
        assert!(shell.error().is_some());
        assert_eq!(shell.route(), Route::Welcome);
    }
}
