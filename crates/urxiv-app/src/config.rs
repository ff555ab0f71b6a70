//! Application configuration loaded from environment variables.
//!
//! There are no CLI flags; the application is GUI-embedded and the only
//! knobs are environment variables, all with defaults.

/// Front-end configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Workspace directory to select at startup, bypassing the welcome
    /// flow. Env: `URXIV_WORKSPACE`. Default: none.
    pub workspace: Option<String>,

    /// Whether to run file indexing automatically when a workspace is
    /// already configured at startup.
    /// Env: `URXIV_AUTO_INDEX` (true/false). Default: `true`.
    pub auto_index: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: None,
            auto_index: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("URXIV_WORKSPACE") {
            if !path.is_empty() {
                config.workspace = Some(path);
            }
        }

        if let Ok(val) = std::env::var("URXIV_AUTO_INDEX") {
            config.auto_index = val != "false" && val != "0";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.workspace, None);
        assert!(config.auto_index);
    }
}
