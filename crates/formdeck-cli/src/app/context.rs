//! Application context for the Formdeck CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use crate::cli::Cli;
use crate::config::{read_config, FormdeckConfig, UiSection};
use crate::ui::{Terminal, UiContext};

use super::resolver::{resolve_config_path, resolve_data_dir};
use super::workspace::Workspace;

/// Application context that bundles CLI args with configuration.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<FormdeckConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&FormdeckConfig> {
        self.config
            .get_or_try_init(|| read_config(&resolve_config_path()?))
    }

    /// Resolve where forms are stored.
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        resolve_data_dir(self.cli, self.config()?)
    }

    /// Open the form workspace in the resolved data directory.
    pub fn open_workspace(&self) -> anyhow::Result<Workspace> {
        let dir = self.data_dir()?;
        tracing::debug!(dir = %dir.display(), "opening workspace");
        Workspace::open(&dir)
    }

    /// Build the UI context from flags, the `[ui]` config section, and the
    /// terminal.
    ///
    /// A config file that fails to load falls back to defaults here; the
    /// error surfaces when the command opens its workspace.
    pub fn ui_context(&self) -> UiContext {
        let fallback = UiSection::default();
        let prefs = match self.config() {
            Ok(config) => &config.ui,
            Err(_) => &fallback,
        };
        UiContext::resolve(self.cli, prefs, &Terminal::detect())
    }
}
