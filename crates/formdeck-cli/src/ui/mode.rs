//! Picking JSON, plain, or pretty output for a command.

use crate::cli::FormatArg;

use super::context::Terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One JSON document on stdout, nothing else
    Json,
    /// `key=value` lines and tab-separated rows for scripts
    #[default]
    Plain,
    /// Tables, badges, and headers for a person at a terminal
    Pretty,
}

impl OutputMode {
    /// `--json` beats `--format`. With neither, a real terminal on stdout
    /// gets pretty output and everything else (pipes, `TERM=dumb`) gets plain.
    pub fn select(json: bool, format: Option<FormatArg>, terminal: &Terminal) -> Self {
        match (json, format) {
            (true, _) => Self::Json,
            (false, Some(FormatArg::Plain)) => Self::Plain,
            (false, Some(FormatArg::Pretty)) => Self::Pretty,
            (false, None) if terminal.stdout_tty && !terminal.dumb => Self::Pretty,
            (false, None) => Self::Plain,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
