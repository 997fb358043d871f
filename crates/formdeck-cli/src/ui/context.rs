//! Display settings for one command: flags, the `[ui]` config section, and
//! what the terminal supports, merged once.

use std::io::IsTerminal;

use crate::cli::Cli;
use crate::config::UiSection;

use super::mode::OutputMode;

const FALLBACK_WIDTH: usize = 80;

/// What the process is attached to, read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminal {
    pub stdout_tty: bool,
    pub stdin_tty: bool,
    /// `TERM=dumb`
    pub dumb: bool,
    /// `NO_COLOR` is set, whatever its value
    pub no_color: bool,
    pub width: usize,
}

impl Terminal {
    pub fn detect() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            stdin_tty: std::io::stdin().is_terminal(),
            dumb: std::env::var("TERM").map_or(false, |term| term == "dumb"),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            width: columns_from_env()
                .or_else(columns_from_tty)
                .unwrap_or(FALLBACK_WIDTH),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiContext {
    pub color: bool,
    pub unicode: bool,
    /// Columns available for tables
    pub width: usize,
    pub mode: OutputMode,
    /// Both stdin and stdout are terminals, so `remove` may ask before deleting
    pub interactive: bool,
}

impl UiContext {
    /// Flags and config can each switch color and unicode off, never on.
    /// Color also needs pretty output on a terminal that allows it.
    pub fn resolve(cli: &Cli, prefs: &UiSection, terminal: &Terminal) -> Self {
        let mode = OutputMode::select(cli.json, cli.format, terminal);
        let color_allowed = prefs.color && !cli.no_color && !terminal.no_color;
        Self {
            color: color_allowed && mode.is_pretty() && terminal.stdout_tty && !terminal.dumb,
            unicode: !(cli.ascii || prefs.ascii),
            width: terminal.width,
            mode,
            interactive: terminal.stdout_tty && terminal.stdin_tty,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

fn columns_from_env() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.trim().parse::<usize>().ok())
        .filter(|&cols| cols > 0)
}

#[cfg(unix)]
fn columns_from_tty() -> Option<usize> {
    use std::mem::MaybeUninit;

    let mut size = MaybeUninit::<libc::winsize>::uninit();
    // SAFETY: TIOCGWINSZ only writes into the winsize buffer passed to it
    let status = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, size.as_mut_ptr()) };
    if status != 0 {
        return None;
    }
    // SAFETY: the ioctl succeeded, so the buffer has been filled in
    let size = unsafe { size.assume_init() };
    (size.ws_col > 0).then_some(size.ws_col as usize)
}

#[cfg(not(unix))]
fn columns_from_tty() -> Option<usize> {
    None
}
