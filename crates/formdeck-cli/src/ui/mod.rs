//! UI primitives for the Formdeck CLI.
//!
//! This module provides:
//! - **Context**: Flags, `[ui]` config, and terminal merged into one `UiContext`
//! - **Mode**: Choosing json, plain, or pretty output
//! - **Theme**: Badge tokens, owo-colors styles, symbols
//! - **Render**: Tables, headers, receipts, hints, errors
//! - **Format**: String utilities (truncate, short ids, timestamps)
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{header, hint, print, simple_table, Column};
//!
//! let ui = ctx.ui_context();
//! if ui.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! print(&ui, &header(&ui, "list", None));
//! print(&ui, &simple_table(&ui, &columns, &rows));
//! print(&ui, &hint(&ui, "formdeck load <id>"));
//! ```

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

// Re-export core types at module level
pub use context::{Terminal, UiContext};
pub use mode::OutputMode;
pub use theme::Badge;

// Re-export commonly used render functions
pub use render::{
    badge, blank_line, header, header_with_context, hint, id_cell, kv, print, print_error,
    print_warning, receipt, simple_table, table, Column,
};

// Re-export commonly used format functions
pub use format::{display_name, format_datetime, short_id, single_line, truncate};
