//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying forms, fields,
//! and preview sessions as JSON or table rows.

mod json;
mod text;

// Re-export public API
pub use json::{form_listing_json, preview_json, summary_json};
pub use text::{field_rows, preview_rows};
