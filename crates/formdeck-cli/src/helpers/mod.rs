//! Input and parsing helper functions for the CLI.
//!
//! This module provides utilities for:
//! - Flag value parsing: booleans, options, rules, typed values (`parsing`)
//! - Id and prefix resolution for fields and saved forms (`ids`)

mod ids;
mod parsing;

// Re-export public API
pub use ids::{resolve_field_id, resolve_field_ref, resolve_form_id};
pub use parsing::{
    parse_assignment, parse_bool, parse_default, parse_field_type, parse_option, parse_rule,
    parse_value,
};
