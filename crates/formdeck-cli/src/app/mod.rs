//! Application-level utilities for the Formdeck CLI.
//!
//! This module provides:
//! - Path resolution for the config file and data directory
//! - The command context with lazily-loaded config
//! - The on-disk workspace holding saved forms and the form in progress

mod context;
mod resolver;
mod workspace;

// Re-export public API
pub use context::AppContext;
pub use workspace::Workspace;
