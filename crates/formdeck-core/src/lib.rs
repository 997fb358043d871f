//! # Formdeck Core
//!
//! Core library for Formdeck - build data-entry forms from a palette of
//! field types, attach validation and derived-value rules, preview them with
//! live validation, and keep named form definitions for reuse.
//!
//! This crate holds the form model and its engines, independent of any
//! rendering or command-line surface.
//!
//! ## Architecture
//!
//! - **schema**: Form, field, rule, and option definitions
//! - **validation**: Per-field rule evaluation (first failing rule wins)
//! - **derive**: Derived-field resolution from parent values
//! - **patch**: Typed partial field updates and shape checks
//! - **editor**: Mutation engine over the in-progress form and saved forms
//! - **store**: State container bound to storage, with write-through
//! - **storage**: Snapshot storage trait and backends
//! - **preview**: Preview sessions with touched/error tracking
//! - **summary**: Field counts for listings

pub mod derive;
pub mod editor;
pub mod error;
pub mod patch;
pub mod preview;
pub mod schema;
pub mod storage;
pub mod store;
pub mod summary;
pub mod validation;

pub use editor::{FormState, Outcome};
pub use error::{FormError, Result, SaveRejection};
pub use patch::FieldPatch;
pub use preview::PreviewSession;
pub use schema::{
    FieldId, FieldType, FieldValue, Form, FormField, FormId, FormValues, RuleKind, RuleParam,
    SelectOption, ValidationRule,
};
pub use storage::{JsonFileStorage, MemoryStorage, SnapshotStorage};
pub use store::FormStore;
pub use summary::FormSummary;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
