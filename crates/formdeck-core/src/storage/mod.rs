//! Storage layer for form snapshots.
//!
//! Two backends implement [`SnapshotStorage`]:
//! - [`JsonFileStorage`]: one JSON file per key, replaced atomically
//! - [`MemoryStorage`]: in-process map, for tests and embedding

mod json_file;
mod memory;
mod traits;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use traits::SnapshotStorage;

/// Key under which the saved collection is persisted.
pub const SAVED_FORMS_KEY: &str = "savedForms";

/// Key under which a host may keep the in-progress form between sessions.
pub const CURRENT_FORM_KEY: &str = "currentForm";
