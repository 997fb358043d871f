//! Error types for Formdeck core operations.
//!
//! Field-level validation messages are not errors: the evaluator returns them
//! as `Option<String>`. Everything here is either a rejected mutation the user
//! can correct, or a storage problem the caller decides how to surface.

use thiserror::Error;

/// Result type alias for Formdeck operations.
pub type Result<T> = std::result::Result<T, FormError>;

/// Why a save request was refused.
///
/// The `Display` text is the form-level message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SaveRejection {
    #[error("Please enter a form name")]
    MissingName,

    #[error("Please add at least one field to the form")]
    NoFields,

    #[error("There is no form in progress")]
    NoCurrentForm,
}

/// Core error type for Formdeck operations.
#[derive(Debug, Error)]
pub enum FormError {
    /// Save preconditions not met (missing name, no fields)
    #[error("{0}")]
    SavePrecondition(#[from] SaveRejection),

    /// Reorder index outside the field list
    #[error("Index {index} is out of range for a form with {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    /// Field update would leave the field in an invalid shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Derived-field dependencies would form a loop
    #[error("Dependency cycle: {0}")]
    DependencyCycle(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Snapshot could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FormError {
    /// Whether this error is a user-correctable rejection rather than a fault.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            FormError::SavePrecondition(_)
                | FormError::IndexOutOfRange { .. }
                | FormError::InvalidInput(_)
                | FormError::DependencyCycle(_)
        )
    }
}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Serialization(err.to_string())
    }
}
