//! Storage backend trait definition.
//!
//! The `SnapshotStorage` trait is the whole contract Formdeck needs from
//! durable storage: read a string stored under a key, and replace it. The
//! store decides what to keep; backends only move bytes.

use crate::error::Result;

/// Key/value storage for serialized snapshots.
///
/// Implementations must ensure:
/// - A `set` either fully replaces the value or leaves the old one readable
/// - `get` of a key that was never written returns `Ok(None)`
pub trait SnapshotStorage {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(value))` if present, `Ok(None)` if never written.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Storage` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Storage` if the value cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
