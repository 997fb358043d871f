//! Form collection store.
//!
//! [`FormStore`] owns the [`FormState`] and a storage backend. The saved
//! collection is hydrated once at construction and written back after every
//! mutation that changes it. Persistence is an explicit step: `apply` runs a
//! mutation and then persists if the saved revision moved, and `persist` can
//! be called directly when the caller wants the error.

use crate::editor::FormState;
use crate::error::Result;
use crate::schema::{Form, FormId};
use crate::storage::{SnapshotStorage, SAVED_FORMS_KEY};

/// Process-wide form state bound to a storage backend.
#[derive(Debug)]
pub struct FormStore<S: SnapshotStorage> {
    state: FormState,
    storage: S,
    persisted_revision: u64,
}

impl<S: SnapshotStorage> FormStore<S> {
    /// Build a store whose saved collection is read from `storage`.
    ///
    /// A missing, unreadable, or malformed snapshot is logged and treated as
    /// an empty collection.
    pub fn hydrate(storage: S) -> Self {
        let state = FormState::with_saved(load_saved_forms(&storage));
        let persisted_revision = state.revision();
        Self {
            state,
            storage,
            persisted_revision,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn current_form(&self) -> Option<&Form> {
        self.state.current_form()
    }

    pub fn saved_forms(&self) -> &[Form] {
        self.state.saved_forms()
    }

    pub fn find_saved(&self, id: &FormId) -> Option<&Form> {
        self.state.find_saved(id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Whether the saved collection has changes not yet written.
    pub fn has_unpersisted_changes(&self) -> bool {
        self.state.revision() != self.persisted_revision
    }

    /// Run one mutation, then write through if the saved collection changed.
    ///
    /// A failed write is logged and swallowed: the in-memory state stays
    /// authoritative and the next successful write catches storage up.
    pub fn apply<T>(&mut self, mutation: impl FnOnce(&mut FormState) -> T) -> T {
        let result = mutation(&mut self.state);
        if self.has_unpersisted_changes() {
            if let Err(err) = self.persist() {
                tracing::error!(error = %err, "failed to persist saved forms");
            }
        }
        result
    }

    /// Serialize the full saved collection and write it to storage.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Serialization` or `FormError::Storage` if the
    /// snapshot could not be produced or written.
    pub fn persist(&mut self) -> Result<()> {
        let snapshot = serde_json::to_string_pretty(self.state.saved_forms())?;
        self.storage.set(SAVED_FORMS_KEY, &snapshot)?;
        self.persisted_revision = self.state.revision();
        tracing::debug!(
            forms = self.state.saved_forms().len(),
            "persisted saved forms"
        );
        Ok(())
    }

    pub fn into_parts(self) -> (FormState, S) {
        (self.state, self.storage)
    }
}

/// Read the saved collection from `storage`, falling back to empty.
pub fn load_saved_forms<S: SnapshotStorage + ?Sized>(storage: &S) -> Vec<Form> {
    let raw = match storage.get(SAVED_FORMS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::info!("no saved forms snapshot; starting empty");
            return Vec::new();
        }
        Err(err) => {
            tracing::error!(error = %err, "could not read saved forms; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Form>>(&raw) {
        Ok(mut forms) => {
            for form in &mut forms {
                form.renumber();
            }
            tracing::info!(forms = forms.len(), "loaded saved forms");
            forms
        }
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed saved forms snapshot");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;
    use crate::schema::FieldType;
    use crate::storage::MemoryStorage;

    /// Storage whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: bool,
        writes: usize,
    }

    impl SnapshotStorage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(FormError::Storage("disk unavailable".to_string()));
            }
            self.writes += 1;
            self.inner.set(key, value)
        }
    }

    fn save_one(store: &mut FormStore<impl SnapshotStorage>, name: &str) -> FormId {
        store.apply(|state| {
            let _ = state.initialize();
            let _ = state.add_field(FieldType::Text, None);
            state.save_form(name).unwrap()
        })
    }

    #[test]
    fn test_hydrate_empty_storage() {
        let store = FormStore::hydrate(MemoryStorage::new());
        assert!(store.saved_forms().is_empty());
        assert!(store.current_form().is_none());
    }

    #[test]
    fn test_hydrate_malformed_snapshot_is_empty() {
        for raw in ["{not json", "{\"id\": 1}", "[{\"name\": \"no id\"}]"] {
            let store = FormStore::hydrate(MemoryStorage::with_entry(SAVED_FORMS_KEY, raw));
            assert!(store.saved_forms().is_empty(), "snapshot {:?}", raw);
        }
    }

    #[test]
    fn test_save_writes_through() {
        let mut store = FormStore::hydrate(MemoryStorage::new());
        let id = save_one(&mut store, "Contact");

        let (_, storage) = store.into_parts();
        let reloaded = FormStore::hydrate(storage);
        assert_eq!(reloaded.saved_forms().len(), 1);
        assert_eq!(reloaded.find_saved(&id).unwrap().name, "Contact");
    }

    #[test]
    fn test_in_progress_edits_do_not_write() {
        let mut store = FormStore::hydrate(FlakyStorage::default());
        store.apply(|state| {
            let _ = state.initialize();
            let _ = state.add_field(FieldType::Text, None);
        });
        assert_eq!(store.storage().writes, 0);
        assert!(!store.has_unpersisted_changes());
    }

    #[test]
    fn test_failed_write_keeps_memory_authoritative() {
        let mut store = FormStore::hydrate(FlakyStorage {
            fail_writes: true,
            ..FlakyStorage::default()
        });
        let first = save_one(&mut store, "First");
        assert_eq!(store.saved_forms().len(), 1);
        assert!(store.has_unpersisted_changes());

        store.storage_mut().fail_writes = false;
        save_one(&mut store, "Second");
        assert!(!store.has_unpersisted_changes());

        let raw = store.storage().get(SAVED_FORMS_KEY).unwrap().unwrap();
        let persisted: Vec<Form> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].id, first);
    }

    #[test]
    fn test_rejected_save_does_not_write() {
        let mut store = FormStore::hydrate(FlakyStorage::default());
        let result = store.apply(|state| {
            let _ = state.initialize();
            state.save_form("Nothing yet")
        });
        assert!(result.is_err());
        assert_eq!(store.storage().writes, 0);
        assert!(store.current_form().is_some());
    }

    #[test]
    fn test_explicit_persist_surfaces_errors() {
        let mut store = FormStore::hydrate(FlakyStorage {
            fail_writes: true,
            ..FlakyStorage::default()
        });
        assert!(matches!(store.persist(), Err(FormError::Storage(_))));
    }
}
