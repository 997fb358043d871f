//! The on-disk form workspace.
//!
//! Each `formdeck` invocation is one short session over the data directory:
//! the saved collection is hydrated by the core store, the form in progress
//! is restored from its own key, and both are written back by [`Workspace::finish`].

use std::path::Path;

use formdeck_core::storage::CURRENT_FORM_KEY;
use formdeck_core::{Form, FormId, FormState, FormStore, JsonFileStorage, SnapshotStorage};

pub struct Workspace {
    store: FormStore<JsonFileStorage>,
}

impl Workspace {
    /// Open the workspace rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        let storage = JsonFileStorage::open(dir)?;
        let current = read_current_form(&storage);
        let mut store = FormStore::hydrate(storage);
        store.apply(|state| state.restore_current(current));
        Ok(Self { store })
    }

    pub fn dir(&self) -> &Path {
        self.store.storage().dir()
    }

    pub fn current_form(&self) -> Option<&Form> {
        self.store.current_form()
    }

    pub fn saved_forms(&self) -> &[Form] {
        self.store.saved_forms()
    }

    pub fn find_saved(&self, id: &FormId) -> Option<&Form> {
        self.store.find_saved(id)
    }

    /// The form in progress, or an error pointing at `formdeck new`.
    pub fn require_current(&self) -> anyhow::Result<&Form> {
        self.current_form().ok_or_else(|| {
            anyhow::anyhow!("No form in progress.\nHint: Run `formdeck new` to start one.")
        })
    }

    /// Run one mutation against the form state.
    pub fn apply<T>(&mut self, mutation: impl FnOnce(&mut FormState) -> T) -> T {
        self.store.apply(mutation)
    }

    /// Write the form in progress and any unwritten saved-collection changes.
    pub fn finish(mut self) -> anyhow::Result<()> {
        let snapshot = serde_json::to_string_pretty(&self.store.current_form())?;
        self.store
            .storage_mut()
            .set(CURRENT_FORM_KEY, &snapshot)?;
        if self.store.has_unpersisted_changes() {
            self.store.persist()?;
        }
        Ok(())
    }
}

/// Read the in-progress slot; a missing or malformed snapshot means none.
fn read_current_form(storage: &JsonFileStorage) -> Option<Form> {
    let raw = match storage.get(CURRENT_FORM_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::error!(error = %err, "could not read form in progress");
            return None;
        }
    };
    match serde_json::from_str::<Option<Form>>(&raw) {
        Ok(form) => form,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed form in progress");
            None
        }
    }
}
