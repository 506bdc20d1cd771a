//! Recent audit history (most recent first).

use std::sync::Mutex;

use stocktake_audit::HistoryEntry;

use crate::store::{KeyValueStore, StoreError, load_json, save_json};

pub const HISTORY_KEY: &str = "audit_history";

/// Number of entries kept.
pub const HISTORY_LIMIT: usize = 5;

pub struct HistoryRepository<S> {
    store: S,
    write: Mutex<()>,
}

impl<S> HistoryRepository<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            write: Mutex::new(()),
        }
    }

    pub fn list(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(load_json(&self.store, HISTORY_KEY)?.unwrap_or_default())
    }

    /// Prepend `entry` and drop anything past [`HISTORY_LIMIT`].
    ///
    /// Saving the same session again replaces its earlier entry.
    pub fn record(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>, StoreError> {
        let _guard = self.write.lock().map_err(|_| StoreError::Poisoned)?;

        let mut entries = self.list()?;
        entries.retain(|e| e.id != entry.id);
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);
        save_json(&self.store, HISTORY_KEY, &entries)?;

        tracing::info!(entries = entries.len(), "audit history updated");
        Ok(entries)
    }
}
