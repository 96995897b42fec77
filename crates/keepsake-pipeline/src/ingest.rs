//! Ingest adapter: records upstream values into the store.

use keepsake_common::Value;
use keepsake_store::PersistentStore;

/// Records each upstream message under this adapter's configured name.
///
/// The store converts its own failures to log entries, so nothing can
/// propagate past this boundary; ingestion keeps processing subsequent
/// messages regardless of what one attempt did.
pub struct IngestAdapter {
    name: String,
    store: PersistentStore,
}

impl IngestAdapter {
    pub fn new(store: PersistentStore, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    /// Handle one upstream message. `None` deletes the stored entry.
    pub fn handle(&self, value: Option<Value>) {
        self.store.store(&self.name, value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
