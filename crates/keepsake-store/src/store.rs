//! The debounced persistent store core.
//!
//! A store is a two-state machine per instance: Clean, and Dirty with a
//! pending flush timer. A mutating `store` call in the Clean state marks
//! the mapping dirty and schedules one flush `interval` seconds out.
//! Further mutations while the timer is outstanding coalesce into that
//! same flush; the timer is never rescheduled. The timer firing, an
//! explicit `flush`, or `close` returns the store to Clean.
//!
//! All state lives behind one mutex, and the blob write happens under it,
//! so a flush never overlaps a `store` call and no two flushes overlap.
//! The single-pending-timer invariant is data (`Inner::pending`), not
//! scheduling luck.

use crate::blob::BlobStore;
use keepsake_common::{BlobError, Error, Mapping, StoreConfig, Value};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Debounced persistent key/value store.
///
/// Cheap to clone; clones share the same mapping, dirty flag, and timer.
#[derive(Clone)]
pub struct PersistentStore {
    shared: Arc<Shared>,
}

struct Shared {
    config: StoreConfig,
    blob: Arc<dyn BlobStore>,
    inner: Mutex<Inner>,
}

struct Inner {
    values: Mapping,
    dirty: bool,
    /// At most one outstanding scheduled flush.
    pending: Option<JoinHandle<()>>,
}

impl PersistentStore {
    /// Open a store over the blob at `config.path`.
    ///
    /// A missing blob starts the store empty and silent. A blob that is
    /// present but unreadable or corrupt also starts the store empty, but
    /// is reported as a load failure. Construction never fails.
    pub fn open(blob: Arc<dyn BlobStore>, config: StoreConfig) -> Self {
        let values = match blob.read_mapping(&config.path) {
            Ok(values) => values,
            Err(BlobError::NotFound) => Mapping::new(),
            Err(source) => {
                error!(
                    "{}",
                    Error::Load {
                        path: config.path.clone(),
                        source,
                    }
                );
                Mapping::new()
            }
        };
        debug!(path = %config.path.display(), entries = values.len(), "opened persistent store");
        Self {
            shared: Arc::new(Shared {
                config,
                blob,
                inner: Mutex::new(Inner {
                    values,
                    dirty: false,
                    pending: None,
                }),
            }),
        }
    }

    /// Record or delete a value.
    ///
    /// `None` deletes the entry for `name` if present. `Some(v)` replaces
    /// the held value when it differs by value-equality; storing an equal
    /// value is a no-op and does not touch the dirty flag or the timer.
    /// Any mutation marks the state dirty and, if no flush is already
    /// pending, schedules one `interval` seconds out. An empty `name` is
    /// reported and ignored. Never fails past this boundary.
    pub fn store(&self, name: &str, value: Option<Value>) {
        if name.is_empty() {
            warn!("{}", Error::MissingName);
            return;
        }

        let mut inner = self.shared.inner.lock();
        let mutated = match value {
            None => inner.values.remove(name).is_some(),
            Some(value) => {
                if inner.values.get(name) == Some(&value) {
                    false
                } else {
                    inner.values.insert(name.to_string(), value);
                    true
                }
            }
        };
        if !mutated {
            return;
        }

        inner.dirty = true;
        if inner.pending.is_none() {
            let store = self.clone();
            let interval = self.shared.config.interval();
            inner.pending = Some(tokio::spawn(async move {
                tokio::time::sleep(interval).await;
                store.flush();
            }));
            debug!(
                name,
                interval_secs = self.shared.config.interval_secs,
                "scheduled debounced flush"
            );
        }
    }

    /// Last stored value for `name`, or `None` if never stored or deleted.
    ///
    /// Pure in-memory read; never touches durable storage.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.shared.inner.lock().values.get(name).cloned()
    }

    /// Force a write of the current mapping.
    ///
    /// Clears the pending-timer marker in every case, so a later mutation
    /// starts a fresh debounce window. Skips disk I/O when nothing is
    /// dirty. A write failure is reported and the dirty flag retained;
    /// the next flush retries with then-current state.
    pub fn flush(&self) {
        let mut inner = self.shared.inner.lock();
        self.flush_locked(&mut inner);
    }

    fn flush_locked(&self, inner: &mut Inner) {
        if let Some(handle) = inner.pending.take() {
            handle.abort();
        }
        if !inner.dirty {
            return;
        }
        match self
            .shared
            .blob
            .write_mapping(&self.shared.config.path, &inner.values)
        {
            Ok(()) => {
                inner.dirty = false;
                debug!(
                    path = %self.shared.config.path.display(),
                    entries = inner.values.len(),
                    "flushed persistent store"
                );
            }
            Err(source) => {
                error!(
                    "{}",
                    Error::PersistWrite {
                        path: self.shared.config.path.clone(),
                        source,
                    }
                );
            }
        }
    }

    /// Shut the store down.
    ///
    /// Cancels any pending timer. With `removed` the blob file is deleted
    /// (the store is being permanently decommissioned); otherwise one
    /// final synchronous flush captures any open debounce window.
    pub fn close(&self, removed: bool) {
        let mut inner = self.shared.inner.lock();
        if removed {
            if let Some(handle) = inner.pending.take() {
                handle.abort();
            }
            match self.shared.blob.delete(&self.shared.config.path) {
                Ok(()) => {
                    debug!(path = %self.shared.config.path.display(), "deleted persistence file");
                }
                Err(BlobError::NotFound) => {
                    debug!(path = %self.shared.config.path.display(), "no persistence file to delete");
                }
                Err(source) => {
                    error!(
                        "{}",
                        Error::Delete {
                            path: self.shared.config.path.clone(),
                            source,
                        }
                    );
                }
            }
        } else {
            self.flush_locked(&mut inner);
        }
    }

    /// True if the mapping has mutations not yet written to the blob.
    pub fn is_dirty(&self) -> bool {
        self.shared.inner.lock().dirty
    }

    /// True if a debounced flush is currently scheduled.
    pub fn has_pending_flush(&self) -> bool {
        self.shared.inner.lock().pending.is_some()
    }
}
