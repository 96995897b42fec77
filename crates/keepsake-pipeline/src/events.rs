//! Startup-completion signal.
//!
//! The hosting pipeline fires this once its stages are wired; replay
//! adapters subscribe at construction and must unsubscribe on their own
//! teardown so no callback outlives its adapter.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Handle identifying one subscription, returned by [`StartupSignal::subscribe`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

/// Observer of the startup-completion signal.
#[async_trait]
pub trait StartupListener: Send + Sync {
    async fn on_started(&self);
}

/// Explicit observer registry for the pipeline-started event.
#[derive(Default)]
pub struct StartupSignal {
    listeners: Mutex<HashMap<SubscriptionId, Arc<dyn StartupListener>>>,
}

impl StartupSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; keep the returned id to unsubscribe later.
    pub fn subscribe(&self, listener: Arc<dyn StartupListener>) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.listeners.lock().insert(id, listener);
        id
    }

    /// Remove a subscription. Returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.lock().remove(&id).is_some()
    }

    /// Notify every current subscriber that startup has completed.
    pub async fn started(&self) {
        let listeners: Vec<Arc<dyn StartupListener>> =
            self.listeners.lock().values().cloned().collect();
        for listener in listeners {
            listener.on_started().await;
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len()
    }
}
