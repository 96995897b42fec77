//! Replay adapter: re-delivers the last stored value downstream.

use crate::events::{StartupListener, StartupSignal, SubscriptionId};
use async_trait::async_trait;
use keepsake_common::{Error, Result, Value};
use keepsake_store::PersistentStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::error;

/// Downstream consumer of replayed values.
#[async_trait]
pub trait Downstream: Send + Sync {
    /// Deliver the replayed value for `name`. `None` means the name was
    /// never stored or was deleted; it is delivered all the same.
    async fn deliver(
        &self,
        name: &str,
        value: Option<Value>,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Replays the last stored value for one name.
///
/// Fires once when the pipeline signals startup completion and again on
/// every explicit trigger. Holds its startup subscription and cancels it
/// on [`ReplayAdapter::shutdown`].
pub struct ReplayAdapter {
    name: String,
    store: PersistentStore,
    downstream: Arc<dyn Downstream>,
    events: Arc<StartupSignal>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl ReplayAdapter {
    /// Build the adapter and register it with the startup signal.
    pub fn register(
        store: PersistentStore,
        name: impl Into<String>,
        downstream: Arc<dyn Downstream>,
        events: Arc<StartupSignal>,
    ) -> Arc<Self> {
        let adapter = Arc::new(Self {
            name: name.into(),
            store,
            downstream,
            events: events.clone(),
            subscription: Mutex::new(None),
        });
        let id = events.subscribe(adapter.clone());
        *adapter.subscription.lock() = Some(id);
        adapter
    }

    /// Fetch the current value for this adapter's name and forward it
    /// downstream, absent results included.
    pub async fn replay(&self) -> Result<()> {
        let value = self.store.get(&self.name);
        self.downstream
            .deliver(&self.name, value)
            .await
            .map_err(|e| Error::Replay {
                name: self.name.clone(),
                reason: e.to_string(),
            })
    }

    /// Cancel the startup subscription. Safe to call more than once.
    pub fn shutdown(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.events.unsubscribe(id);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl StartupListener for ReplayAdapter {
    async fn on_started(&self) {
        if let Err(e) = self.replay().await {
            error!("initial replay failed: {e}");
        }
    }
}
