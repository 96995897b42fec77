//! Shared daemon state: the store plus one adapter pair per channel.

use async_trait::async_trait;
use keepsake_common::{Result, Value};
use keepsake_pipeline::{Downstream, IngestAdapter, ReplayAdapter, StartupSignal};
use keepsake_store::PersistentStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One named channel: an ingest adapter recording upstream values and a
/// replay adapter addressable by id for the manual trigger.
struct Channel {
    ingest: IngestAdapter,
    replay_id: Uuid,
}

pub struct AppState {
    store: PersistentStore,
    events: Arc<StartupSignal>,
    downstream: Arc<dyn Downstream>,
    channels: Mutex<HashMap<String, Channel>>,
    replays: Mutex<HashMap<Uuid, Arc<ReplayAdapter>>>,
}

impl AppState {
    pub fn new(
        store: PersistentStore,
        events: Arc<StartupSignal>,
        downstream: Arc<dyn Downstream>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            events,
            downstream,
            channels: Mutex::new(HashMap::new()),
            replays: Mutex::new(HashMap::new()),
        })
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    /// Get or create the adapter pair for `name`; returns the replay id.
    pub fn ensure_channel(&self, name: &str) -> Uuid {
        let mut channels = self.channels.lock();
        if let Some(channel) = channels.get(name) {
            return channel.replay_id;
        }

        let replay = ReplayAdapter::register(
            self.store.clone(),
            name,
            self.downstream.clone(),
            self.events.clone(),
        );
        let replay_id = Uuid::new_v4();
        self.replays.lock().insert(replay_id, replay);
        channels.insert(
            name.to_string(),
            Channel {
                ingest: IngestAdapter::new(self.store.clone(), name),
                replay_id,
            },
        );
        info!(channel = name, %replay_id, "created channel");
        replay_id
    }

    /// Forward one upstream value into the named channel.
    pub fn ingest(&self, name: &str, value: Option<Value>) {
        self.ensure_channel(name);
        let channels = self.channels.lock();
        if let Some(channel) = channels.get(name) {
            channel.ingest.handle(value);
        }
    }

    /// Trigger the replay adapter with the given id.
    ///
    /// `None` if the id is unknown; otherwise the replay outcome.
    pub async fn replay(&self, id: Uuid) -> Option<Result<()>> {
        let adapter = self.replays.lock().get(&id).cloned()?;
        Some(adapter.replay().await)
    }

    /// Channel name -> replay id, for trigger discovery.
    pub fn channel_index(&self) -> HashMap<String, Uuid> {
        self.channels
            .lock()
            .iter()
            .map(|(name, channel)| (name.clone(), channel.replay_id))
            .collect()
    }

    /// Tear the pipeline down: deregister every replay adapter, then close
    /// the store with a final flush.
    pub fn shutdown(&self) {
        for adapter in self.replays.lock().values() {
            adapter.shutdown();
        }
        self.store.close(false);
    }
}

/// Stand-in downstream for the host pipeline: logs each replayed value.
pub struct LogDownstream;

#[async_trait]
impl Downstream for LogDownstream {
    async fn deliver(
        &self,
        name: &str,
        value: Option<Value>,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match value {
            Some(value) => info!(channel = name, %value, "replayed value"),
            None => info!(channel = name, "replayed absent value"),
        }
        Ok(())
    }
}
