//! Keepsake Pipeline - adapters between a message pipeline and the store
//!
//! Two thin adapters sit on top of the persistent store: an ingest adapter
//! records values as upstream data arrives, and a replay adapter
//! re-delivers the last known value downstream at startup and on every
//! explicit trigger. The startup signal is an explicit observer registry,
//! not a process-wide event source.

pub mod events;
pub mod ingest;
pub mod replay;

pub use events::{StartupListener, StartupSignal, SubscriptionId};
pub use ingest::IngestAdapter;
pub use replay::{Downstream, ReplayAdapter};
