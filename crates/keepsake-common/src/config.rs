//! Configuration types for Keepsake
//!
//! This module defines the configuration structure consumed by a
//! persistent store at construction time.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default debounce window in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Configuration for a persistent store instance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Target location of the durable blob file
    pub path: PathBuf,
    /// Debounce window in seconds between a mutation and its flush
    pub interval_secs: u64,
}

impl StoreConfig {
    /// Create a configuration with the default debounce window.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }

    /// Override the debounce window.
    #[must_use]
    pub fn with_interval_secs(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    /// The debounce window as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
