//! Error types for Keepsake
//!
//! This module defines the common error taxonomy used throughout the
//! system. Failures inside the store core are caught at the boundary of
//! the operation that produced them and converted to log entries; these
//! types give those entries a uniform shape.

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Keepsake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for Keepsake
#[derive(Debug, Error)]
pub enum Error {
    /// The durable blob existed but could not be read or parsed at
    /// startup. Recovered by starting from an empty mapping.
    #[error("failed to load persisted values from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: BlobError,
    },

    /// A store call arrived without a name. The call is a no-op.
    #[error("no name set for value to persist")]
    MissingName,

    /// A flush could not write the blob. In-memory state stays
    /// authoritative; the next successful flush retries with current state.
    #[error("failed to persist values to {path}: {source}")]
    PersistWrite {
        path: PathBuf,
        #[source]
        source: BlobError,
    },

    /// Removal-time cleanup could not delete the blob file.
    #[error("failed to delete persistence file {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: BlobError,
    },

    /// A replay attempt could not deliver downstream.
    #[error("replay of '{name}' failed: {reason}")]
    Replay { name: String, reason: String },
}

/// Error type for durable blob I/O
#[derive(Debug, Error)]
pub enum BlobError {
    /// No blob exists at the given path.
    #[error("blob not found")]
    NotFound,

    /// The blob exists but is not a valid serialized mapping.
    #[error("blob is not a valid mapping: {0}")]
    Parse(#[from] serde_json::Error),

    /// Underlying filesystem failure.
    #[error("blob I/O error: {0}")]
    Io(#[from] std::io::Error),
}
