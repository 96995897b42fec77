//! Keepsake Common - Shared types and utilities
//!
//! This crate provides the common types, error definitions, and
//! configuration structures used across all Keepsake components.

pub mod config;
pub mod error;
pub mod types;

pub use config::StoreConfig;
pub use error::{BlobError, Error, Result};
pub use types::{Mapping, Value};
