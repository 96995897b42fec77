//! Keepsake Store - debounced persistent key/value cache
//!
//! The store buffers named values in memory and writes the whole mapping
//! to a durable JSON blob on a debounce timer, on explicit flush, or on
//! shutdown. Reads never touch the disk; the in-memory mapping is
//! authoritative at all times.

pub mod blob;
pub mod store;

pub use blob::{BlobStore, JsonBlobStore};
pub use store::PersistentStore;
