//! Core type definitions for Keepsake
//!
//! The persistence cache stores arbitrary structured payloads under string
//! names. Values keep JSON object semantics: null, number, string, boolean,
//! nested object/array.

use std::collections::HashMap;

/// A stored payload. Arbitrary structured data with JSON semantics.
pub type Value = serde_json::Value;

/// The full name -> value mapping held by a store.
///
/// Name uniqueness is the only structural invariant; insertion order is
/// irrelevant and not preserved.
pub type Mapping = HashMap<String, Value>;
