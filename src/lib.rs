//! docql - Lean find-by-identifier operations over a document store
//!
//! Builds API operations from record schemas. Each operation resolves to a
//! plain record under public field names, never a store-bound document.

pub mod alias;
pub mod observability;
pub mod resolver;
pub mod schema;
pub mod store;

/// A record: field name to JSON value, in insertion order
pub type Record = serde_json::Map<String, serde_json::Value>;
