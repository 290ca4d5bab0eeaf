//! Document store layer
//!
//! # Query Flow
//!
//! 1. A collection builds a [`LazyQuery`] for an identifier (no I/O)
//! 2. Callers may adjust the query: lean flag, projection, time limit
//! 3. `exec` casts the identifier to the schema's `_id` type
//! 4. The backend performs the point lookup
//! 5. The record is returned plain (lean) or wrapped in a [`Document`]
//!
//! Identifier format errors surface in step 3, as [`StoreError::Cast`].

mod adapter;
mod backend;
mod cast;
mod collection;
mod config;
mod errors;
mod object_id;
mod query;

pub use adapter::StoreAdapter;
pub use backend::{DocumentStore, MemoryStore};
pub use cast::cast_identifier;
pub use collection::Collection;
pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};
pub use object_id::ObjectId;
pub use query::{Document, LazyQuery, QueryOutput};
