//! Observability for docql
//!
//! Structured logging goes through `tracing`. Every record carries an
//! `event` field holding one of the stable [`Event`] names, plus the model
//! name and, inside a resolve call, its request id.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No subscriber is installed by the library; the host application
//!    chooses where records go
//!
//! # Usage
//!
//! ```ignore
//! use docql::observability::Event;
//!
//! tracing::debug!(event = %Event::QueryExecuted, model = "User", "lookup finished");
//! ```

mod events;

pub use events::Event;
