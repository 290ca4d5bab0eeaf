//! Observable events for docql
//!
//! Events are explicit and typed. Each one carries a stable name that is
//! attached as the `event` field of the emitted `tracing` record.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Assembly
    /// Record schemas loaded from disk
    SchemasLoaded,
    /// Operation built for a record type
    OperationBuilt,

    // Resolve
    /// Resolve call received
    ResolveBegin,
    /// No identifier supplied, nothing queried
    ResolveSkipped,
    /// Hook substituted the result
    QueryOverridden,
    /// Lazy query executed against the store
    QueryExecuted,
    /// Store found no record for the identifier
    RecordNotFound,
    /// Resolve call produced a record
    ResolveComplete,
    /// Resolve call failed
    ResolveFailed,

    // Store
    /// Document inserted
    DocumentCreated,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::OperationBuilt => "OPERATION_BUILT",

            Event::ResolveBegin => "RESOLVE_BEGIN",
            Event::ResolveSkipped => "RESOLVE_SKIPPED",
            Event::QueryOverridden => "QUERY_OVERRIDDEN",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::RecordNotFound => "RECORD_NOT_FOUND",
            Event::ResolveComplete => "RESOLVE_COMPLETE",
            Event::ResolveFailed => "RESOLVE_FAILED",

            Event::DocumentCreated => "DOCUMENT_CREATED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::ResolveFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
