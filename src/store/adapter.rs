//! Store adapter: the seam between operations and a record type's collection

use serde_json::Value;

use super::query::LazyQuery;
use crate::alias::AliasMap;

/// What an operation needs from a record type's backing collection.
pub trait StoreAdapter: Send + Sync {
    /// Name of the record type (e.g. `User`)
    fn model_name(&self) -> &str;

    /// Builds, without running, a lean point lookup for `id`.
    fn find_by_id_lean(&self, id: Value) -> LazyQuery;

    /// Storage key to public name mapping of the record type
    fn aliases(&self) -> &AliasMap;
}
