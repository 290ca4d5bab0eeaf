//! Document store backends
//!
//! A backend owns the records of every collection. Lookups receive an
//! identifier that has already been cast to the collection's `_id` type.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use futures_util::future::BoxFuture;
use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use crate::schema::ID_FIELD;
use crate::Record;

/// Trait for the backing document store
pub trait DocumentStore: Send + Sync {
    /// Point lookup by identifier. `Ok(None)` when no record matches.
    fn find_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a Value,
    ) -> BoxFuture<'a, StoreResult<Option<Record>>>;

    /// Insert a record carrying an `_id`
    fn insert<'a>(&'a self, collection: &'a str, record: Record) -> BoxFuture<'a, StoreResult<()>>;
}

/// In-memory backend
///
/// Counts every lookup it serves, so callers can verify whether a query
/// reached the store at all.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, HashMap<String, Record>>>,
    lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lookups served since creation
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of records in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.data
            .read()
            .map(|data| data.get(collection).map_or(0, HashMap::len))
            .unwrap_or(0)
    }

    /// Removes every record of a collection
    pub fn clear(&self, collection: &str) -> StoreResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        data.remove(collection);
        Ok(())
    }

    fn lookup(&self, collection: &str, id: &Value) -> StoreResult<Option<Record>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let data = self
            .data
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(data
            .get(collection)
            .and_then(|c| c.get(&id_key(id)))
            .cloned())
    }

    fn store(&self, collection: &str, record: Record) -> StoreResult<()> {
        let id = record
            .get(ID_FIELD)
            .ok_or_else(|| StoreError::InvalidDocument(format!("missing '{}'", ID_FIELD)))?;
        let key = id_key(id);

        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        let coll = data.entry(collection.to_string()).or_default();

        if coll.contains_key(&key) {
            return Err(StoreError::DuplicateKey(format!("{} {}", collection, key)));
        }
        coll.insert(key, record);
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn find_by_id<'a>(
        &'a self,
        collection: &'a str,
        id: &'a Value,
    ) -> BoxFuture<'a, StoreResult<Option<Record>>> {
        Box::pin(async move { self.lookup(collection, id) })
    }

    fn insert<'a>(&'a self, collection: &'a str, record: Record) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move { self.store(collection, record) })
    }
}

/// Identifiers of different JSON types never collide (`1` vs `"1"`).
fn id_key(id: &Value) -> String {
    id.to_string()
}
