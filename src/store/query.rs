//! Lazy point-lookup queries
//!
//! A [`LazyQuery`] describes a lookup without running it. Nothing touches
//! the store until [`LazyQuery::exec`] is awaited; the identifier is cast at
//! that point, so a malformed identifier fails execution, not construction.
//!
//! Lean mode is an explicit flag. A lean query yields the plain stored
//! record; otherwise the record is wrapped in a [`Document`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::backend::DocumentStore;
use super::cast::cast_identifier;
use super::errors::{StoreError, StoreResult};
use crate::alias::{translate_aliases, AliasMap};
use crate::observability::Event;
use crate::schema::{FieldType, ID_FIELD};
use crate::Record;

/// Deferred lookup of one record by identifier
#[derive(Clone)]
pub struct LazyQuery {
    store: Arc<dyn DocumentStore>,
    model_name: String,
    collection: String,
    id_type: FieldType,
    id: Value,
    lean: bool,
    projection: Option<Vec<String>>,
    max_time: Option<Duration>,
    aliases: Arc<AliasMap>,
}

impl LazyQuery {
    pub(crate) fn new(
        store: Arc<dyn DocumentStore>,
        model_name: impl Into<String>,
        collection: impl Into<String>,
        id_type: FieldType,
        id: Value,
        aliases: Arc<AliasMap>,
    ) -> Self {
        Self {
            store,
            model_name: model_name.into(),
            collection: collection.into(),
            id_type,
            id,
            lean: false,
            projection: None,
            max_time: None,
            aliases,
        }
    }

    /// Builder form of [`LazyQuery::set_lean`]
    pub fn lean(mut self, lean: bool) -> Self {
        self.lean = lean;
        self
    }

    pub fn set_lean(&mut self, lean: bool) -> &mut Self {
        self.lean = lean;
        self
    }

    pub fn is_lean(&self) -> bool {
        self.lean
    }

    /// Restricts the returned fields to the given storage paths. `_id` is
    /// always returned. Dotted paths select inside nested documents.
    pub fn select<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn projection(&self) -> Option<&[String]> {
        self.projection.as_deref()
    }

    /// Fails the query with [`StoreError::Timeout`] if the store takes
    /// longer than `limit`.
    pub fn set_max_time(&mut self, limit: Duration) -> &mut Self {
        self.max_time = Some(limit);
        self
    }

    pub fn max_time(&self) -> Option<Duration> {
        self.max_time
    }

    /// Identifier as supplied, before casting
    pub fn id(&self) -> &Value {
        &self.id
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Runs the lookup.
    ///
    /// Returns `Ok(None)` when no record matches. Cast failures, timeouts
    /// and backend faults are returned unchanged.
    pub async fn exec(self) -> StoreResult<Option<QueryOutput>> {
        let id = cast_identifier(&self.id_type, &self.id)?;

        let fetch = self.store.find_by_id(&self.collection, &id);
        let found = match self.max_time {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| StoreError::Timeout(limit.as_millis() as u64))??,
            None => fetch.await?,
        };

        debug!(
            event = %Event::QueryExecuted,
            model = %self.model_name,
            lean = self.lean,
            found = found.is_some(),
            "point lookup finished"
        );

        let record = match found {
            Some(record) => record,
            None => return Ok(None),
        };

        let record = match &self.projection {
            Some(paths) => project(&record, paths, true),
            None => record,
        };

        Ok(Some(if self.lean {
            QueryOutput::Lean(record)
        } else {
            QueryOutput::Hydrated(Document::new(self.model_name, record, self.aliases))
        }))
    }
}

impl fmt::Debug for LazyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyQuery")
            .field("model_name", &self.model_name)
            .field("collection", &self.collection)
            .field("id", &self.id)
            .field("lean", &self.lean)
            .field("projection", &self.projection)
            .field("max_time", &self.max_time)
            .finish()
    }
}

/// Keeps only the selected paths of a record.
fn project(record: &Record, paths: &[String], keep_id: bool) -> Record {
    let mut out = Record::new();

    for (key, value) in record {
        if keep_id && key == ID_FIELD {
            out.insert(key.clone(), value.clone());
            continue;
        }

        let mut whole = false;
        let mut nested = Vec::new();
        for path in paths {
            match path.split_once('.') {
                None if path == key => whole = true,
                Some((head, rest)) if head == key => nested.push(rest.to_string()),
                _ => {}
            }
        }

        if whole {
            out.insert(key.clone(), value.clone());
        } else if !nested.is_empty() {
            out.insert(key.clone(), project_value(value, &nested));
        }
    }

    out
}

fn project_value(value: &Value, paths: &[String]) -> Value {
    match value {
        Value::Object(doc) => Value::Object(project(doc, paths, false)),
        Value::Array(items) => Value::Array(items.iter().map(|item| project_value(item, paths)).collect()),
        other => other.clone(),
    }
}

/// What an executed query yields
#[derive(Debug, Clone)]
pub enum QueryOutput {
    /// Plain record, exactly as stored
    Lean(Record),
    /// Store-bound instance
    Hydrated(Document),
}

impl QueryOutput {
    pub fn is_lean(&self) -> bool {
        matches!(self, QueryOutput::Lean(_))
    }

    /// Plain stored record, whichever form the query produced
    pub fn into_lean(self) -> Record {
        match self {
            QueryOutput::Lean(record) => record,
            QueryOutput::Hydrated(doc) => doc.into_lean(),
        }
    }
}

/// Record bound to its model, with alias-aware accessors
#[derive(Debug, Clone)]
pub struct Document {
    model_name: String,
    data: Record,
    aliases: Arc<AliasMap>,
    fetched_at: DateTime<Utc>,
}

impl Document {
    fn new(model_name: String, data: Record, aliases: Arc<AliasMap>) -> Self {
        Self {
            model_name,
            data,
            aliases,
            fetched_at: Utc::now(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn id(&self) -> Option<&Value> {
        self.data.get(ID_FIELD)
    }

    /// Reads a top-level field by public name or storage key
    pub fn get(&self, name: &str) -> Option<&Value> {
        let key = self.aliases.storage_key(name).unwrap_or(name);
        self.data.get(key)
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Record under public names
    pub fn to_object(&self) -> Record {
        translate_aliases(&self.data, &self.aliases)
    }

    /// Record under storage keys, detached from the model
    pub fn into_lean(self) -> Record {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::backend::MemoryStore;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn aliases() -> Arc<AliasMap> {
        let mut map = AliasMap::new();
        map.insert("n", "name").unwrap();
        Arc::new(map)
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(
                "users",
                record(json!({
                    "_id": "5f8d0d55b54764421b7156c9",
                    "n": "nodkz",
                    "contacts": {"email": "mail", "skype": "nodkz"},
                    "__v": 0
                })),
            )
            .await
            .unwrap();
        store
    }

    fn query(store: Arc<MemoryStore>, id: Value) -> LazyQuery {
        LazyQuery::new(store, "User", "users", FieldType::ObjectId, id, aliases())
    }

    #[tokio::test]
    async fn test_construction_does_not_touch_store() {
        let store = seeded_store().await;
        let q = query(store.clone(), json!("5f8d0d55b54764421b7156c9")).lean(true);

        assert!(q.is_lean());
        assert_eq!(store.lookup_count(), 0);

        q.exec().await.unwrap();
        assert_eq!(store.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_lean_exec_returns_plain_record() {
        let store = seeded_store().await;
        let out = query(store, json!("5f8d0d55b54764421b7156c9"))
            .lean(true)
            .exec()
            .await
            .unwrap()
            .unwrap();

        assert!(out.is_lean());
        assert_eq!(out.into_lean()["n"], json!("nodkz"));
    }

    #[tokio::test]
    async fn test_hydrated_exec_returns_document() {
        let store = seeded_store().await;
        let out = query(store, json!("5f8d0d55b54764421b7156c9"))
            .exec()
            .await
            .unwrap()
            .unwrap();

        let doc = match out {
            QueryOutput::Hydrated(doc) => doc,
            QueryOutput::Lean(_) => panic!("expected hydrated document"),
        };
        assert_eq!(doc.model_name(), "User");
        assert_eq!(doc.get("name"), Some(&json!("nodkz")));
        assert_eq!(doc.get("n"), Some(&json!("nodkz")));
        assert_eq!(doc.to_object()["name"], json!("nodkz"));
        assert_eq!(doc.id(), Some(&json!("5f8d0d55b54764421b7156c9")));
    }

    #[tokio::test]
    async fn test_malformed_identifier_fails_on_exec() {
        let store = seeded_store().await;
        let err = query(store.clone(), json!(1)).lean(true).exec().await.unwrap_err();

        assert!(err.is_cast());
        assert_eq!(store.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_none() {
        let store = seeded_store().await;
        let out = query(store, json!("000000000000000000000000"))
            .lean(true)
            .exec()
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_projection_keeps_id_and_selected_paths() {
        let store = seeded_store().await;
        let mut q = query(store, json!("5f8d0d55b54764421b7156c9")).lean(true);
        q.select(["n", "contacts.email"]);

        let out = q.exec().await.unwrap().unwrap().into_lean();
        assert_eq!(
            Value::Object(out),
            json!({
                "_id": "5f8d0d55b54764421b7156c9",
                "n": "nodkz",
                "contacts": {"email": "mail"}
            })
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let store = Arc::new(MemoryStore::new());
        let q = query(store, json!("x"));
        let mut copy = q.clone();
        copy.set_lean(true).set_max_time(Duration::from_millis(5));

        assert!(!q.is_lean());
        assert!(q.max_time().is_none());
        assert_eq!(copy.max_time(), Some(Duration::from_millis(5)));
    }
}
