//! Resolve parameters and the `before_query` hook

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;
use uuid::Uuid;

use super::errors::ResolveResult;
use crate::schema::ObjectType;
use crate::store::{LazyQuery, StoreAdapter};
use crate::Record;

/// Hook run once, synchronously, between building a query and executing it.
pub type BeforeQuery =
    Arc<dyn Fn(&mut LazyQuery, &ExtendedResolveParams) -> QueryOverride + Send + Sync>;

/// Outcome of a `before_query` hook
pub enum QueryOverride {
    /// Execute the (possibly adjusted) query as usual
    Proceed,
    /// Skip execution; the future's value is the final result. The future
    /// may itself execute a clone of the query.
    Substitute(BoxFuture<'static, ResolveResult<Value>>),
}

impl QueryOverride {
    /// Substitute a ready value
    pub fn value(value: Value) -> Self {
        QueryOverride::Substitute(Box::pin(async move { Ok(value) }))
    }

    /// Substitute the output of a future
    pub fn future<F>(future: F) -> Self
    where
        F: Future<Output = ResolveResult<Value>> + Send + 'static,
    {
        QueryOverride::Substitute(Box::pin(future))
    }

    pub fn is_substitute(&self) -> bool {
        matches!(self, QueryOverride::Substitute(_))
    }
}

impl fmt::Debug for QueryOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOverride::Proceed => write!(f, "Proceed"),
            QueryOverride::Substitute(_) => write!(f, "Substitute(..)"),
        }
    }
}

/// Parameters supplied by the caller for one resolve call
#[derive(Clone, Default)]
pub struct ResolveParams {
    /// Argument name to supplied value
    pub args: Record,
    /// Public field names to return; `None` returns every field
    pub projection: Option<Vec<String>>,
    pub before_query: Option<BeforeQuery>,
}

impl ResolveParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes arguments from a JSON object. Any other value means no arguments.
    pub fn with_args(args: Value) -> Self {
        let args = match args {
            Value::Object(map) => map,
            _ => Record::new(),
        };
        Self {
            args,
            ..Self::default()
        }
    }

    /// Sets one argument
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Restricts the returned fields
    pub fn project<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Installs a `before_query` hook
    pub fn before_query<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut LazyQuery, &ExtendedResolveParams) -> QueryOverride + Send + Sync + 'static,
    {
        self.before_query = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for ResolveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveParams")
            .field("args", &self.args)
            .field("projection", &self.projection)
            .field("before_query", &self.before_query.is_some())
            .finish()
    }
}

/// Resolve parameters as seen by the hook: the caller's parameters plus the
/// store adapter and type descriptor the operation was built for.
#[derive(Clone)]
pub struct ExtendedResolveParams {
    pub args: Record,
    pub projection: Option<Vec<String>>,
    pub before_query: Option<BeforeQuery>,
    pub adapter: Arc<dyn StoreAdapter>,
    pub type_descriptor: Arc<ObjectType>,
    /// Correlates the log records of one call
    pub request_id: Uuid,
}

impl ExtendedResolveParams {
    pub(crate) fn new(
        params: ResolveParams,
        adapter: Arc<dyn StoreAdapter>,
        type_descriptor: Arc<ObjectType>,
    ) -> Self {
        Self {
            args: params.args,
            projection: params.projection,
            before_query: params.before_query,
            adapter,
            type_descriptor,
            request_id: Uuid::new_v4(),
        }
    }
}

impl fmt::Debug for ExtendedResolveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedResolveParams")
            .field("args", &self.args)
            .field("projection", &self.projection)
            .field("before_query", &self.before_query.is_some())
            .field("model", &self.adapter.model_name())
            .field("type", &self.type_descriptor.name())
            .field("request_id", &self.request_id)
            .finish()
    }
}
