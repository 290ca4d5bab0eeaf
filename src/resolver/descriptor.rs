//! Operation descriptors
//!
//! A [`Resolver`] is what the API layer registers: a name, an output type,
//! typed arguments and the function that resolves a call.

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ResolveResult;
use super::params::ResolveParams;
use crate::schema::ApiType;
use crate::Record;

/// Resolve function of an operation
pub type ResolveFn =
    Arc<dyn Fn(ResolveParams) -> BoxFuture<'static, ResolveResult<Resolved>> + Send + Sync>;

/// Operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    Query,
    Mutation,
}

/// A declared argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ApiType,
}

impl ArgDef {
    pub fn new(name: impl Into<String>, ty: ApiType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Result of a resolve call
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// No identifier was supplied, or no record matched
    Null,
    /// Record under public field names
    Record(Record),
    /// Value produced by a `before_query` substitute, returned as-is
    Override(Value),
}

impl Resolved {
    pub fn is_null(&self) -> bool {
        matches!(self, Resolved::Null)
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Resolved::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Flattens the result into a JSON value
    pub fn into_value(self) -> Value {
        match self {
            Resolved::Null => Value::Null,
            Resolved::Record(record) => Value::Object(record),
            Resolved::Override(value) => value,
        }
    }
}

/// A generated operation
#[derive(Clone)]
pub struct Resolver {
    name: String,
    kind: ResolverKind,
    description: Option<String>,
    output_type: ApiType,
    args: Vec<ArgDef>,
    resolve_fn: ResolveFn,
}

impl Resolver {
    pub fn new(
        name: impl Into<String>,
        kind: ResolverKind,
        output_type: ApiType,
        args: Vec<ArgDef>,
        resolve_fn: ResolveFn,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            output_type,
            args,
            resolve_fn,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResolverKind {
        self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn output_type(&self) -> &ApiType {
        &self.output_type
    }

    pub fn args(&self) -> &[ArgDef] {
        &self.args
    }

    pub fn arg(&self, name: &str) -> Option<&ArgDef> {
        self.args.iter().find(|arg| arg.name == name)
    }

    /// Rendered type of an argument, e.g. `MongoID!`
    pub fn arg_type_name(&self, name: &str) -> Option<String> {
        self.arg(name).map(|arg| arg.ty.type_name())
    }

    /// Resolves one call. Each call is independent of every other.
    pub fn resolve(&self, params: ResolveParams) -> BoxFuture<'static, ResolveResult<Resolved>> {
        (self.resolve_fn)(params)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("output_type", &self.output_type)
            .field("args", &self.args)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScalarType;
    use serde_json::json;

    fn echo_resolver() -> Resolver {
        let resolve_fn: ResolveFn =
            Arc::new(|params: ResolveParams| -> BoxFuture<'static, ResolveResult<Resolved>> {
                Box::pin(async move { Ok(Resolved::Record(params.args)) })
            });
        Resolver::new(
            "echo",
            ResolverKind::Query,
            ApiType::Object("Echo".into()),
            vec![ArgDef::new("_id", ApiType::Scalar(ScalarType::Int).non_null())],
            resolve_fn,
        )
    }

    #[test]
    fn test_arg_lookup() {
        let resolver = echo_resolver();
        assert_eq!(resolver.arg_type_name("_id"), Some("Int!".to_string()));
        assert!(resolver.arg("missing").is_none());
        assert_eq!(resolver.kind(), ResolverKind::Query);
    }

    #[tokio::test]
    async fn test_resolve_invokes_function() {
        let resolver = echo_resolver();
        let out = resolver
            .resolve(ResolveParams::new().arg("_id", 7))
            .await
            .unwrap();
        assert_eq!(out.into_value(), json!({"_id": 7}));
    }

    #[test]
    fn test_resolved_values() {
        assert!(Resolved::Null.is_null());
        assert_eq!(Resolved::Null.into_value(), Value::Null);
        assert_eq!(
            Resolved::Override(json!({"overrides": true})).into_value(),
            json!({"overrides": true})
        );
        assert!(Resolved::Override(json!(1)).as_record().is_none());
    }
}
