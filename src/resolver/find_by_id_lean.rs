//! `findByIdLean` operation
//!
//! Looks up one record by `_id` and returns it as plain data under public
//! field names, never as a store-bound document.
//!
//! # Resolve Flow
//!
//! 1. Read `_id` from the arguments; no identifier resolves to null
//! 2. Build a lean lazy lookup through the store adapter
//! 3. Apply the requested projection
//! 4. Run the `before_query` hook, which may substitute the result
//! 5. Execute the lookup
//! 6. Translate storage keys to public names

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::config::ResolverConfig;
use super::descriptor::{ArgDef, ResolveFn, Resolved, Resolver, ResolverKind};
use super::errors::{ResolveResult, ResolverError};
use super::params::{ExtendedResolveParams, QueryOverride, ResolveParams};
use crate::alias::translate_aliases;
use crate::observability::Event;
use crate::schema::{ApiType, ObjectType, SchemaResult, TypeRegistry, ID_FIELD};
use crate::store::StoreAdapter;
use crate::Record;

/// Builds the `findByIdLean` operation for one record type.
///
/// Fails when the registry cannot derive the identifier type, e.g. the type
/// declares no `_id` field.
pub fn find_by_id_lean(
    adapter: Arc<dyn StoreAdapter>,
    type_descriptor: Arc<ObjectType>,
    registry: &dyn TypeRegistry,
) -> SchemaResult<Resolver> {
    find_by_id_lean_with(adapter, type_descriptor, registry, &ResolverConfig::default())
}

/// [`find_by_id_lean`] with explicit naming
pub fn find_by_id_lean_with(
    adapter: Arc<dyn StoreAdapter>,
    type_descriptor: Arc<ObjectType>,
    registry: &dyn TypeRegistry,
    config: &ResolverConfig,
) -> SchemaResult<Resolver> {
    let id_type = registry.derive_identifier_type(&type_descriptor)?.non_null();
    let output_type = ApiType::Object(type_descriptor.name().to_string());

    info!(
        event = %Event::OperationBuilt,
        operation = %config.name,
        model = %adapter.model_name(),
        id_type = %id_type,
        "operation built"
    );

    let resolve_fn: ResolveFn = Arc::new(
        move |params: ResolveParams| -> BoxFuture<'static, ResolveResult<Resolved>> {
            let adapter = Arc::clone(&adapter);
            let type_descriptor = Arc::clone(&type_descriptor);
            Box::pin(resolve(adapter, type_descriptor, params))
        },
    );

    Ok(Resolver::new(
        config.name.clone(),
        ResolverKind::Query,
        output_type,
        vec![ArgDef::new(ID_FIELD, id_type)],
        resolve_fn,
    )
    .with_description(config.description.clone()))
}

/// Identifier supplied in `args`, if any.
///
/// Absent, null, `""`, `false` and numeric zero all mean "no identifier".
fn supplied_identifier(args: &Record) -> Option<&Value> {
    match args.get(ID_FIELD)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        id => Some(id),
    }
}

async fn resolve(
    adapter: Arc<dyn StoreAdapter>,
    type_descriptor: Arc<ObjectType>,
    params: ResolveParams,
) -> ResolveResult<Resolved> {
    let rp = ExtendedResolveParams::new(params, adapter, type_descriptor);

    let id = match supplied_identifier(&rp.args) {
        Some(id) => id.clone(),
        None => {
            debug!(
                event = %Event::ResolveSkipped,
                model = %rp.adapter.model_name(),
                request_id = %rp.request_id,
                "no identifier supplied"
            );
            return Ok(Resolved::Null);
        }
    };

    debug!(
        event = %Event::ResolveBegin,
        model = %rp.adapter.model_name(),
        request_id = %rp.request_id,
        id = %id,
        "resolving"
    );

    let mut query = rp.adapter.find_by_id_lean(id);

    if let Some(fields) = &rp.projection {
        let aliases = rp.adapter.aliases();
        query.select(fields.iter().map(|field| aliases.to_storage_path(field)));
    }

    if let Some(hook) = rp.before_query.clone() {
        if let QueryOverride::Substitute(substitute) = hook(&mut query, &rp) {
            let value = substitute.await.map_err(|e| failed(&rp, e))?;
            debug!(
                event = %Event::QueryOverridden,
                model = %rp.adapter.model_name(),
                request_id = %rp.request_id,
                "result substituted by beforeQuery"
            );
            return Ok(Resolved::Override(value));
        }
    }

    let output = query
        .exec()
        .await
        .map_err(|e| failed(&rp, ResolverError::from(e)))?;

    match output {
        None => {
            debug!(
                event = %Event::RecordNotFound,
                model = %rp.adapter.model_name(),
                request_id = %rp.request_id,
                "no record for identifier"
            );
            Ok(Resolved::Null)
        }
        Some(output) => {
            let record = translate_aliases(&output.into_lean(), rp.adapter.aliases());
            debug!(
                event = %Event::ResolveComplete,
                model = %rp.adapter.model_name(),
                request_id = %rp.request_id,
                "record resolved"
            );
            Ok(Resolved::Record(record))
        }
    }
}

fn failed(rp: &ExtendedResolveParams, err: ResolverError) -> ResolverError {
    warn!(
        event = %Event::ResolveFailed,
        model = %rp.adapter.model_name(),
        request_id = %rp.request_id,
        error = %err,
        "resolve failed"
    );
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, Schema, SchemaRegistry};
    use crate::store::{Collection, MemoryStore};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        store: Arc<MemoryStore>,
        resolver: Resolver,
    }

    async fn post_fixture() -> Fixture {
        let mut fields = HashMap::new();
        fields.insert("_id".into(), FieldDef::required_int());
        fields.insert("ttl".into(), FieldDef::optional_string().with_alias("title"));
        let schema = Schema::new("posts", "v1", fields);

        let store = Arc::new(MemoryStore::new());
        let posts = Collection::new("Post", schema.clone(), store.clone()).unwrap();
        posts.create(json!({"_id": 1, "title": "Post 1"})).await.unwrap();

        let registry = SchemaRegistry::new();
        let post_type = registry.register_schema("Post", &schema).unwrap();
        let resolver = find_by_id_lean(Arc::new(posts), post_type, &registry).unwrap();

        Fixture { store, resolver }
    }

    #[test]
    fn test_supplied_identifier() {
        let args = |v: Value| match v {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        assert!(supplied_identifier(&args(json!({}))).is_none());
        assert!(supplied_identifier(&args(json!({"_id": null}))).is_none());
        assert!(supplied_identifier(&args(json!({"_id": ""}))).is_none());
        assert!(supplied_identifier(&args(json!({"_id": false}))).is_none());
        assert!(supplied_identifier(&args(json!({"_id": 0}))).is_none());
        assert!(supplied_identifier(&args(json!({"_id": 0.0}))).is_none());
        assert_eq!(supplied_identifier(&args(json!({"_id": 7}))), Some(&json!(7)));
        assert_eq!(supplied_identifier(&args(json!({"_id": "a"}))), Some(&json!("a")));
    }

    #[tokio::test]
    async fn test_argument_definition() {
        let fx = post_fixture().await;
        assert_eq!(fx.resolver.name(), "findByIdLean");
        assert_eq!(fx.resolver.args().len(), 1);
        assert_eq!(fx.resolver.arg_type_name("_id"), Some("Int!".to_string()));
        assert_eq!(fx.resolver.output_type(), &ApiType::Object("Post".into()));
    }

    #[tokio::test]
    async fn test_found_record_is_translated() {
        let fx = post_fixture().await;
        let out = fx
            .resolver
            .resolve(ResolveParams::new().arg("_id", 1))
            .await
            .unwrap();

        assert_eq!(out.into_value(), json!({"_id": 1, "title": "Post 1", "__v": 0}));
        assert_eq!(fx.store.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_identifier_skips_store_and_hook() {
        let fx = post_fixture().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let hook_calls = Arc::clone(&calls);

        let out = fx
            .resolver
            .resolve(ResolveParams::new().before_query(move |_, _| {
                hook_calls.fetch_add(1, Ordering::SeqCst);
                QueryOverride::Proceed
            }))
            .await
            .unwrap();

        assert!(out.is_null());
        assert_eq!(fx.store.lookup_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_substitute_skips_execution() {
        let fx = post_fixture().await;
        let out = fx
            .resolver
            .resolve(
                ResolveParams::new()
                    .arg("_id", 1)
                    .before_query(|_, _| QueryOverride::value(json!({"overrides": true}))),
            )
            .await
            .unwrap();

        assert_eq!(out, Resolved::Override(json!({"overrides": true})));
        assert_eq!(fx.store.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_projection_uses_public_names() {
        let fx = post_fixture().await;
        let out = fx
            .resolver
            .resolve(ResolveParams::new().arg("_id", 1).project(["title"]))
            .await
            .unwrap();

        assert_eq!(out.into_value(), json!({"_id": 1, "title": "Post 1"}));
    }

    #[tokio::test]
    async fn test_hook_failure_propagates() {
        let fx = post_fixture().await;
        let err = fx
            .resolver
            .resolve(
                ResolveParams::new()
                    .arg("_id", 1)
                    .before_query(|_, _| {
                        QueryOverride::future(async { Err::<Value, _>(ResolverError::hook("denied")) })
                    }),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ResolverError::Hook(_)));
    }
}
