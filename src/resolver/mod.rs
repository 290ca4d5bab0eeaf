//! Generated operations
//!
//! An operation is built once per record type from a store adapter and the
//! type's descriptor, then resolved any number of times. Calls share nothing
//! but the adapter's read-only alias map.

mod config;
mod descriptor;
mod errors;
mod find_by_id_lean;
mod params;

pub use config::ResolverConfig;
pub use descriptor::{ArgDef, ResolveFn, Resolved, Resolver, ResolverKind};
pub use errors::{ResolveResult, ResolverError};
pub use find_by_id_lean::{find_by_id_lean, find_by_id_lean_with};
pub use params::{BeforeQuery, ExtendedResolveParams, QueryOverride, ResolveParams};
