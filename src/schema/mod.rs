//! Record schemas and the API types derived from them
//!
//! # Design Principles
//!
//! - Every record schema declares a required, unaliased `_id` field
//! - Fields are keyed by storage key; `alias` names the public field
//! - API types are derived once, at assembly time, never by reflection
//!   over live store objects

mod api_type;
mod errors;
mod loader;
mod object_type;
mod registry;
mod types;

pub use api_type::{ApiType, ScalarType};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::SchemaLoader;
pub use object_type::ObjectType;
pub use registry::{SchemaRegistry, TypeRegistry};
pub use types::{FieldDef, FieldType, Schema, ID_FIELD};
