//! Field alias handling
//!
//! Records are stored under short internal keys (`n`) and exposed under
//! public names (`name`). The map is declarative data; translation is a pure
//! function over plain records.

mod map;
mod translate;

pub use map::{AliasMap, AliasRule};
pub use translate::{translate_aliases, untranslate_aliases};
