//! Binding driver
//!
//! Resolves variable names and defaults for a declared schema, converts every
//! field eagerly and reports all failures at once.

pub mod binder;
pub mod cache;
pub mod macros;
pub mod naming;
pub mod schema;
pub mod source;

pub use binder::{resolve_raw_value, Binder, BoundConfig, BoundField, EnvConfig, ValueOrigin};
pub use cache::{CacheKey, ConfigCache};
pub use naming::{EnvVarNaming, NamingPolicy};
pub use schema::{ConfigSchema, FieldSpec};
pub use source::{ConfigSource, EnvSource};
