//! Schema subsystem for piedata
//!
//! Record types are declared as an ordered list of named field specs. The
//! resulting `Schema` is built once per record type and never changes.
//!
//! # Design Principles
//!
//! - Declaration order is column order
//! - Field names are unique within a schema
//! - Validation is pure, synchronous and never fails; it answers yes or no
//! - Type checks are exact: no coercion between integers, reals and booleans

mod field;
mod model;
mod types;
mod value;

pub use field::{parse_timestamp, FieldKind, FieldSpec, DEFAULT_TIMESTAMP_FORMATS};
pub use model::Model;
pub use types::{Schema, SchemaBuilder};
pub use value::Value;
