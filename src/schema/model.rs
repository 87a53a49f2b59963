//! Record type registration
//!
//! A record type is a unit struct implementing `Model`. Its schema is built
//! exactly once, the first time it is asked for, and then shared.
//!
//! ```ignore
//! use piedata::schema::{FieldSpec, Model};
//!
//! piedata::model! {
//!     pub struct Person {
//!         name: FieldSpec::text().max_length(64).required(),
//!         age: FieldSpec::integer().min(0).default(0),
//!     }
//! }
//!
//! assert_eq!(Person::create_table_sql(), "create table Person (name Text, age Integer)");
//! let al = Person::record([("name", "Al")])?;
//! ```

use std::sync::Arc;

use super::types::Schema;
use super::value::Value;
use crate::record::{self, Record, RecordResult};

/// A record type with a schema registered at definition time
pub trait Model {
    /// The shared, immutable schema of this record type
    fn schema() -> Arc<Schema>;

    fn table_name() -> String {
        Self::schema().table_name().to_string()
    }

    /// Creates a record from named overrides; other fields take defaults
    fn record<I, K, V>(overrides: I) -> RecordResult<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Record::new(Self::schema(), overrides)
    }

    /// Creates a record with every field at its default
    fn default_record() -> Record {
        Record::with_defaults(Self::schema())
    }

    /// `create table` statement for this record type
    fn create_table_sql() -> String {
        record::create_table_sql(&Self::schema())
    }
}

/// Declares a record type and registers its schema.
///
/// The struct name becomes the table name; fields keep declaration order.
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($field:ident : $spec:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name;

        impl $crate::schema::Model for $name {
            fn schema() -> ::std::sync::Arc<$crate::schema::Schema> {
                static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<$crate::schema::Schema>> =
                    ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(SCHEMA.get_or_init(|| {
                    ::std::sync::Arc::new(
                        $crate::schema::Schema::builder(stringify!($name))
                            $(.field(stringify!($field), $spec))*
                            .build(),
                    )
                }))
            }
        }
    };
}
