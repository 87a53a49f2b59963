//! Record subsystem for piedata
//!
//! Records are runtime instances of a schema. Every write is validated
//! against the field's spec before it is committed; construction-time
//! defaults are the only trusted, unvalidated writes.
//!
//! Records project to SQL text (`create table`, `insert into`) for an
//! external executor. Nothing here executes SQL.

mod errors;
mod record;
mod sql;

pub use errors::{RecordError, RecordResult};
pub use record::Record;
pub use sql::{create_table_sql, insert_sql, insert_statement, InsertStatement};
