//! piedata - a small declarative data-modeling layer
//!
//! Record types are declared as typed fields with validation rules. Records
//! are validated on every write, project to SQL text, and can be dispatched
//! as commands to a remote store over a persistent connection.

pub mod observability;
pub mod record;
pub mod schema;
pub mod session;

pub use record::{Record, RecordError, RecordResult};
pub use schema::{FieldSpec, Model, Schema, Value};
pub use session::{AsyncSession, RemoteSession, SessionConfig, SessionError, SessionResult};
