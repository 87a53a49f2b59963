//! Record instances
//!
//! Every value held by a record satisfies its field spec, except defaults,
//! which are trusted. A rejected write leaves the previous value in place.

use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::errors::{RecordError, RecordResult};
use super::sql;
use crate::schema::{Schema, Value};

/// One row of a schema held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    /// One value per schema field, in declaration order
    values: Vec<Value>,
}

impl Record {
    /// Creates a record from named overrides.
    ///
    /// Overrides are validated like any other write; every field not
    /// supplied is initialized to its default without validation.
    ///
    /// # Errors
    ///
    /// Fails on the first override naming an unknown field or carrying an
    /// invalid value.
    pub fn new<I, K, V>(schema: Arc<Schema>, overrides: I) -> RecordResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut supplied: Vec<Option<Value>> = vec![None; schema.len()];
        for (name, value) in overrides {
            let (idx, value) = checked(&schema, name.as_ref(), value.into())?;
            supplied[idx] = Some(value);
        }

        let values = Self::initialize_defaults(&schema, supplied);
        Ok(Self { schema, values })
    }

    /// Creates a record with every field at its default
    pub fn with_defaults(schema: Arc<Schema>) -> Self {
        let values = Self::initialize_defaults(&schema, vec![None; schema.len()]);
        Self { schema, values }
    }

    /// Trusted path: fills unsupplied fields with their defaults.
    fn initialize_defaults(schema: &Schema, supplied: Vec<Option<Value>>) -> Vec<Value> {
        supplied
            .into_iter()
            .zip(schema.fields())
            .map(|(value, (_, spec))| value.unwrap_or_else(|| spec.default_value().clone()))
            .collect()
    }

    /// Writes one field.
    ///
    /// # Errors
    ///
    /// - `UnknownField` if the schema has no field `name`
    /// - `InvalidValue` if the field's spec rejects `value`
    ///
    /// The record is unchanged on error.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> RecordResult<()> {
        let (idx, value) = checked(&self.schema, name, value.into())?;
        self.values[idx] = value;
        Ok(())
    }

    /// Current value of a field, `None` if the schema has no such field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|idx| &self.values[idx])
    }

    /// Field names and values in declaration order
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema.field_names().zip(self.values.iter())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn table_name(&self) -> &str {
        self.schema.table_name()
    }

    /// `insert into` statement with literal values
    pub fn insert_sql(&self) -> String {
        sql::insert_sql(self)
    }

    /// `insert into` statement with `?` placeholders and bound values
    pub fn insert_statement(&self) -> sql::InsertStatement {
        sql::insert_statement(self)
    }
}

fn checked(schema: &Schema, name: &str, value: Value) -> RecordResult<(usize, Value)> {
    let (idx, spec) = schema.lookup(name).ok_or_else(|| RecordError::UnknownField {
        field: name.to_string(),
    })?;

    if !spec.validate(&value) {
        return Err(RecordError::InvalidValue {
            field: name.to_string(),
            value,
        });
    }

    Ok((idx, value))
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.values().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value.to_sql_literal())?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.values() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
