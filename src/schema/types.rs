//! Schema definitions
//!
//! A schema is the table identifier plus the ordered field map of one record
//! type. It is built once, is immutable afterwards, and is shared (`Arc`) by
//! every record of that type.

use super::field::FieldSpec;
use crate::observability::{log_event_with_fields, Event};

/// Table identifier and ordered field map of one record type
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    table_name: String,
    /// Declaration order; names are unique
    fields: Vec<(String, FieldSpec)>,
}

impl Schema {
    /// Starts declaring a schema for `table_name`
    pub fn builder(table_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            table_name: table_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.position(name).map(|idx| &self.fields[idx].1)
    }

    /// Declaration index of a field
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(field, _)| field == name)
    }

    /// Declaration index and spec of a field
    pub fn lookup(&self, name: &str) -> Option<(usize, &FieldSpec)> {
        self.position(name).map(|idx| (idx, &self.fields[idx].1))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Collects field declarations for one record type
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    table_name: String,
    fields: Vec<(String, FieldSpec)>,
}

impl SchemaBuilder {
    /// Declares a field.
    ///
    /// Re-declaring a name replaces the earlier spec but keeps its position.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = spec,
            None => self.fields.push((name, spec)),
        }
        self
    }

    /// Freezes the declarations into a schema
    pub fn build(self) -> Schema {
        let field_count = self.fields.len().to_string();
        log_event_with_fields(
            Event::SchemaRegistered,
            &[("table", self.table_name.as_str()), ("fields", field_count.as_str())],
        );

        Schema {
            table_name: self.table_name,
            fields: self.fields,
        }
    }
}
