//! SQL projection
//!
//! Statements are produced as plain text for an external SQL executor:
//!
//! - `create table <table> (<col> <Type>, ...)`
//! - `insert into <table> (<cols>) values (<vals>)`
//!
//! Literal inserts double embedded single quotes. `insert_statement` returns
//! placeholders and bound values for executors that support parameters.

use super::record::Record;
use crate::schema::{Schema, Value};

/// Parameterized insert
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Statement text with one `?` per column
    pub sql: String,
    /// Values in column order
    pub params: Vec<Value>,
}

/// `create table` statement for a schema
pub fn create_table_sql(schema: &Schema) -> String {
    let columns: Vec<String> = schema
        .fields()
        .map(|(name, spec)| format!("{} {}", name, spec.kind().sql_type()))
        .collect();

    format!("create table {} ({})", schema.table_name(), columns.join(", "))
}

/// `insert into` statement with the record's values inlined as literals
pub fn insert_sql(record: &Record) -> String {
    let (columns, literals): (Vec<&str>, Vec<String>) = record
        .values()
        .map(|(name, value)| (name, value.to_sql_literal()))
        .unzip();

    format!(
        "insert into {} ({}) values ({})",
        record.table_name(),
        columns.join(", "),
        literals.join(", ")
    )
}

/// `insert into` statement with `?` placeholders
pub fn insert_statement(record: &Record) -> InsertStatement {
    let (columns, params): (Vec<&str>, Vec<Value>) = record
        .values()
        .map(|(name, value)| (name, value.clone()))
        .unzip();
    let placeholders = vec!["?"; columns.len()];

    InsertStatement {
        sql: format!(
            "insert into {} ({}) values ({})",
            record.table_name(),
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use std::sync::Arc;

    fn person() -> Arc<Schema> {
        Arc::new(
            Schema::builder("Person")
                .field("name", FieldSpec::text())
                .field("age", FieldSpec::integer())
                .build(),
        )
    }

    #[test]
    fn test_create_table() {
        assert_eq!(
            create_table_sql(&person()),
            "create table Person (name Text, age Integer)"
        );
    }

    #[test]
    fn test_create_table_without_fields() {
        let schema = Schema::builder("Empty").build();
        assert_eq!(create_table_sql(&schema), "create table Empty ()");
    }

    #[test]
    fn test_insert_literals() {
        let record = Record::new(person(), [("name", Value::from("Al")), ("age", Value::from(30))])
            .unwrap();
        assert_eq!(
            insert_sql(&record),
            "insert into Person (name, age) values ('Al', 30)"
        );
    }

    #[test]
    fn test_insert_escapes_quotes() {
        let record = Record::new(person(), [("name", "x'); drop table Person; --")]).unwrap();
        assert_eq!(
            insert_sql(&record),
            "insert into Person (name, age) values ('x''); drop table Person; --', NULL)"
        );
    }

    #[test]
    fn test_insert_statement_binds_values() {
        let record = Record::new(person(), [("name", Value::from("O'Hara")), ("age", Value::from(41))])
            .unwrap();
        let statement = insert_statement(&record);
        assert_eq!(statement.sql, "insert into Person (name, age) values (?, ?)");
        assert_eq!(statement.params, vec![Value::from("O'Hara"), Value::Integer(41)]);
    }

    #[test]
    fn test_reals_and_timestamps() {
        let schema = Arc::new(
            Schema::builder("Reading")
                .field("value", FieldSpec::real())
                .field("taken", FieldSpec::timestamp())
                .build(),
        );
        let record = Record::new(
            schema,
            [("value", Value::Real(2.5)), ("taken", Value::from("2024-01-02 03:04:05"))],
        )
        .unwrap();
        assert_eq!(
            insert_sql(&record),
            "insert into Reading (value, taken) values (2.5, '2024-01-02 03:04:05')"
        );
    }
}
