//! Schema and Record Invariant Tests
//!
//! - `Null` validates iff the field is optional
//! - Length and bound checks are inclusive
//! - Registration is stable and preserves declaration order
//! - Rejected writes never change a record

use std::sync::Arc;

use chrono::NaiveDate;
use piedata::schema::{FieldKind, FieldSpec, Model, Schema, Value};
use piedata::{Record, RecordError};

// =============================================================================
// Helper Functions
// =============================================================================

piedata::model! {
    /// Two integer fields with distinct defaults
    pub struct Pair {
        a: FieldSpec::integer().default(0),
        b: FieldSpec::integer().default(1),
    }
}

piedata::model! {
    pub struct Event {
        title: FieldSpec::text().max_length(20).required().default("untitled"),
        attendees: FieldSpec::integer().min(0).max(500),
        rating: FieldSpec::real().min(0.0).max(5.0),
        starts_at: FieldSpec::timestamp().formats(["%H:%M %d/%m/%Y"]),
    }
}

fn all_kinds() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text().max_length(4),
        FieldSpec::integer().min(-3).max(3),
        FieldSpec::real().min(-1.0).max(1.0),
        FieldSpec::timestamp(),
    ]
}

// =============================================================================
// Field Validation
// =============================================================================

/// Null validates iff the field is not required, for every kind.
#[test]
fn test_null_iff_optional() {
    for spec in all_kinds() {
        assert!(spec.validate(&Value::Null));
        assert!(!spec.clone().required().validate(&Value::Null));
    }
}

/// Text length check is inclusive at the limit.
#[test]
fn test_text_length_boundary() {
    let spec = FieldSpec::text().max_length(5);
    for len in 0..=8 {
        let s = "x".repeat(len);
        assert_eq!(spec.validate(&Value::from(s)), len <= 5, "len {}", len);
    }
}

/// Integer bounds behave as a closed interval; unset bounds are infinite.
#[test]
fn test_integer_interval() {
    let spec = FieldSpec::integer().min(-2).max(2);
    for v in -5..=5 {
        assert_eq!(spec.validate(&Value::Integer(v)), (-2..=2).contains(&v));
    }

    let unbounded = FieldSpec::integer();
    assert!(unbounded.validate(&Value::Integer(i64::MIN)));
    assert!(unbounded.validate(&Value::Integer(i64::MAX)));
}

/// Booleans are not integers.
#[test]
fn test_booleans_rejected_by_numeric_fields() {
    assert!(!FieldSpec::integer().validate(&Value::Bool(true)));
    assert!(!FieldSpec::integer().validate(&Value::Bool(false)));
    assert!(!FieldSpec::real().validate(&Value::Bool(true)));
}

/// Timestamp fields accept timestamp objects and matching text only.
#[test]
fn test_timestamp_acceptance() {
    let spec = FieldSpec::timestamp();
    let ts = NaiveDate::from_ymd_opt(2023, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 59)
        .unwrap();

    assert!(spec.validate(&Value::Timestamp(ts)));
    assert!(spec.validate(&Value::from("2023-12-31 23:59:59")));
    assert!(spec.validate(&Value::from("2023-12-31T23:59")));
    assert!(spec.validate(&Value::from("2023/12/31")));
    assert!(!spec.validate(&Value::from("31/12/2023")));
    assert!(!spec.validate(&Value::from("2023-13-01")));
    assert!(!spec.validate(&Value::Real(1.0)));
    assert!(!spec.validate(&Value::Bool(true)));
}

// =============================================================================
// Schema Registration
// =============================================================================

/// Declaring the same schema twice yields identical field maps.
#[test]
fn test_registration_is_stable() {
    let declare = || {
        Schema::builder("Person")
            .field("name", FieldSpec::text())
            .field("age", FieldSpec::integer().min(0))
            .build()
    };
    assert_eq!(declare(), declare());
}

/// A model's schema is built once and shared by every record.
#[test]
fn test_model_schema_shared() {
    let first = Pair::record([("a", 1)]).unwrap();
    let second = Pair::default_record();
    assert!(Arc::ptr_eq(first.schema(), second.schema()));
    assert_eq!(Pair::table_name(), "Pair");
}

/// Field kinds and order come straight from the declaration.
#[test]
fn test_model_field_order_and_kinds() {
    let schema = Event::schema();
    let kinds: Vec<_> = schema.fields().map(|(n, s)| (n, s.kind().kind_name())).collect();
    assert_eq!(
        kinds,
        vec![
            ("title", "TextField"),
            ("attendees", "IntegerField"),
            ("rating", "RealField"),
            ("starts_at", "TimestampField"),
        ]
    );
    assert_eq!(
        schema.field("title").unwrap().kind(),
        &FieldKind::Text { max_length: Some(20) }
    );
}

// =============================================================================
// Record Construction and Writes
// =============================================================================

/// Overrides win, everything else takes its default.
#[test]
fn test_construction_with_override() {
    let record = Pair::record([("a", 5)]).unwrap();
    assert_eq!(record.get("a"), Some(&Value::Integer(5)));
    assert_eq!(record.get("b"), Some(&Value::Integer(1)));
}

/// A rejected write leaves the old value in place.
#[test]
fn test_invalid_write_is_atomic() {
    let mut record = Event::record([("attendees", 10)]).unwrap();

    for bad in [Value::Integer(-1), Value::Integer(501), Value::Real(10.0), Value::from("10")] {
        let err = record.set("attendees", bad.clone()).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidValue {
                field: "attendees".into(),
                value: bad,
            }
        );
        assert_eq!(record.get("attendees"), Some(&Value::Integer(10)));
    }
}

/// Writing an undeclared name fails and adds nothing.
#[test]
fn test_unknown_field_write() {
    let mut record = Event::default_record();
    let before: Vec<String> = record.values().map(|(n, _)| n.to_string()).collect();

    let err = record.set("location", "Hall A").unwrap_err();
    assert_eq!(err.to_string(), "Unknown field \"location\"");

    let after: Vec<String> = record.values().map(|(n, _)| n.to_string()).collect();
    assert_eq!(before, after);
}

/// Custom timestamp patterns are honored on writes.
#[test]
fn test_custom_timestamp_format_write() {
    let mut record = Event::default_record();
    record.set("starts_at", "18:30 01/06/2024").unwrap();
    assert!(record.set("starts_at", "half past six").is_err());
    assert_eq!(record.get("starts_at"), Some(&Value::from("18:30 01/06/2024")));
}

/// Required fields reject Null even after construction.
#[test]
fn test_required_rejects_null() {
    let mut record = Event::default_record();
    assert_eq!(record.get("title"), Some(&Value::from("untitled")));
    assert!(record.set("title", Value::Null).is_err());
    assert!(Record::new(Event::schema(), [("title", Value::Null)]).is_err());
}
