//! Field specifications
//!
//! A `FieldSpec` is a typed validation rule plus a default value for one
//! named attribute of a record schema.
//!
//! Validation semantics:
//! - `Null` is valid iff the field is not required
//! - Otherwise the value's variant must match the field kind exactly
//! - Kind-specific constraints (length, bounds, timestamp patterns) follow
//!
//! `validate` never fails; it answers yes or no. Turning a `false` into an
//! error is the record's job.

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::NaiveDateTime;

use super::value::Value;

/// Timestamp patterns accepted by every timestamp field, tried in order.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y",
    "%Y/%m/%d",
];

/// Parses `text` with the first pattern that consumes the whole input.
///
/// Components a pattern leaves out take strptime defaults: 1900 for the
/// year, 1 for month and day, 00:00:00 for the time. Date-only patterns
/// therefore resolve to midnight, and `%H:%M` to a time on 1900-01-01.
pub fn parse_timestamp<S: AsRef<str>>(text: &str, formats: &[S]) -> Option<NaiveDateTime> {
    formats.iter().find_map(|pattern| {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, text, StrftimeItems::new(pattern.as_ref())).ok()?;
        resolve(parsed)
    })
}

type Fill = fn(&mut Parsed) -> format::ParseResult<()>;

// Setters fail without effect on an already parsed component, so each
// default only lands where the pattern said nothing.
const DATE_FILLS: [Fill; 3] = [|p| p.set_month(1), |p| p.set_day(1), |p| p.set_year(1900)];
const TIME_FILLS: [Fill; 2] = [|p| p.set_hour(0), |p| p.set_minute(0)];

fn resolve(mut parsed: Parsed) -> Option<NaiveDateTime> {
    // Complete patterns and epoch seconds (%s)
    if let Ok(ts) = parsed.to_naive_datetime_with_offset(0) {
        return Some(ts);
    }

    let date = fill_until(&mut parsed, &DATE_FILLS, Parsed::to_naive_date)?;
    let time = fill_until(&mut parsed, &TIME_FILLS, Parsed::to_naive_time)?;
    Some(date.and_time(time))
}

fn fill_until<T>(
    parsed: &mut Parsed,
    fills: &[Fill],
    resolve: fn(&Parsed) -> format::ParseResult<T>,
) -> Option<T> {
    for fill in fills {
        if let Ok(value) = resolve(parsed) {
            return Some(value);
        }
        let _ = fill(parsed);
    }
    resolve(parsed).ok()
}

/// Kind of a field and its type-specific constraints
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Text with an optional maximum length in characters
    Text { max_length: Option<usize> },
    /// Integer within optional inclusive bounds
    Integer { min: Option<i64>, max: Option<i64> },
    /// Real within optional inclusive bounds
    Real { min: Option<f64>, max: Option<f64> },
    /// Timestamp object, or text matching one of `formats`
    Timestamp { formats: Vec<String> },
}

impl FieldKind {
    /// Returns the declared kind name, e.g. "IntegerField"
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "TextField",
            FieldKind::Integer { .. } => "IntegerField",
            FieldKind::Real { .. } => "RealField",
            FieldKind::Timestamp { .. } => "TimestampField",
        }
    }

    /// Returns the column type used in table projection, e.g. "Integer"
    pub fn sql_type(&self) -> &'static str {
        let name = self.kind_name();
        name.strip_suffix("Field").unwrap_or(name)
    }

    /// Type-specific check for a non-null value
    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::Text { max_length }, Value::Text(s)) => {
                max_length.map_or(true, |max| s.chars().count() <= max)
            }
            (FieldKind::Integer { min, max }, Value::Integer(v)) => {
                min.map_or(true, |lo| *v >= lo) && max.map_or(true, |hi| *v <= hi)
            }
            (FieldKind::Real { min, max }, Value::Real(v)) => {
                v.is_finite()
                    && min.map_or(true, |lo| *v >= lo) && max.map_or(true, |hi| *v <= hi)
            }
            (FieldKind::Timestamp { .. }, Value::Timestamp(_)) => true,
            (FieldKind::Timestamp { formats }, Value::Text(s)) => {
                parse_timestamp(s, formats).is_some()
            }
            _ => false,
        }
    }
}

/// Validation rule and default value for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    kind: FieldKind,
    default: Value,
    required: bool,
}

impl FieldSpec {
    fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            default: Value::Null,
            required: false,
        }
    }

    /// Optional text field without a length limit
    pub fn text() -> Self {
        Self::new(FieldKind::Text { max_length: None })
    }

    /// Optional unbounded integer field
    pub fn integer() -> Self {
        Self::new(FieldKind::Integer { min: None, max: None })
    }

    /// Optional unbounded real field
    pub fn real() -> Self {
        Self::new(FieldKind::Real { min: None, max: None })
    }

    /// Optional timestamp field accepting the default patterns
    pub fn timestamp() -> Self {
        Self::new(FieldKind::Timestamp {
            formats: DEFAULT_TIMESTAMP_FORMATS.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// Marks the field as required: `Null` becomes invalid
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the value used when a record omits this field.
    ///
    /// Defaults are trusted and are not validated.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    /// Maximum length in characters (text fields only)
    pub fn max_length(mut self, max_length: usize) -> Self {
        if let FieldKind::Text { max_length: ref mut slot } = self.kind {
            *slot = Some(max_length);
        }
        self
    }

    /// Inclusive lower bound (integer and real fields only).
    ///
    /// A fractional bound on an integer field is rounded up. Non-numeric
    /// bounds leave the previous bound in place.
    pub fn min(mut self, bound: impl Into<Value>) -> Self {
        let bound = bound.into();
        match self.kind {
            FieldKind::Integer { ref mut min, .. } => {
                *min = integer_bound(&bound, f64::ceil).or(*min)
            }
            FieldKind::Real { ref mut min, .. } => *min = real_bound(&bound).or(*min),
            _ => {}
        }
        self
    }

    /// Inclusive upper bound (integer and real fields only).
    ///
    /// A fractional bound on an integer field is rounded down.
    pub fn max(mut self, bound: impl Into<Value>) -> Self {
        let bound = bound.into();
        match self.kind {
            FieldKind::Integer { ref mut max, .. } => {
                *max = integer_bound(&bound, f64::floor).or(*max)
            }
            FieldKind::Real { ref mut max, .. } => *max = real_bound(&bound).or(*max),
            _ => {}
        }
        self
    }

    /// Appends patterns tried after the built-in ones (timestamp fields only)
    pub fn formats<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let FieldKind::Timestamp { ref mut formats } = self.kind {
            formats.extend(extra.into_iter().map(Into::into));
        }
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns true if `value` may be stored in this field.
    pub fn validate(&self, value: &Value) -> bool {
        if value.is_null() {
            return !self.required;
        }
        self.kind.accepts(value)
    }
}

// Float to int casts saturate at the i64 range.
fn integer_bound(bound: &Value, round: fn(f64) -> f64) -> Option<i64> {
    match bound {
        Value::Integer(v) => Some(*v),
        Value::Real(v) if !v.is_nan() => Some(round(*v) as i64),
        _ => None,
    }
}

// Integer bounds on a real field are widened; bounds above 2^53 lose precision.
fn real_bound(bound: &Value) -> Option<f64> {
    match bound {
        Value::Real(v) if !v.is_nan() => Some(*v),
        Value::Integer(v) => Some(*v as f64),
        _ => None,
    }
}
