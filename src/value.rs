//! Wire value model and conversion.
//!
//! [`Value`] is the tagged variant model every record field is expressed in:
//! null, scalar, optional, sequence, or structured record. Conversion to the
//! wire form is a pure recursion over this model ([`wire_value`]) rather than
//! type inspection, so the rules are the same at every nesting depth.
//!
//! Conversion is total: it never fails, for any shape. A shape that has no
//! faithful wire form (a bare record where a scalar belongs) is passed
//! through raw, counted, and logged, so data-quality regressions stay
//! observable without changing ingestion ergonomics.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::schema::{resolve_columns, Introspectable};

/// A wire-representable field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    /// An optional value; converts to [`Value::Null`] when absent.
    Opt(Option<Box<Value>>),
    /// An ordered sequence; an empty sequence stays empty, never null.
    Seq(Vec<Value>),
    /// A nested record as ordered name→value pairs. Only meaningful inside a
    /// [`Value::Seq`] (a nested record-array column).
    Record(Vec<(String, Value)>),
}

impl Value {
    /// Short tag name used in diagnostics and bind errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Float64(_) => "float64",
            Value::Text(_) => "text",
            Value::DateTime(_) => "datetime",
            Value::Opt(_) => "optional",
            Value::Seq(_) => "sequence",
            Value::Record(_) => "record",
        }
    }

    /// Express a nested record array as a sequence of name→value records,
    /// using the nested type's own column resolution.
    pub fn nested<R: Introspectable>(rows: &[R]) -> Value {
        let columns = resolve_columns::<R>();
        Value::Seq(
            rows.iter()
                .map(|row| {
                    Value::Record(
                        columns
                            .iter()
                            .map(|col| (col.name.clone(), row.get(col.field_index)))
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    pub fn try_bool(self) -> Result<bool, BindError> {
        match self {
            Value::Bool(v) => Ok(v),
            other => Err(BindError::mismatch("bool", &other)),
        }
    }

    pub fn try_i64(self) -> Result<i64, BindError> {
        match self {
            Value::Int64(v) => Ok(v),
            Value::UInt64(v) if v <= i64::MAX as u64 => Ok(v as i64),
            other => Err(BindError::mismatch("int64", &other)),
        }
    }

    pub fn try_u64(self) -> Result<u64, BindError> {
        match self {
            Value::UInt64(v) => Ok(v),
            Value::Int64(v) if v >= 0 => Ok(v as u64),
            other => Err(BindError::mismatch("uint64", &other)),
        }
    }

    pub fn try_f64(self) -> Result<f64, BindError> {
        match self {
            Value::Float64(v) => Ok(v),
            Value::Int64(v) => Ok(v as f64),
            Value::UInt64(v) => Ok(v as f64),
            other => Err(BindError::mismatch("float64", &other)),
        }
    }

    pub fn try_text(self) -> Result<String, BindError> {
        match self {
            Value::Text(v) => Ok(v),
            other => Err(BindError::mismatch("text", &other)),
        }
    }

    pub fn try_datetime(self) -> Result<DateTime<Utc>, BindError> {
        match self {
            Value::DateTime(v) => Ok(v),
            other => Err(BindError::mismatch("datetime", &other)),
        }
    }
}

/// A result value could not be bound into a typed record field.
#[derive(Debug, Error)]
#[error("cannot bind {got} value into {expected} field")]
pub struct BindError {
    pub expected: &'static str,
    pub got: &'static str,
}

impl BindError {
    pub fn mismatch(expected: &'static str, got: &Value) -> Self {
        Self {
            expected,
            got: got.kind(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt64(v as u64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float64(v as f64)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(v: Option<T>) -> Self {
        Value::Opt(v.map(|inner| Box::new(inner.into())))
    }
}

impl<T> From<Vec<T>> for Value
where
    Value: From<T>,
{
    fn from(v: Vec<T>) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

static DEGRADED: AtomicU64 = AtomicU64::new(0);

/// Number of values that passed through conversion without a faithful wire
/// form since process start. A growing counter means a record descriptor is
/// producing shapes the store cannot represent.
pub fn degraded_conversions() -> u64 {
    DEGRADED.load(Ordering::Relaxed)
}

/// Convert a value to its wire form.
///
/// Scalars pass through unchanged; absent optionals become null and present
/// ones convert to the referent; sequences convert element-wise, with an
/// empty sequence staying an empty sequence; record fields convert in place.
pub fn wire_value(value: Value) -> Value {
    match value {
        Value::Opt(None) => Value::Null,
        Value::Opt(Some(inner)) => wire_value(*inner),
        Value::Seq(items) => Value::Seq(items.into_iter().map(wire_value).collect()),
        Value::Record(fields) => Value::Record(
            fields
                .into_iter()
                .map(|(name, v)| (name, wire_value(v)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Convert a top-level field value to its wire form.
///
/// Identical to [`wire_value`] except that a bare record at field position
/// (legal only inside a sequence) is flagged as a degraded conversion before
/// being passed through raw.
pub(crate) fn wire_field(value: Value) -> Value {
    let wired = wire_value(value);
    if matches!(wired, Value::Record(_)) {
        DEGRADED.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            kind = wired.kind(),
            "field value has no faithful wire form; passing through raw"
        );
    }
    wired
}
