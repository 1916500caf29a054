//! SQL value representation
//!
//! `SqlValue` mirrors the five SQLite storage classes and is the unit of
//! exchange between statements, cursors, and model adapters.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{OrmError, OrmResult};

/// Scalar value moving across the statement/cursor boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Check if the value is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Name of the storage class, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Integer(_) => "INTEGER",
            SqlValue::Real(_) => "REAL",
            SqlValue::Text(_) => "TEXT",
            SqlValue::Blob(_) => "BLOB",
        }
    }

    /// Extract as i64, erroring on any other storage class.
    pub fn as_integer(&self) -> OrmResult<i64> {
        match self {
            SqlValue::Integer(i) => Ok(*i),
            other => Err(type_mismatch("INTEGER", other)),
        }
    }

    /// Extract as f64. Integers widen to reals, matching SQLite affinity.
    pub fn as_real(&self) -> OrmResult<f64> {
        match self {
            SqlValue::Real(f) => Ok(*f),
            SqlValue::Integer(i) => Ok(*i as f64),
            other => Err(type_mismatch("REAL", other)),
        }
    }

    /// Extract as text.
    pub fn as_text(&self) -> OrmResult<&str> {
        match self {
            SqlValue::Text(s) => Ok(s),
            other => Err(type_mismatch("TEXT", other)),
        }
    }

    /// Extract as a blob.
    pub fn as_blob(&self) -> OrmResult<&[u8]> {
        match self {
            SqlValue::Blob(b) => Ok(b),
            other => Err(type_mismatch("BLOB", other)),
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> JsonValue {
        match self {
            SqlValue::Null => JsonValue::Null,
            SqlValue::Integer(i) => JsonValue::Number(serde_json::Number::from(*i)),
            SqlValue::Real(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            SqlValue::Text(s) => JsonValue::String(s.clone()),
            SqlValue::Blob(b) => JsonValue::Array(
                b.iter()
                    .map(|&x| JsonValue::Number(serde_json::Number::from(x)))
                    .collect(),
            ),
        }
    }

    /// Create a SqlValue from a JSON scalar
    pub fn from_json(json: &JsonValue) -> OrmResult<Self> {
        match json {
            JsonValue::Null => Ok(SqlValue::Null),
            JsonValue::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(SqlValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(SqlValue::Real(f))
                } else {
                    Err(OrmError::Database(format!("unrepresentable number: {n}")))
                }
            }
            JsonValue::String(s) => Ok(SqlValue::Text(s.clone())),
            other => Err(OrmError::Database(format!(
                "cannot convert JSON {other} to a SQL scalar"
            ))),
        }
    }
}

fn type_mismatch(expected: &str, actual: &SqlValue) -> OrmError {
    OrmError::Database(format!(
        "type mismatch: expected {expected}, got {}",
        actual.type_name()
    ))
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Integer(i64::from(value))
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}
