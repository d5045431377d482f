//! SQL value and parameter types.
//!
//! Values are owned; the adapter never holds on to caller buffers. Parameter
//! sets come in the two calling conventions the host ORM uses: positional
//! (an ordered sequence) and named (a mapping).

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// SQL value enum for type-safe parameter handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 16-bit signed integer (smallint).
    I16(i16),
    /// 32-bit signed integer (integer).
    I32(i32),
    /// 64-bit signed integer (bigint).
    I64(i64),
    /// 64-bit floating point (double precision).
    F64(f64),
    /// Text/varchar data.
    Text(String),
    /// Binary data (bytea).
    Bytes(Vec<u8>),
    /// UUID value, sent as its canonical text form.
    Uuid(Uuid),
    /// OBJECT column value.
    Json(serde_json::Value),
    /// ARRAY column value; elements may nest arbitrarily.
    Array(Vec<SqlValue>),
    /// Timestamp with time zone.
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(v) => write!(f, "{v}"),
            SqlValue::I16(v) => write!(f, "{v}"),
            SqlValue::I32(v) => write!(f, "{v}"),
            SqlValue::I64(v) => write!(f, "{v}"),
            SqlValue::F64(v) => write!(f, "{v}"),
            SqlValue::Text(v) => write!(f, "'{v}'"),
            SqlValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            SqlValue::Uuid(v) => write!(f, "'{v}'"),
            SqlValue::Json(v) => write!(f, "{v}"),
            SqlValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            SqlValue::Timestamp(v) => write!(f, "'{}'", v.to_rfc3339()),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::I16(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        SqlValue::Json(v)
    }
}

/// Parameters for a single statement, in one of the host ORM's two calling
/// conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Params {
    /// Ordered parameter values, bound to positional `%s` placeholders.
    Positional(Vec<SqlValue>),
    /// Named parameter values, bound to `%(name)s` placeholders.
    Named(BTreeMap<String, SqlValue>),
}

impl Params {
    /// Build positional parameters from anything convertible to values.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Build named parameters from (name, value) pairs.
    pub fn named<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<SqlValue>,
    {
        Params::Named(
            pairs
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }

    /// Parameter names, present only for the named convention. This is what
    /// decides the placeholder translation mode.
    pub fn names(&self) -> Option<Vec<String>> {
        match self {
            Params::Positional(_) => None,
            Params::Named(map) => Some(map.keys().cloned().collect()),
        }
    }

    /// Number of parameter values in this set.
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(map) => map.len(),
        }
    }

    /// Whether the set carries no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Params::Positional(values) => {
                write!(f, "(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ")")
            }
            Params::Named(map) => {
                write!(f, "{{")?;
                for (i, (name, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
