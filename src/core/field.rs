//! Typed key/value fields for structured records
//!
//! A [`Field`] is attached to records globally (factory options), per handle
//! (accumulated with `with_field`) or per call. Values form a closed set of
//! kinds; the sink adapter below turns each kind into the JSON value the
//! record encoder writes.

use super::stack::capture_stack;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Value of a structured logging field
#[derive(Clone)]
pub enum FieldValue {
    Binary(Vec<u8>),
    Bool(bool),
    Complex64 { re: f32, im: f32 },
    Complex128 { re: f64, im: f64 },
    Duration(Duration),
    F32(f32),
    F64(f64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Uintptr(usize),
    Str(String),
    Time(DateTime<Utc>),
    /// Rendered with `Display` when the record is written
    Stringer(Arc<dyn fmt::Display + Send + Sync>),
    Error(Arc<dyn StdError + Send + Sync>),
    /// Stack captured at write time; the value is extra frames to skip
    Stack(usize),
    Any(serde_json::Value),
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Binary(b) => f.debug_tuple("Binary").field(b).finish(),
            FieldValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            FieldValue::Complex64 { re, im } => write!(f, "Complex64({}+{}i)", re, im),
            FieldValue::Complex128 { re, im } => write!(f, "Complex128({}+{}i)", re, im),
            FieldValue::Duration(d) => f.debug_tuple("Duration").field(d).finish(),
            FieldValue::F32(v) => f.debug_tuple("F32").field(v).finish(),
            FieldValue::F64(v) => f.debug_tuple("F64").field(v).finish(),
            FieldValue::I8(v) => f.debug_tuple("I8").field(v).finish(),
            FieldValue::I16(v) => f.debug_tuple("I16").field(v).finish(),
            FieldValue::I32(v) => f.debug_tuple("I32").field(v).finish(),
            FieldValue::I64(v) => f.debug_tuple("I64").field(v).finish(),
            FieldValue::U8(v) => f.debug_tuple("U8").field(v).finish(),
            FieldValue::U16(v) => f.debug_tuple("U16").field(v).finish(),
            FieldValue::U32(v) => f.debug_tuple("U32").field(v).finish(),
            FieldValue::U64(v) => f.debug_tuple("U64").field(v).finish(),
            FieldValue::Uintptr(v) => write!(f, "Uintptr({:#x})", v),
            FieldValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            FieldValue::Time(t) => f.debug_tuple("Time").field(t).finish(),
            FieldValue::Stringer(s) => write!(f, "Stringer({})", s),
            FieldValue::Error(e) => write!(f, "Error({})", e),
            FieldValue::Stack(skip) => f.debug_tuple("Stack").field(skip).finish(),
            FieldValue::Any(v) => f.debug_tuple("Any").field(v).finish(),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        use FieldValue::*;
        match (self, other) {
            (Binary(a), Binary(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Complex64 { re: ar, im: ai }, Complex64 { re: br, im: bi }) => ar == br && ai == bi,
            (Complex128 { re: ar, im: ai }, Complex128 { re: br, im: bi }) => {
                ar == br && ai == bi
            }
            (Duration(a), Duration(b)) => a == b,
            (F32(a), F32(b)) => a == b,
            (F64(a), F64(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (U8(a), U8(b)) => a == b,
            (U16(a), U16(b)) => a == b,
            (U32(a), U32(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (Uintptr(a), Uintptr(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Time(a), Time(b)) => a == b,
            // Trait objects compare by identity
            (Stringer(a), Stringer(b)) => Arc::ptr_eq(a, b),
            (Error(a), Error(b)) => Arc::ptr_eq(a, b),
            (Stack(a), Stack(b)) => a == b,
            (Any(a), Any(b)) => a == b,
            _ => false,
        }
    }
}

/// A single typed key/value annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn binary(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(key, FieldValue::Binary(value.into()))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn complex64(key: impl Into<String>, re: f32, im: f32) -> Self {
        Self::new(key, FieldValue::Complex64 { re, im })
    }

    pub fn complex128(key: impl Into<String>, re: f64, im: f64) -> Self {
        Self::new(key, FieldValue::Complex128 { re, im })
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    pub fn float32(key: impl Into<String>, value: f32) -> Self {
        Self::new(key, FieldValue::F32(value))
    }

    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FieldValue::F64(value))
    }

    pub fn int8(key: impl Into<String>, value: i8) -> Self {
        Self::new(key, FieldValue::I8(value))
    }

    pub fn int16(key: impl Into<String>, value: i16) -> Self {
        Self::new(key, FieldValue::I16(value))
    }

    pub fn int32(key: impl Into<String>, value: i32) -> Self {
        Self::new(key, FieldValue::I32(value))
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, FieldValue::I64(value))
    }

    pub fn uint8(key: impl Into<String>, value: u8) -> Self {
        Self::new(key, FieldValue::U8(value))
    }

    pub fn uint16(key: impl Into<String>, value: u16) -> Self {
        Self::new(key, FieldValue::U16(value))
    }

    pub fn uint32(key: impl Into<String>, value: u32) -> Self {
        Self::new(key, FieldValue::U32(value))
    }

    pub fn uint64(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, FieldValue::U64(value))
    }

    pub fn uintptr(key: impl Into<String>, value: usize) -> Self {
        Self::new(key, FieldValue::Uintptr(value))
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::Str(value.into()))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, FieldValue::Time(value))
    }

    pub fn stringer<S>(key: impl Into<String>, value: S) -> Self
    where
        S: fmt::Display + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Stringer(Arc::new(value)))
    }

    pub fn error<E>(key: impl Into<String>, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Error(Arc::new(err)))
    }

    /// Stack trace of the code writing the record, minus `skip` frames
    pub fn stack(key: impl Into<String>, skip: usize) -> Self {
        Self::new(key, FieldValue::Stack(skip))
    }

    pub fn any(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(key, FieldValue::Any(value.into()))
    }

    /// Map this field onto the sink's value representation
    pub fn to_sink_value(&self, time_format: &TimestampFormat) -> serde_json::Value {
        use serde_json::Value;

        match &self.value {
            FieldValue::Binary(bytes) => Value::from(bytes.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Complex64 { re, im } => Value::String(format_complex(*re as f64, *im as f64)),
            FieldValue::Complex128 { re, im } => Value::String(format_complex(*re, *im)),
            FieldValue::Duration(d) => float_value(d.as_nanos() as f64 / 1e6),
            FieldValue::F32(v) => float_value(*v as f64),
            FieldValue::F64(v) => float_value(*v),
            FieldValue::I8(v) => Value::from(*v),
            FieldValue::I16(v) => Value::from(*v),
            FieldValue::I32(v) => Value::from(*v),
            FieldValue::I64(v) => Value::from(*v),
            FieldValue::U8(v) => Value::from(*v),
            FieldValue::U16(v) => Value::from(*v),
            FieldValue::U32(v) => Value::from(*v),
            FieldValue::U64(v) => Value::from(*v),
            FieldValue::Uintptr(v) => Value::String(format!("{:#x}", v)),
            FieldValue::Str(s) => Value::String(s.clone()),
            FieldValue::Time(t) => time_format.to_json_value(t),
            FieldValue::Stringer(s) => Value::String(s.to_string()),
            FieldValue::Error(e) => Value::String(e.to_string()),
            FieldValue::Stack(skip) => Value::String(capture_stack(*skip)),
            FieldValue::Any(v) => v.clone(),
        }
    }
}

fn format_complex(re: f64, im: f64) -> String {
    if im.is_sign_negative() {
        format!("{}{}i", re, im)
    } else {
        format!("{}+{}i", re, im)
    }
}

/// JSON has no NaN or infinities; render them as strings instead of dropping
fn float_value(v: f64) -> serde_json::Value {
    serde_json::Number::from_f64(v)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| serde_json::Value::String(v.to_string()))
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.key, self.value)
    }
}
