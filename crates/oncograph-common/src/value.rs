//! Scalar cell values.
//!
//! A loaded cell is either `Null` (a missing-value marker) or the source
//! text, unchanged. Numbers are only read out of that text when a property
//! is rendered, so identifiers, endpoints and digests always see the text
//! the source file carried (`007` stays `007`, `1.50` stays `1.50`).

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Cell contents treated as "no value".
/// `NONE` (upper case) is deliberately absent: it is the gene sentinel.
pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan",
    "NULL", "null", "None", "#N/A", "<NA>",
];

/// A scalar stored in a table cell or a node/edge property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Read a raw cell: missing-value markers become `Null`, anything else
    /// is kept verbatim as text.
    pub fn parse(raw: &str) -> Self {
        if MISSING_MARKERS.contains(&raw.trim()) {
            return Value::Null;
        }
        Value::Str(raw.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The value read as a number: numbers as they are, text holding an
    /// integer or float literal as that number.
    pub fn to_number(&self) -> Option<Value> {
        match self {
            Value::Int(_) | Value::Float(_) => Some(self.clone()),
            Value::Str(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Some(Value::Int(i));
                }
                if looks_like_float(trimmed) {
                    return trimmed.parse::<f64>().ok().map(Value::Float);
                }
                None
            }
            Value::Null => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.to_number().is_some()
    }

    /// Text form used for identifiers, endpoints and hashing. Source text
    /// is borrowed as is; `Null` is "".
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Str(s) => Cow::Borrowed(s),
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::Float(x) => Cow::Owned(x.to_string()),
        }
    }
}

/// Rust's float parser also accepts words like "inf" or "infinity"; only
/// accept those spellings when they are the whole cell, the way CSV readers
/// usually do, and reject anything containing other letters.
fn looks_like_float(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    let body = lower.trim_start_matches(['+', '-']);
    if body == "inf" || body == "infinity" {
        return true;
    }
    body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | '+' | '-'))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Int(i) => i.hash(state),
            Value::Float(x) => float_bits(*x).hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

// All NaNs compare equal so duplicate rows holding NaN collapse.
fn float_bits(x: f64) -> u64 {
    if x.is_nan() { f64::NAN.to_bits() } else { x.to_bits() }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Str(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Str(s) }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}
