//! Coercions between `serde_json::Value` and the primitive views the
//! expression language needs (truthiness, numbers, display strings).
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Builds a JSON number, preferring an integer representation for integral values.
/// Non-finite results have no JSON form and become `null`.
pub fn number_value(n: f64) -> Value {
    if !n.is_finite() {
        return Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// JavaScript truthiness: `false`, `0`, `NaN`, `""` and `null` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => to_number(single),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f != 0.0 && (f.abs() >= 1e21 || f.abs() < 1e-6) => exponential(f),
        Some(f) if f.fract() == 0.0 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Exponent notation with an explicit sign on positive exponents: `1e+21`.
fn exponential(f: f64) -> String {
    let formatted = format!("{:e}", f);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// The textual form of a value as it appears in rendered output.
/// `null` renders as the empty string.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `===`: same kind and same value. Numbers compare numerically.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

/// `==`: numbers, numeric strings and booleans are compared as numbers.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::String(_))
        | (Value::String(_), Value::Number(_))
        | (Value::Bool(_), _)
        | (_, Value::Bool(_))
            if !left.is_null() && !right.is_null() =>
        {
            to_number(left) == to_number(right)
        }
        _ => strict_equals(left, right),
    }
}

/// Relational ordering. Two strings compare lexicographically, anything else
/// numerically; `None` when either side is `NaN`.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => to_number(left).partial_cmp(&to_number(right)),
    }
}
