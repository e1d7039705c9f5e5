//! Numeric coercion for draft inputs.
//!
//! Form values arrive as text or numbers. Integer columns keep the longest
//! leading decimal integer (`"5"`, `" 12th"` → 5, 12); float columns keep the
//! longest leading decimal literal (`"9.5/10"` → 9.5). Integers beyond the
//! `i64` range saturate at `i64::MIN` / `i64::MAX`. Input with no numeric
//! prefix coerces to JSON `null`; the backend is expected to reject it.

use crate::model::entity::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericField {
    pub name: &'static str,
    pub kind: NumericKind,
}

impl NumericField {
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: NumericKind::Integer,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: NumericKind::Float,
        }
    }
}

/// Caller-supplied value for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Default for NumberInput {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<i64> for NumberInput {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for NumberInput {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for NumberInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NumberInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Rewrites every numeric column of `record` in place.
///
/// Missing columns are inserted as `null` so the backend sees the same shape
/// for every write.
pub fn coerce_numeric_fields(record: &mut Record, fields: &[NumericField]) {
    for field in fields {
        let coerced = record
            .get(field.name)
            .map_or(Value::Null, |value| coerce_value(value, field.kind));
        record.insert(field.name.to_string(), coerced);
    }
}

pub fn coerce_value(value: &Value, kind: NumericKind) -> Value {
    match kind {
        NumericKind::Integer => to_integer(value).map_or(Value::Null, Value::from),
        NumericKind::Float => to_float(value)
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
    }
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(text) => parse_int_prefix(text),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_float_prefix(text),
        _ => None,
    }
}

/// Parses the longest leading decimal integer, skipping leading whitespace.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = split_sign(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let digits = &digits[..end];
    // An all-digit literal only fails to parse on overflow.
    let (parsed, bound) = if negative {
        (format!("-{digits}").parse::<i64>(), i64::MIN)
    } else {
        (digits.parse::<i64>(), i64::MAX)
    };
    Some(parsed.unwrap_or(bound))
}

/// Parses the longest leading decimal float literal, skipping leading
/// whitespace.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let (negative, rest) = split_sign(trimmed);
    let bytes = rest.as_bytes();

    let mut end = 0;
    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let magnitude: f64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_prefix_follows_form_input_rules() {
        assert_eq!(parse_int_prefix("5"), Some(5));
        assert_eq!(parse_int_prefix("  12th grade"), Some(12));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("4.9"), Some(4));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn integer_prefix_saturates_outside_i64() {
        assert_eq!(parse_int_prefix("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_int_prefix("-99999999999999999999 pts"), Some(i64::MIN));
        assert_eq!(parse_int_prefix("-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn float_prefix_follows_form_input_rules() {
        assert_eq!(parse_float_prefix("9.5/10"), Some(9.5));
        assert_eq!(parse_float_prefix(" .25"), Some(0.25));
        assert_eq!(parse_float_prefix("1e3 points"), Some(1000.0));
        assert_eq!(parse_float_prefix("7e"), Some(7.0));
        assert_eq!(parse_float_prefix("-2."), Some(-2.0));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("n/a"), None);
    }

    #[test]
    fn coerce_value_handles_numbers_and_rejects_other_shapes() {
        assert_eq!(coerce_value(&json!(4.7), NumericKind::Integer), json!(4));
        assert_eq!(coerce_value(&json!(1e20), NumericKind::Integer), json!(i64::MAX));
        assert_eq!(coerce_value(&json!("88.5"), NumericKind::Float), json!(88.5));
        assert_eq!(coerce_value(&json!(true), NumericKind::Integer), Value::Null);
        assert_eq!(coerce_value(&Value::Null, NumericKind::Float), Value::Null);
    }

    #[test]
    fn coerce_numeric_fields_fills_missing_columns_with_null() {
        let mut record = json!({ "gradeLevel": "5", "section": "B" })
            .as_object()
            .cloned()
            .unwrap();
        coerce_numeric_fields(
            &mut record,
            &[NumericField::integer("gradeLevel"), NumericField::integer("capacity")],
        );

        assert_eq!(record["gradeLevel"], json!(5));
        assert_eq!(record["capacity"], Value::Null);
        assert_eq!(record["section"], json!("B"));
    }
}
