//! Input validation utilities.
//!
//! Field readers over untyped JSON payloads. Each reader names the field it was asked for in the
//! [`ValidationError`] it returns, so a caller can tell the client exactly which field was wrong.
//! Absent and `null` fields are treated the same way.

use crate::{ValidationError, ValidationResult};
use serde_json::{Map, Value};

/// Returns the payload as a JSON object.
///
/// # Errors
///
/// Returns [`ValidationError::NotAnObject`] for arrays, scalars and `null`.
pub fn as_object(payload: &Value) -> ValidationResult<&Map<String, Value>> {
    payload.as_object().ok_or(ValidationError::NotAnObject)
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

/// Reads a required non-negative integer such as an age or a count of days.
///
/// Integral floats (`67.0`) are accepted; fractional values are a type error.
///
/// # Errors
///
/// - [`ValidationError::MissingField`] if the field is absent or `null`
/// - [`ValidationError::Negative`] if the value is below zero
/// - [`ValidationError::InvalidType`] if the value is not an integral number
pub fn required_count(obj: &Map<String, Value>, field: &str) -> ValidationResult<u32> {
    let value = present(obj, field).ok_or_else(|| ValidationError::missing(field))?;
    count_from_value(field, value)
}

/// Reads an optional non-negative integer; absent or `null` yields `None`.
pub fn optional_count(obj: &Map<String, Value>, field: &str) -> ValidationResult<Option<u32>> {
    present(obj, field)
        .map(|value| count_from_value(field, value))
        .transpose()
}

fn count_from_value(field: &str, value: &Value) -> ValidationResult<u32> {
    const EXPECTED: &str = "non-negative integer";

    let Value::Number(number) = value else {
        return Err(ValidationError::invalid_type(field, EXPECTED));
    };

    if let Some(n) = number.as_u64() {
        return u32::try_from(n)
            .map_err(|_| ValidationError::out_of_range(field, format!("{n} is too large")));
    }

    // as_u64 failed, so an i64 here is necessarily negative.
    if number.as_i64().is_some() {
        return Err(ValidationError::negative(field));
    }

    match number.as_f64() {
        Some(f) if f < 0.0 => Err(ValidationError::negative(field)),
        Some(f) if f.fract() == 0.0 && f <= f64::from(u32::MAX) => Ok(f as u32),
        _ => Err(ValidationError::invalid_type(field, EXPECTED)),
    }
}

/// Reads a required string, trimmed. Empty or whitespace-only strings count as missing.
///
/// # Errors
///
/// - [`ValidationError::MissingField`] if the field is absent, `null` or blank
/// - [`ValidationError::InvalidType`] if the value is not a string
pub fn required_text(obj: &Map<String, Value>, field: &str) -> ValidationResult<String> {
    let value = present(obj, field).ok_or_else(|| ValidationError::missing(field))?;
    let text = value
        .as_str()
        .ok_or_else(|| ValidationError::invalid_type(field, "string"))?
        .trim();

    if text.is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(text.to_owned())
}

/// Reads an optional boolean flag, defaulting to `false`.
pub fn optional_flag(obj: &Map<String, Value>, field: &str) -> ValidationResult<bool> {
    match present(obj, field) {
        None => Ok(false),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| ValidationError::invalid_type(field, "boolean")),
    }
}

/// Reads an optional array of strings, preserving order. Absent or `null` yields an empty list.
pub fn optional_text_list(obj: &Map<String, Value>, field: &str) -> ValidationResult<Vec<String>> {
    const EXPECTED: &str = "array of strings";

    let Some(value) = present(obj, field) else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::invalid_type(field, EXPECTED))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| ValidationError::invalid_type(field, EXPECTED))
        })
        .collect()
}

/// Reads a required finite number.
///
/// `field` is the key looked up in `obj`; `label` is the name reported in errors, which lets
/// callers qualify it (for example `metrics[3].fairness_ratio`).
pub fn required_number(
    obj: &Map<String, Value>,
    field: &str,
    label: &str,
) -> ValidationResult<f64> {
    let value = present(obj, field).ok_or_else(|| ValidationError::missing(label))?;
    let number = value
        .as_f64()
        .ok_or_else(|| ValidationError::invalid_type(label, "number"))?;
    ensure_finite(number, label)
}

/// Rejects NaN and infinities.
pub fn ensure_finite(value: f64, label: &str) -> ValidationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::invalid_type(label, "finite number"))
    }
}

/// Checks that a percentage lies in `[0, 100]`.
pub fn ensure_percentage(value: f64, label: &str) -> ValidationResult<f64> {
    let value = ensure_finite(value, label)?;
    if !(0.0..=crate::constants::MAX_PERCENTAGE).contains(&value) {
        return Err(ValidationError::out_of_range(
            label,
            format!("{value} is not a percentage between 0 and 100"),
        ));
    }
    Ok(value)
}
