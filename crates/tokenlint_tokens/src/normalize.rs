//! Shorthand-to-canonical value normalization.
//!
//! Runs before validation. Anything it does not recognize is returned
//! unchanged so the validator can report it.

use serde_json::{Map, Value, json};

use crate::TokenType;
use crate::alias::is_alias;
use crate::color::parse_css_color;

/// Normalizes a token value of type `ty`.
pub fn normalize_value(value: &Value, ty: TokenType) -> Value {
    if value.as_str().is_some_and(is_alias) {
        return value.clone();
    }
    match ty {
        TokenType::Color => normalize_color(value),
        TokenType::Dimension => normalize_unit_value(value, "px"),
        TokenType::Duration => normalize_unit_value(value, "ms"),
        TokenType::FontFamily => match value {
            Value::String(s) => json!([s]),
            other => other.clone(),
        },
        TokenType::FontWeight => match value {
            Value::String(s) => s
                .trim()
                .parse::<u64>()
                .map(|n| json!(n))
                .unwrap_or_else(|_| value.clone()),
            other => other.clone(),
        },
        TokenType::Border => map_fields(
            value,
            &[
                ("color", TokenType::Color),
                ("width", TokenType::Dimension),
            ],
        ),
        TokenType::Shadow => map_records(
            value,
            &[
                ("color", TokenType::Color),
                ("offsetX", TokenType::Dimension),
                ("offsetY", TokenType::Dimension),
                ("blur", TokenType::Dimension),
                ("spread", TokenType::Dimension),
            ],
        ),
        TokenType::Gradient => map_records(value, &[("color", TokenType::Color)]),
        TokenType::Transition => map_fields(
            value,
            &[
                ("duration", TokenType::Duration),
                ("delay", TokenType::Duration),
            ],
        ),
        TokenType::Typography => map_fields(
            value,
            &[
                ("fontFamily", TokenType::FontFamily),
                ("fontSize", TokenType::Dimension),
                ("fontWeight", TokenType::FontWeight),
                ("letterSpacing", TokenType::Dimension),
            ],
        ),
        TokenType::CubicBezier | TokenType::Number | TokenType::String | TokenType::StrokeStyle => {
            value.clone()
        }
    }
}

fn normalize_color(value: &Value) -> Value {
    match value {
        Value::String(s) => parse_css_color(s)
            .map(|c| c.to_value())
            .unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

fn normalize_unit_value(value: &Value, default_unit: &str) -> Value {
    match value {
        Value::Number(n) => json!({ "value": n, "unit": default_unit }),
        Value::String(s) => split_unit(s)
            .map(|(number, unit)| {
                let unit = if unit.is_empty() { default_unit } else { unit };
                json!({ "value": number, "unit": unit })
            })
            .unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

/// Splits `"1.5rem"` into `(1.5, "rem")`. The unit may be empty.
pub fn split_unit(raw: &str) -> Option<(f64, &str)> {
    let raw = raw.trim();
    let idx = raw
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(idx);
    if number.is_empty() {
        return None;
    }
    let number: f64 = number.parse().ok()?;
    number.is_finite().then_some((number, unit))
}

fn map_fields(value: &Value, fields: &[(&str, TokenType)]) -> Value {
    let Some(obj) = value.as_object() else {
        return value.clone();
    };
    let mut out = Map::with_capacity(obj.len());
    for (key, field) in obj {
        let normalized = match fields.iter().find(|(name, _)| name == key) {
            Some((_, ty)) => normalize_value(field, *ty),
            None => field.clone(),
        };
        out.insert(key.clone(), normalized);
    }
    Value::Object(out)
}

/// Applies [`map_fields`] to each record, wrapping a lone record in an array.
fn map_records(value: &Value, fields: &[(&str, TokenType)]) -> Value {
    match value {
        Value::Object(_) => Value::Array(vec![map_fields(value, fields)]),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| map_fields(item, fields))
                .collect(),
        ),
        other => other.clone(),
    }
}
