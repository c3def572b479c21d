//! Per-type structural validators.
//!
//! Each validator takes the normalized value, the token path used in error
//! messages, and an optional [`TokenLookup`]. Without a lookup, alias strings
//! are accepted as-is; with one, they must name an existing token of the
//! expected type.

mod composite;
mod scalar;

use std::collections::HashMap;
use std::hash::BuildHasher;

use serde_json::{Map, Value};

use crate::TokenType;
use crate::alias::parse_alias;
use crate::error::TokenError;

pub use composite::{
    validate_border, validate_gradient, validate_shadow, validate_transition,
    validate_typography,
};
pub use scalar::{
    validate_color, validate_cubic_bezier, validate_dimension, validate_duration,
    validate_font_family, validate_font_weight, validate_number, validate_string,
    validate_stroke_style,
};

/// Type information for alias checks.
pub trait TokenLookup {
    /// Returns the type of the token at `path`, if one exists.
    fn type_of(&self, path: &str) -> Option<TokenType>;
}

impl<S: BuildHasher> TokenLookup for HashMap<String, TokenType, S> {
    fn type_of(&self, path: &str) -> Option<TokenType> {
        self.get(path).copied()
    }
}

/// Validates `value` against the validator for `ty`.
pub fn validate_value(
    ty: TokenType,
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    match ty {
        TokenType::Color => validate_color(value, path, lookup),
        TokenType::Dimension => validate_dimension(value, path, lookup),
        TokenType::Duration => validate_duration(value, path, lookup),
        TokenType::CubicBezier => validate_cubic_bezier(value, path, lookup),
        TokenType::FontFamily => validate_font_family(value, path, lookup),
        TokenType::FontWeight => validate_font_weight(value, path, lookup),
        TokenType::Number => validate_number(value, path, lookup),
        TokenType::String => validate_string(value, path, lookup),
        TokenType::StrokeStyle => validate_stroke_style(value, path, lookup),
        TokenType::Border => validate_border(value, path, lookup),
        TokenType::Shadow => validate_shadow(value, path, lookup),
        TokenType::Gradient => validate_gradient(value, path, lookup),
        TokenType::Transition => validate_transition(value, path, lookup),
        TokenType::Typography => validate_typography(value, path, lookup),
    }
}

/// Checks an alias string.
///
/// Returns `None` when `value` is not an alias, so the caller validates the
/// literal instead.
pub(crate) fn check_alias(
    value: &Value,
    path: &str,
    expected: TokenType,
    lookup: Option<&dyn TokenLookup>,
) -> Option<Result<(), TokenError>> {
    let target = parse_alias(value.as_str()?)?;
    let Some(lookup) = lookup else {
        return Some(Ok(()));
    };
    Some(match lookup.type_of(target) {
        None => Err(TokenError::UnresolvedAlias {
            path: path.to_string(),
            target: target.to_string(),
        }),
        Some(found) if found != expected => Err(TokenError::TypeMismatch {
            path: path.to_string(),
            target: target.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }),
        Some(_) => Ok(()),
    })
}

/// Enforces an exact key set on a structural record.
pub(crate) fn expect_record<'v>(
    value: &'v Value,
    path: &str,
    what: &str,
    required: &[&str],
    optional: &[&str],
) -> Result<&'v Map<String, Value>, TokenError> {
    let Some(obj) = value.as_object() else {
        return Err(TokenError::validation(
            path,
            format!("expected {what} record, found {}", describe(value)),
        ));
    };
    if let Some(missing) = required.iter().find(|key| !obj.contains_key(**key)) {
        return Err(TokenError::validation(
            path,
            format!("{what} is missing required key \"{missing}\""),
        ));
    }
    if let Some(extra) = obj
        .keys()
        .find(|key| !required.contains(&key.as_str()) && !optional.contains(&key.as_str()))
    {
        let mut allowed: Vec<&str> = required.iter().chain(optional).copied().collect();
        allowed.sort_unstable();
        return Err(TokenError::validation(
            path,
            format!(
                "{what} has unexpected key \"{extra}\"; allowed keys are {}",
                allowed.join(", ")
            ),
        ));
    }
    Ok(obj)
}

/// Reads a finite number.
pub(crate) fn finite(value: &Value, path: &str, what: &str) -> Result<f64, TokenError> {
    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(TokenError::validation(
            path,
            format!("{what} must be a finite number, found {}", describe(value)),
        )),
    }
}

/// Path of a field inside a composite value, used in error messages.
pub(crate) fn field_path(path: &str, field: &str) -> String {
    format!("{path}.{field}")
}

/// Returns the elements of a value that may be a single record or a list.
pub(crate) fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{s}\""),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn lookup() -> HashMap<String, TokenType> {
        HashMap::from([
            ("color.brand".to_string(), TokenType::Color),
            ("space.sm".to_string(), TokenType::Dimension),
        ])
    }

    #[test]
    fn test_alias_without_lookup_is_accepted() {
        assert!(validate_value(TokenType::Color, &json!("{nowhere}"), "a", None).is_ok());
    }

    #[test]
    fn test_alias_with_lookup() {
        let map = lookup();
        let lookup = Some(&map as &dyn TokenLookup);
        assert!(validate_value(TokenType::Color, &json!("{color.brand}"), "a", lookup).is_ok());

        let err = validate_value(TokenType::Color, &json!("{color.none}"), "a", lookup).unwrap_err();
        assert!(
            matches!(err, TokenError::UnresolvedAlias { ref target, .. } if target == "color.none")
        );

        let err = validate_value(TokenType::Color, &json!("{space.sm}"), "a", lookup).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Token \"a\" expects a color but \"space.sm\" is a dimension"
        );
    }

    #[rstest]
    #[case(TokenType::Color)]
    #[case(TokenType::Dimension)]
    #[case(TokenType::Duration)]
    #[case(TokenType::CubicBezier)]
    #[case(TokenType::FontWeight)]
    #[case(TokenType::Number)]
    #[case(TokenType::Border)]
    #[case(TokenType::Shadow)]
    #[case(TokenType::Gradient)]
    #[case(TokenType::Transition)]
    #[case(TokenType::Typography)]
    fn test_non_finite_numbers_are_rejected(#[case] ty: TokenType) {
        // serde_json stores NaN and infinities as null.
        for value in [
            json!(f64::NAN),
            json!(f64::INFINITY),
            json!(f64::NEG_INFINITY),
            json!("NaN"),
            json!("Infinity"),
            json!("-Infinity"),
        ] {
            assert!(
                validate_value(ty, &value, "t", None).is_err(),
                "{ty} accepted {value}"
            );
        }
    }

    #[test]
    fn test_non_finite_numbers_in_records_are_rejected() {
        let dim = json!({ "value": f64::INFINITY, "unit": "px" });
        assert!(validate_value(TokenType::Dimension, &dim, "t", None).is_err());
        let bezier = json!([0.2, f64::NAN, 0.4, 1.0]);
        assert!(validate_value(TokenType::CubicBezier, &bezier, "t", None).is_err());
        assert!(finite(&json!(1.5), "t", "x").is_ok());
    }

    #[test]
    fn test_expect_record_messages() {
        let err = expect_record(&json!({ "a": 1, "z": 2 }), "t", "thing", &["a"], &["b"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid token \"t\": thing has unexpected key \"z\"; allowed keys are a, b"
        );
        let err = expect_record(&json!({}), "t", "thing", &["a"], &[]).unwrap_err();
        assert!(err.to_string().contains("missing required key \"a\""));
    }
}
