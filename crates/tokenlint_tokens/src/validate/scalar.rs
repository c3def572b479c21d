use serde_json::Value;

use super::{TokenLookup, check_alias, describe, expect_record, finite};
use crate::TokenType;
use crate::color::ColorSpace;
use crate::error::TokenError;

const DIMENSION_UNITS: &[&str] = &[
    "px", "rem", "em", "%", "vh", "vw", "vmin", "vmax", "ch", "ex", "pt",
];
const DURATION_UNITS: &[&str] = &["ms", "s"];
const STROKE_KEYWORDS: &[&str] = &[
    "solid", "dashed", "dotted", "double", "groove", "ridge", "outset", "inset",
];
const LINE_CAPS: &[&str] = &["round", "butt", "square"];
const FONT_WEIGHT_KEYWORDS: &[&str] = &[
    "thin",
    "hairline",
    "extra-light",
    "ultra-light",
    "light",
    "normal",
    "regular",
    "book",
    "medium",
    "semi-bold",
    "demi-bold",
    "bold",
    "extra-bold",
    "ultra-bold",
    "black",
    "heavy",
    "extra-black",
    "ultra-black",
];

/// Validates a color record.
pub fn validate_color(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::Color, lookup) {
        return res;
    }
    if let Value::String(s) = value {
        return Err(TokenError::validation(
            path,
            format!("\"{s}\" is not a recognized color"),
        ));
    }
    let obj = expect_record(value, path, "color", &["colorSpace", "components"], &["alpha", "hex"])?;

    let space: ColorSpace = obj["colorSpace"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            TokenError::validation(
                path,
                format!("unknown colorSpace {}", describe(&obj["colorSpace"])),
            )
        })?;

    let components = obj["components"]
        .as_array()
        .filter(|c| c.len() == 3)
        .ok_or_else(|| TokenError::validation(path, "components must be an array of 3 numbers"))?;
    for (idx, component) in components.iter().enumerate() {
        if component.as_str() == Some("none") {
            continue;
        }
        let n = finite(component, path, "color component")?;
        let (lo, hi) = component_range(space, idx);
        if n < lo || n > hi {
            return Err(TokenError::validation(
                path,
                format!("{space} component {idx} must be within [{lo}, {hi}], found {n}"),
            ));
        }
    }

    if let Some(alpha) = obj.get("alpha") {
        let a = finite(alpha, path, "alpha")?;
        if !(0.0..=1.0).contains(&a) {
            return Err(TokenError::validation(path, "alpha must be within [0, 1]"));
        }
    }

    if let Some(hex) = obj.get("hex") {
        let ok = hex.as_str().is_some_and(|h| {
            h.len() == 7 && h.starts_with('#') && h[1..].chars().all(|c| c.is_ascii_hexdigit())
        });
        if !ok {
            return Err(TokenError::validation(
                path,
                format!("hex must be a 6-digit #rrggbb string, found {}", describe(hex)),
            ));
        }
    }
    Ok(())
}

fn component_range(space: ColorSpace, idx: usize) -> (f64, f64) {
    match (space, idx) {
        (ColorSpace::Srgb | ColorSpace::SrgbLinear, _) => (0.0, 1.0),
        (ColorSpace::Hsl | ColorSpace::Hwb, 0) => (0.0, 360.0),
        (ColorSpace::Hsl | ColorSpace::Hwb, _) => (0.0, 100.0),
        _ => (f64::MIN, f64::MAX),
    }
}

fn validate_unit_value(
    value: &Value,
    path: &str,
    what: &str,
    units: &[&str],
) -> Result<(), TokenError> {
    let obj = expect_record(value, path, what, &["value", "unit"], &[])?;
    finite(&obj["value"], path, what)?;
    match obj["unit"].as_str() {
        Some(unit) if units.contains(&unit) => Ok(()),
        _ => Err(TokenError::validation(
            path,
            format!(
                "{what} unit must be one of {}, found {}",
                units.join(", "),
                describe(&obj["unit"])
            ),
        )),
    }
}

/// Validates a `{value, unit}` dimension.
pub fn validate_dimension(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::Dimension, lookup) {
        return res;
    }
    validate_unit_value(value, path, "dimension", DIMENSION_UNITS)
}

/// Validates a `{value, unit}` duration.
pub fn validate_duration(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::Duration, lookup) {
        return res;
    }
    validate_unit_value(value, path, "duration", DURATION_UNITS)
}

/// Validates a `[x1, y1, x2, y2]` timing function.
pub fn validate_cubic_bezier(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::CubicBezier, lookup) {
        return res;
    }
    let points = value
        .as_array()
        .filter(|p| p.len() == 4)
        .ok_or_else(|| TokenError::validation(path, "cubicBezier must be an array of 4 numbers"))?;
    for (idx, point) in points.iter().enumerate() {
        let n = finite(point, path, "cubicBezier point")?;
        if idx % 2 == 0 && !(0.0..=1.0).contains(&n) {
            return Err(TokenError::validation(
                path,
                format!("cubicBezier x{} must be within [0, 1], found {n}", idx / 2 + 1),
            ));
        }
    }
    Ok(())
}

/// Validates a font family list.
pub fn validate_font_family(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::FontFamily, lookup) {
        return res;
    }
    let ok = match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(names) => {
            !names.is_empty()
                && names
                    .iter()
                    .all(|n| n.as_str().is_some_and(|s| !s.trim().is_empty()))
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(TokenError::validation(
            path,
            "fontFamily must be a non-empty name or list of names",
        ))
    }
}

/// Validates a numeric weight or weight keyword.
pub fn validate_font_weight(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::FontWeight, lookup) {
        return res;
    }
    if let Value::String(s) = value {
        return if FONT_WEIGHT_KEYWORDS.contains(&s.as_str()) {
            Ok(())
        } else {
            Err(TokenError::validation(
                path,
                format!("\"{s}\" is not a font weight keyword"),
            ))
        };
    }
    let n = finite(value, path, "fontWeight")?;
    if (1.0..=1000.0).contains(&n) {
        Ok(())
    } else {
        Err(TokenError::validation(
            path,
            format!("fontWeight must be within [1, 1000], found {n}"),
        ))
    }
}

/// Validates a plain number.
pub fn validate_number(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::Number, lookup) {
        return res;
    }
    finite(value, path, "number").map(|_| ())
}

/// Validates a string.
pub fn validate_string(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::String, lookup) {
        return res;
    }
    if value.is_string() {
        Ok(())
    } else {
        Err(TokenError::validation(
            path,
            format!("expected a string, found {}", describe(value)),
        ))
    }
}

/// Validates a stroke style keyword or `{dashArray, lineCap}` record.
pub fn validate_stroke_style(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::StrokeStyle, lookup) {
        return res;
    }
    if let Value::String(s) = value {
        return if STROKE_KEYWORDS.contains(&s.as_str()) {
            Ok(())
        } else {
            Err(TokenError::validation(
                path,
                format!("\"{s}\" is not a stroke style keyword"),
            ))
        };
    }
    let obj = expect_record(value, path, "strokeStyle", &["dashArray", "lineCap"], &[])?;
    let dashes = obj["dashArray"]
        .as_array()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| TokenError::validation(path, "dashArray must be a non-empty array"))?;
    for dash in dashes {
        validate_dimension(dash, path, lookup)?;
    }
    match obj["lineCap"].as_str() {
        Some(cap) if LINE_CAPS.contains(&cap) => Ok(()),
        _ => Err(TokenError::validation(
            path,
            format!("lineCap must be one of {}", LINE_CAPS.join(", ")),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({ "colorSpace": "srgb", "components": [1, 0, 0] }))]
    #[case(json!({ "colorSpace": "srgb", "components": [1, 0, 0], "alpha": 0.5, "hex": "#ff0000" }))]
    #[case(json!({ "colorSpace": "hsl", "components": [200, 50, 50] }))]
    #[case(json!({ "colorSpace": "oklch", "components": [0.7, 0.1, "none"] }))]
    fn test_color_accepts(#[case] value: Value) {
        assert!(validate_color(&value, "c", None).is_ok());
    }

    #[rstest]
    #[case(json!("red"))]
    #[case(json!({ "colorSpace": "cmyk", "components": [1, 0, 0] }))]
    #[case(json!({ "colorSpace": "srgb", "components": [1, 0] }))]
    #[case(json!({ "colorSpace": "srgb", "components": [2, 0, 0] }))]
    #[case(json!({ "colorSpace": "srgb", "components": [1, 0, 0], "alpha": 1.5 }))]
    #[case(json!({ "colorSpace": "srgb", "components": [1, 0, 0], "hex": "red" }))]
    #[case(json!({ "colorSpace": "srgb", "components": [1, 0, 0], "mode": "x" }))]
    fn test_color_rejects(#[case] value: Value) {
        assert!(validate_color(&value, "c", None).is_err());
    }

    #[test]
    fn test_dimension_and_duration_units() {
        assert!(validate_dimension(&json!({ "value": 4, "unit": "px" }), "d", None).is_ok());
        assert!(validate_dimension(&json!({ "value": 50, "unit": "%" }), "d", None).is_ok());
        assert!(validate_dimension(&json!({ "value": 4, "unit": "ms" }), "d", None).is_err());
        assert!(validate_duration(&json!({ "value": 0.2, "unit": "s" }), "d", None).is_ok());
        assert!(validate_duration(&json!({ "value": 2, "unit": "px" }), "d", None).is_err());
        assert!(validate_duration(&json!(200), "d", None).is_err());
    }

    #[rstest]
    #[case(json!([0.25, 0.1, 0.25, 1]), true)]
    #[case(json!([0, -2, 1, 3]), true)]
    #[case(json!([1.2, 0, 0.5, 1]), false)]
    #[case(json!([0.2, 0, -0.1, 1]), false)]
    #[case(json!([0.2, 0, 0.5]), false)]
    fn test_cubic_bezier(#[case] value: Value, #[case] ok: bool) {
        assert_eq!(validate_cubic_bezier(&value, "e", None).is_ok(), ok);
    }

    #[test]
    fn test_font_family_and_weight() {
        assert!(validate_font_family(&json!(["Inter", "sans-serif"]), "f", None).is_ok());
        assert!(validate_font_family(&json!([]), "f", None).is_err());
        assert!(validate_font_family(&json!([""]), "f", None).is_err());
        assert!(validate_font_weight(&json!(700), "w", None).is_ok());
        assert!(validate_font_weight(&json!("semi-bold"), "w", None).is_ok());
        assert!(validate_font_weight(&json!(0), "w", None).is_err());
        assert!(validate_font_weight(&json!(1001), "w", None).is_err());
        assert!(validate_font_weight(&json!("heavyish"), "w", None).is_err());
    }

    #[test]
    fn test_stroke_style() {
        assert!(validate_stroke_style(&json!("dashed"), "s", None).is_ok());
        let record = json!({
            "dashArray": [{ "value": 2, "unit": "px" }, "{space.xs}"],
            "lineCap": "round"
        });
        assert!(validate_stroke_style(&record, "s", None).is_ok());
        assert!(validate_stroke_style(&json!("wavy"), "s", None).is_err());
        assert!(
            validate_stroke_style(&json!({ "dashArray": [], "lineCap": "round" }), "s", None)
                .is_err()
        );
    }

    #[test]
    fn test_number_and_string() {
        assert!(validate_number(&json!(1.5), "n", None).is_ok());
        assert!(validate_number(&json!("1.5"), "n", None).is_err());
        assert!(validate_string(&json!("hello"), "s", None).is_ok());
        assert!(validate_string(&json!(1), "s", None).is_err());
    }
}
