use serde_json::Value;

use super::scalar::{
    validate_color, validate_cubic_bezier, validate_dimension, validate_duration,
    validate_font_family, validate_font_weight, validate_number, validate_stroke_style,
};
use super::{TokenLookup, check_alias, describe, expect_record, field_path, finite, one_or_many};
use crate::TokenType;
use crate::alias::is_alias;
use crate::error::TokenError;

/// Validates a `{color, width, style}` border.
pub fn validate_border(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::Border, lookup) {
        return res;
    }
    let obj = expect_record(value, path, "border", &["color", "width", "style"], &[])?;
    validate_color(&obj["color"], &field_path(path, "color"), lookup)?;
    validate_dimension(&obj["width"], &field_path(path, "width"), lookup)?;
    validate_stroke_style(&obj["style"], &field_path(path, "style"), lookup)
}

/// Validates one shadow layer or a list of layers.
pub fn validate_shadow(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::Shadow, lookup) {
        return res;
    }
    let layers = one_or_many(value);
    if layers.is_empty() {
        return Err(TokenError::validation(path, "shadow must have at least one layer"));
    }
    for layer in layers {
        if let Some(res) = check_alias(layer, path, TokenType::Shadow, lookup) {
            res?;
            continue;
        }
        let obj = expect_record(
            layer,
            path,
            "shadow",
            &["color", "offsetX", "offsetY", "blur", "spread"],
            &["inset"],
        )?;
        validate_color(&obj["color"], &field_path(path, "color"), lookup)?;
        for key in ["offsetX", "offsetY", "blur", "spread"] {
            validate_dimension(&obj[key], &field_path(path, key), lookup)?;
        }
        if let Some(inset) = obj.get("inset")
            && !inset.is_boolean()
        {
            return Err(TokenError::validation(
                path,
                format!("shadow inset must be a boolean, found {}", describe(inset)),
            ));
        }
    }
    Ok(())
}

/// Validates a list of gradient stops.
pub fn validate_gradient(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::Gradient, lookup) {
        return res;
    }
    let stops = one_or_many(value);
    if stops.is_empty() {
        return Err(TokenError::validation(path, "gradient must have at least one stop"));
    }
    for stop in stops {
        let obj = expect_record(stop, path, "gradient stop", &["color", "position"], &[])?;
        validate_color(&obj["color"], &field_path(path, "color"), lookup)?;

        let position = &obj["position"];
        let position_path = field_path(path, "position");
        if position.as_str().is_some_and(is_alias) {
            validate_number(position, &position_path, lookup)?;
            continue;
        }
        let n = finite(position, &position_path, "gradient position")?;
        if !(0.0..=1.0).contains(&n) {
            return Err(TokenError::validation(
                position_path,
                format!("gradient position must be within [0, 1], found {n}"),
            ));
        }
    }
    Ok(())
}

/// Validates a `{duration, delay, timingFunction}` transition.
pub fn validate_transition(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::Transition, lookup) {
        return res;
    }
    let obj = expect_record(
        value,
        path,
        "transition",
        &["duration", "delay", "timingFunction"],
        &[],
    )?;
    validate_duration(&obj["duration"], &field_path(path, "duration"), lookup)?;
    validate_duration(&obj["delay"], &field_path(path, "delay"), lookup)?;
    validate_cubic_bezier(
        &obj["timingFunction"],
        &field_path(path, "timingFunction"),
        lookup,
    )
}

/// Validates a typography record.
pub fn validate_typography(
    value: &Value,
    path: &str,
    lookup: Option<&dyn TokenLookup>,
) -> Result<(), TokenError> {
    if let Some(res) = check_alias(value, path, TokenType::Typography, lookup) {
        return res;
    }
    let obj = expect_record(
        value,
        path,
        "typography",
        &[
            "fontFamily",
            "fontSize",
            "fontWeight",
            "letterSpacing",
            "lineHeight",
        ],
        &[],
    )?;
    validate_font_family(&obj["fontFamily"], &field_path(path, "fontFamily"), lookup)?;
    validate_dimension(&obj["fontSize"], &field_path(path, "fontSize"), lookup)?;
    validate_font_weight(&obj["fontWeight"], &field_path(path, "fontWeight"), lookup)?;
    validate_dimension(
        &obj["letterSpacing"],
        &field_path(path, "letterSpacing"),
        lookup,
    )?;
    validate_number(&obj["lineHeight"], &field_path(path, "lineHeight"), lookup)
}
