//! Flattened token types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokenlint_ast::Position;

/// The value type of a design token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    Duration,
    CubicBezier,
    FontFamily,
    FontWeight,
    Number,
    String,
    StrokeStyle,
    Border,
    Shadow,
    Gradient,
    Transition,
    Typography,
}

impl TokenType {
    /// Returns the `$type` spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenType::Color => "color",
            TokenType::Dimension => "dimension",
            TokenType::Duration => "duration",
            TokenType::CubicBezier => "cubicBezier",
            TokenType::FontFamily => "fontFamily",
            TokenType::FontWeight => "fontWeight",
            TokenType::Number => "number",
            TokenType::String => "string",
            TokenType::StrokeStyle => "strokeStyle",
            TokenType::Border => "border",
            TokenType::Shadow => "shadow",
            TokenType::Gradient => "gradient",
            TokenType::Transition => "transition",
            TokenType::Typography => "typography",
        }
    }

    /// Returns true for types whose value is a structured record.
    pub const fn is_composite(&self) -> bool {
        matches!(
            self,
            TokenType::Border
                | TokenType::Shadow
                | TokenType::Gradient
                | TokenType::Transition
                | TokenType::Typography
        )
    }

    /// Returns true if a `$value` array means `[value, ...fallbacks]`.
    ///
    /// Types whose canonical value is itself an array (cubic-bezier,
    /// font-family, shadow, gradient) never take fallbacks.
    pub const fn accepts_fallbacks(&self) -> bool {
        matches!(
            self,
            TokenType::Color
                | TokenType::Dimension
                | TokenType::Duration
                | TokenType::Number
                | TokenType::String
                | TokenType::FontWeight
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "color" => TokenType::Color,
            "dimension" => TokenType::Dimension,
            "duration" => TokenType::Duration,
            "cubicBezier" => TokenType::CubicBezier,
            "fontFamily" => TokenType::FontFamily,
            "fontWeight" => TokenType::FontWeight,
            "number" => TokenType::Number,
            "string" => TokenType::String,
            "strokeStyle" => TokenType::StrokeStyle,
            "border" => TokenType::Border,
            "shadow" => TokenType::Shadow,
            "gradient" => TokenType::Gradient,
            "transition" => TokenType::Transition,
            "typography" => TokenType::Typography,
            other => return Err(other.to_string()),
        })
    }
}

/// A token after flattening and alias resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedToken {
    /// Dot-separated path, unique within a theme.
    pub path: String,

    /// Canonical, alias-free value.
    pub value: Value,

    /// Alternate values, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<Value>,

    /// Token type.
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Whether the token is deprecated.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,

    /// Deprecation explanation, when one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<String>,

    /// Vendor extensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,

    /// JSON Pointer of the originating tree node.
    pub pointer: String,

    /// Source position of the originating node, when a resolver knew it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Position>,

    /// Path of the token this one aliases, when `$value` was an alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
}

impl FlattenedToken {
    /// Returns the CSS custom property name for this token
    /// (`color.brand.primary` becomes `--color-brand-primary`).
    pub fn css_var_name(&self) -> String {
        css_var_name(&self.path)
    }

    /// Returns the replacement path named by the deprecation, if any.
    ///
    /// A deprecation written as `{color.new}` names `color.new`.
    pub fn replacement(&self) -> Option<&str> {
        self.deprecation.as_deref().and_then(crate::alias::parse_alias)
    }
}

/// Returns the CSS custom property name for a token path.
pub fn css_var_name(path: &str) -> String {
    format!("--{}", path.replace('.', "-"))
}
