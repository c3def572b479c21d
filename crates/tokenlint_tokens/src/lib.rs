//! # tokenlint_tokens
//!
//! Turns a design token document into flat, alias-resolved, type-checked
//! tokens.
//!
//! A document is either one token tree or a record of trees keyed by theme
//! name. Each tree is walked depth-first; every token value is normalized
//! from shorthand into its canonical shape, validated against its type, and
//! any `{path}` aliases are resolved against the other tokens of the same
//! theme.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tokenlint_tokens::{FlattenOptions, TokenSet, TokenType};
//!
//! let tree = json!({
//!     "color": {
//!         "$type": "color",
//!         "red": { "$value": "#ff0000" },
//!         "brand": { "$value": "{color.red}" }
//!     },
//!     "space": { "sm": { "$type": "dimension", "$value": "4px" } }
//! });
//! let tokens = TokenSet::from_value(&tree, &FlattenOptions::default()).unwrap();
//! let brand = tokens.get("color.brand").unwrap();
//! assert_eq!(brand.token_type, TokenType::Color);
//! assert_eq!(brand.value["hex"], "#ff0000");
//! assert_eq!(brand.css_var_name(), "--color-brand");
//! ```

pub mod alias;
pub mod color;
mod error;
mod flatten;
mod location;
pub mod normalize;
mod pattern;
mod theme;
mod token;
pub mod tree;
pub mod validate;

pub use color::{Color, ColorSpace, parse_css_color};
pub use error::TokenError;
pub use flatten::{
    FlattenOptions, LocationResolver, TokenWarning, flatten_tree, flatten_tree_at, to_tree,
};
pub use location::JsoncLocator;
pub use pattern::{AllowList, AllowPattern};
pub use theme::{DEFAULT_THEME, DesignTokens, Theme, TokenSet};
pub use token::{FlattenedToken, TokenType, css_var_name};
pub use validate::{TokenLookup, validate_value};
