//! Token tree flattening and alias resolution.
//!
//! Flattening runs in two passes. The first walks the tree depth-first,
//! collecting token nodes with their inherited `$type` and `$deprecated`.
//! The second infers missing types through alias chains, normalizes and
//! validates every value against the complete type map, then resolves
//! aliases with cycle detection.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value, json};
use tokenlint_ast::Position;
use tracing::debug;

use crate::alias::{alias_to, parse_alias, pointer_push, pointer_to_path};
use crate::color::{Color, ColorSpace};
use crate::error::TokenError;
use crate::normalize::normalize_value;
use crate::token::{FlattenedToken, TokenType};
use crate::tree::{META_PREFIX, REF_KEY, VALUE_KEY, is_meta_key, is_token_node};
use crate::validate::{TokenLookup, describe, validate_value};

const TYPE_KEY: &str = "$type";
const DEPRECATED_KEY: &str = "$deprecated";
const EXTENSIONS_KEY: &str = "$extensions";
const DESCRIPTION_KEY: &str = "$description";

/// Maps structural pointers to source positions.
pub trait LocationResolver {
    /// Returns the position of the node at `pointer`.
    fn locate(&self, pointer: &str) -> Option<Position>;
}

impl<S: std::hash::BuildHasher> LocationResolver for HashMap<String, Position, S> {
    fn locate(&self, pointer: &str) -> Option<Position> {
        self.get(pointer).copied()
    }
}

/// A non-fatal finding raised while flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWarning {
    /// Path of the token the warning concerns.
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for TokenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Options for [`flatten_tree`].
#[derive(Default, Clone, Copy)]
pub struct FlattenOptions<'a> {
    /// Rewrite resolved colors into this space.
    pub color_space: Option<ColorSpace>,
    /// Source positions for tokens.
    pub locator: Option<&'a (dyn LocationResolver + Sync)>,
    /// Receives warnings such as aliases to deprecated tokens.
    pub on_warn: Option<&'a (dyn Fn(&TokenWarning) + Sync)>,
}

impl fmt::Debug for FlattenOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlattenOptions")
            .field("color_space", &self.color_space)
            .field("locator", &self.locator.is_some())
            .field("on_warn", &self.on_warn.is_some())
            .finish()
    }
}

/// Flattens a single token tree rooted at pointer `#`.
pub fn flatten_tree(
    tree: &Value,
    options: &FlattenOptions<'_>,
) -> Result<Vec<FlattenedToken>, TokenError> {
    flatten_tree_at(tree, "#", options)
}

/// Flattens a token tree whose root sits at `base` (e.g. `#/light`).
pub fn flatten_tree_at(
    tree: &Value,
    base: &str,
    options: &FlattenOptions<'_>,
) -> Result<Vec<FlattenedToken>, TokenError> {
    let root = tree
        .as_object()
        .ok_or_else(|| TokenError::invalid_node(base, "token tree must be an object"))?;

    let mut collector = Collector::default();
    collector.walk(root, &mut Vec::new(), base, &Inherited::default())?;
    let raw = collector.tokens;

    let index: HashMap<&str, usize> = raw
        .iter()
        .enumerate()
        .map(|(idx, token)| (token.path.as_str(), idx))
        .collect();

    let mut types: HashMap<String, TokenType> = HashMap::with_capacity(raw.len());
    for (idx, token) in raw.iter().enumerate() {
        types.insert(token.path.clone(), infer_type(&raw, &index, idx)?);
    }
    let lookup: &dyn TokenLookup = &types;

    let mut entries = Vec::with_capacity(raw.len());
    for token in &raw {
        let ty = types[&token.path];
        let values: Vec<Value> = split_fallbacks(&token.value, ty, &token.path)?
            .into_iter()
            .map(|value| normalize_value(value, ty))
            .collect();
        for value in &values {
            validate_value(ty, value, &token.path, Some(lookup))?;
        }
        entries.push(values);
    }

    let mut resolver = Resolver {
        index: &index,
        entries: &entries,
        memo: HashMap::new(),
        stack: Vec::new(),
    };

    let mut out = Vec::with_capacity(raw.len());
    for (idx, token) in raw.iter().enumerate() {
        let ty = types[&token.path];
        let alias_of = entries[idx][0]
            .as_str()
            .and_then(parse_alias)
            .map(str::to_string);

        if let Some(target) = &alias_of
            && let Some(&target_idx) = index.get(target.as_str())
            && raw[target_idx].deprecated
        {
            let warning = TokenWarning {
                path: token.path.clone(),
                message: format!("aliases deprecated token \"{target}\""),
            };
            debug!("{}", warning);
            if let Some(on_warn) = options.on_warn {
                on_warn(&warning);
            }
        }

        let mut value = flatten_layers(resolver.resolve_path(&token.path)?, ty);
        validate_value(ty, &value, &token.path, None)?;
        let mut fallbacks = Vec::with_capacity(entries[idx].len().saturating_sub(1));
        for fallback in &entries[idx][1..] {
            let resolved = flatten_layers(resolver.resolve_value(fallback)?, ty);
            validate_value(ty, &resolved, &token.path, None)?;
            fallbacks.push(resolved);
        }

        if let Some(target) = options.color_space {
            value = convert_colors(value, ty, target);
            fallbacks = fallbacks
                .into_iter()
                .map(|f| convert_colors(f, ty, target))
                .collect();
        }

        out.push(FlattenedToken {
            path: token.path.clone(),
            value,
            fallbacks,
            token_type: ty,
            deprecated: token.deprecated,
            deprecation: token.deprecation.clone(),
            extensions: token.extensions.clone(),
            location: options.locator.and_then(|l| l.locate(&token.pointer)),
            pointer: token.pointer.clone(),
            alias_of,
        });
    }

    debug!("Flattened {} tokens under {}", out.len(), base);
    Ok(out)
}

/// Rebuilds a token tree from flattened tokens.
///
/// Aliased tokens are written back as aliases, so flattening the result
/// yields the same tokens.
pub fn to_tree(tokens: &[FlattenedToken]) -> Value {
    let mut root = Map::new();
    for token in tokens {
        let mut group = &mut root;
        let mut segments = token.path.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                group.insert(segment.to_string(), token_node(token));
                break;
            }
            let entry = group
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            let Value::Object(next) = entry else {
                break;
            };
            group = next;
        }
    }
    Value::Object(root)
}

fn token_node(token: &FlattenedToken) -> Value {
    let mut node = Map::new();
    node.insert(TYPE_KEY.into(), json!(token.token_type.as_str()));
    let primary = match &token.alias_of {
        Some(target) => Value::String(alias_to(target)),
        None => token.value.clone(),
    };
    if token.fallbacks.is_empty() {
        node.insert(VALUE_KEY.into(), primary);
    } else {
        let mut values = vec![primary];
        values.extend(token.fallbacks.iter().cloned());
        node.insert(VALUE_KEY.into(), Value::Array(values));
    }
    if token.deprecated {
        let deprecated = match &token.deprecation {
            Some(reason) => json!(reason),
            None => json!(true),
        };
        node.insert(DEPRECATED_KEY.into(), deprecated);
    }
    if let Some(extensions) = &token.extensions {
        node.insert(EXTENSIONS_KEY.into(), Value::Object(extensions.clone()));
    }
    Value::Object(node)
}

struct RawToken {
    path: String,
    pointer: String,
    value: Value,
    declared: Option<TokenType>,
    deprecated: bool,
    deprecation: Option<String>,
    extensions: Option<Map<String, Value>>,
}

#[derive(Clone, Default)]
struct Inherited {
    token_type: Option<TokenType>,
    deprecated: bool,
    deprecation: Option<String>,
}

#[derive(Default)]
struct Collector {
    tokens: Vec<RawToken>,
}

impl Collector {
    fn walk(
        &mut self,
        group: &Map<String, Value>,
        path: &mut Vec<String>,
        pointer: &str,
        inherited: &Inherited,
    ) -> Result<(), TokenError> {
        let mut scope = inherited.clone();
        if let Some(ty) = group.get(TYPE_KEY) {
            scope.token_type = Some(
                ty.as_str()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        TokenError::invalid_node(pointer, format!("unknown $type {}", describe(ty)))
                    })?,
            );
        }
        if let Some(deprecated) = group.get(DEPRECATED_KEY) {
            (scope.deprecated, scope.deprecation) = parse_deprecated(deprecated, pointer)?;
        }

        for (name, child) in group {
            if is_meta_key(name) {
                continue;
            }
            let child_pointer = pointer_push(pointer, name);
            if name.is_empty() || name.contains(['.', '{', '}']) {
                return Err(TokenError::InvalidName {
                    name: name.clone(),
                    pointer: child_pointer,
                });
            }
            let Some(node) = child.as_object() else {
                return Err(TokenError::invalid_node(
                    child_pointer,
                    format!("expected a group or token, found {}", describe(child)),
                ));
            };

            path.push(name.clone());
            if is_token_node(child) {
                self.token(node, path, child_pointer, &scope)?;
            } else {
                self.walk(node, path, &child_pointer, &scope)?;
            }
            path.pop();
        }
        Ok(())
    }

    fn token(
        &mut self,
        node: &Map<String, Value>,
        path: &[String],
        pointer: String,
        inherited: &Inherited,
    ) -> Result<(), TokenError> {
        let path = path.join(".");
        if let Some(child) = node.keys().find(|key| !is_meta_key(key)) {
            return Err(TokenError::invalid_node(
                pointer,
                format!("a token may not contain \"{child}\""),
            ));
        }

        let value = match (node.get(VALUE_KEY), node.get(REF_KEY)) {
            (Some(value), None) => value.clone(),
            (None, Some(reference)) => reference
                .as_str()
                .and_then(pointer_to_path)
                .map(|target| Value::String(alias_to(&target)))
                .ok_or_else(|| {
                    TokenError::invalid_node(
                        &pointer,
                        format!(
                            "$ref must be a JSON pointer such as \"#/color/brand\", found {}",
                            describe(reference)
                        ),
                    )
                })?,
            _ => {
                return Err(TokenError::invalid_node(
                    pointer,
                    "a token needs exactly one of $value and $ref",
                ));
            }
        };

        let declared = match node.get(TYPE_KEY) {
            Some(ty) => Some(ty.as_str().and_then(|s| s.parse().ok()).ok_or_else(|| {
                TokenError::UnknownType {
                    path: path.clone(),
                    type_name: ty.as_str().map_or_else(|| describe(ty), str::to_string),
                }
            })?),
            None => inherited.token_type,
        };

        let (deprecated, deprecation) = match node.get(DEPRECATED_KEY) {
            Some(value) => parse_deprecated(value, &pointer)?,
            None => (inherited.deprecated, inherited.deprecation.clone()),
        };

        let extensions = match node.get(EXTENSIONS_KEY) {
            Some(Value::Object(ext)) => Some(ext.clone()),
            Some(_) => {
                return Err(TokenError::invalid_node(pointer, "$extensions must be an object"));
            }
            None => None,
        };

        if let Some(description) = node.get(DESCRIPTION_KEY)
            && !description.is_string()
        {
            return Err(TokenError::invalid_node(pointer, "$description must be a string"));
        }

        for key in node.keys() {
            let known = [VALUE_KEY, REF_KEY, TYPE_KEY, DEPRECATED_KEY, EXTENSIONS_KEY, DESCRIPTION_KEY];
            if key.starts_with(META_PREFIX) && !known.contains(&key.as_str()) {
                debug!("Ignoring unknown metadata key {} on {}", key, path);
            }
        }

        self.tokens.push(RawToken {
            path,
            pointer,
            value,
            declared,
            deprecated,
            deprecation,
            extensions,
        });
        Ok(())
    }
}

fn parse_deprecated(value: &Value, pointer: &str) -> Result<(bool, Option<String>), TokenError> {
    match value {
        Value::Bool(flag) => Ok((*flag, None)),
        Value::String(reason) => Ok((true, Some(reason.clone()))),
        other => Err(TokenError::invalid_node(
            pointer,
            format!("$deprecated must be a boolean or string, found {}", describe(other)),
        )),
    }
}

/// Follows the alias chain from `start` until a declared type is found.
fn infer_type(
    raw: &[RawToken],
    index: &HashMap<&str, usize>,
    start: usize,
) -> Result<TokenType, TokenError> {
    let mut visited: Vec<&str> = Vec::new();
    let mut idx = start;
    loop {
        let token = &raw[idx];
        if let Some(ty) = token.declared {
            return Ok(ty);
        }
        visited.push(&token.path);
        let Some(target) = token.value.as_str().and_then(parse_alias) else {
            return Err(TokenError::MissingType {
                path: raw[start].path.clone(),
            });
        };
        if let Some(pos) = visited.iter().position(|p| *p == target) {
            let mut chain: Vec<String> = visited[pos..].iter().map(|p| p.to_string()).collect();
            chain.push(target.to_string());
            return Err(TokenError::Cycle { chain });
        }
        idx = *index.get(target).ok_or_else(|| TokenError::UnresolvedAlias {
            path: token.path.clone(),
            target: target.to_string(),
        })?;
    }
}

fn split_fallbacks<'v>(
    value: &'v Value,
    ty: TokenType,
    path: &str,
) -> Result<Vec<&'v Value>, TokenError> {
    match value {
        Value::Array(items) if ty.accepts_fallbacks() => {
            if items.is_empty() {
                Err(TokenError::validation(path, "$value may not be an empty array"))
            } else {
                Ok(items.iter().collect())
            }
        }
        other => Ok(vec![other]),
    }
}

struct Resolver<'r> {
    index: &'r HashMap<&'r str, usize>,
    entries: &'r [Vec<Value>],
    memo: HashMap<String, Value>,
    stack: Vec<String>,
}

impl Resolver<'_> {
    fn resolve_path(&mut self, path: &str) -> Result<Value, TokenError> {
        if let Some(value) = self.memo.get(path) {
            return Ok(value.clone());
        }
        if let Some(pos) = self.stack.iter().position(|p| p == path) {
            let mut chain = self.stack[pos..].to_vec();
            chain.push(path.to_string());
            return Err(TokenError::Cycle { chain });
        }
        let idx = *self
            .index
            .get(path)
            .ok_or_else(|| TokenError::UnresolvedAlias {
                path: self.stack.last().cloned().unwrap_or_default(),
                target: path.to_string(),
            })?;

        let entries = self.entries;
        self.stack.push(path.to_string());
        let resolved = self.resolve_value(&entries[idx][0]);
        self.stack.pop();

        let resolved = resolved?;
        self.memo.insert(path.to_string(), resolved.clone());
        Ok(resolved)
    }

    fn resolve_value(&mut self, value: &Value) -> Result<Value, TokenError> {
        match value {
            Value::String(s) => match parse_alias(s) {
                Some(target) => self.resolve_path(target),
                None => Ok(value.clone()),
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(obj) => {
                let mut out = Map::with_capacity(obj.len());
                for (key, item) in obj {
                    out.insert(key.clone(), self.resolve_value(item)?);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other.clone()),
        }
    }
}

/// Splices aliased layer lists into their parent list.
fn flatten_layers(value: Value, ty: TokenType) -> Value {
    if !matches!(ty, TokenType::Shadow | TokenType::Gradient) {
        return value;
    }
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .flat_map(|item| match item {
                    Value::Array(inner) => inner,
                    other => vec![other],
                })
                .collect(),
        ),
        other => other,
    }
}

fn convert_colors(value: Value, ty: TokenType, target: ColorSpace) -> Value {
    match ty {
        TokenType::Color => convert_color(value, target),
        TokenType::Border => convert_color_field(value, target),
        TokenType::Shadow | TokenType::Gradient => match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| convert_color_field(item, target))
                    .collect(),
            ),
            other => other,
        },
        _ => value,
    }
}

fn convert_color_field(value: Value, target: ColorSpace) -> Value {
    match value {
        Value::Object(mut obj) => {
            if let Some(color) = obj.remove("color") {
                obj.insert("color".into(), convert_color(color, target));
            }
            Value::Object(obj)
        }
        other => other,
    }
}

fn convert_color(value: Value, target: ColorSpace) -> Value {
    let Some(color) = Color::from_value(&value) else {
        return value;
    };
    match color.convert(target) {
        Some(converted) => {
            let mut out = converted.to_value();
            if let (Some(hex), Value::Object(obj)) = (value.get("hex"), &mut out)
                && !obj.contains_key("hex")
            {
                obj.insert("hex".into(), hex.clone());
            }
            out
        }
        None => {
            debug!("Cannot convert {} color to {}", color.space, target);
            value
        }
    }
}
