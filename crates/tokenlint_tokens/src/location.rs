//! Source positions for token nodes in a JSONC document.

use std::collections::HashMap;

use jsonc_parser::ast::{ObjectPropName, Value as AstValue};
use jsonc_parser::{CollectOptions, ParseOptions};
use tokenlint_ast::{LineIndex, Position};

use crate::alias::pointer_push;
use crate::flatten::LocationResolver;

/// Resolves token pointers to the line and column of their key in a JSONC
/// source.
///
/// Pointers are relative to a base object (for a config file, the value of
/// its `tokens` key), so `#/color/brand` maps to `tokens.color.brand`.
#[derive(Debug, Clone, Default)]
pub struct JsoncLocator {
    positions: HashMap<String, Position>,
}

impl JsoncLocator {
    /// Indexes every object key below the property path `base`.
    ///
    /// Returns `None` if the source does not parse or `base` does not lead to
    /// an object.
    pub fn new(source: &str, base: &[&str]) -> Option<Self> {
        let ast = jsonc_parser::parse_to_ast(
            source,
            &CollectOptions::default(),
            &ParseOptions::default(),
        )
        .ok()?;
        let mut node = ast.value.as_ref()?;
        for segment in base {
            let object = node.as_object()?;
            node = &object
                .properties
                .iter()
                .find(|prop| prop_name(&prop.name) == *segment)?
                .value;
        }

        let index = LineIndex::new(source);
        let mut positions = HashMap::new();
        collect(node, "#", &index, &mut positions);
        Some(Self { positions })
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl LocationResolver for JsoncLocator {
    fn locate(&self, pointer: &str) -> Option<Position> {
        self.positions.get(pointer).copied()
    }
}

fn prop_name<'a>(name: &'a ObjectPropName<'_>) -> &'a str {
    match name {
        ObjectPropName::String(s) => &s.value,
        ObjectPropName::Word(w) => w.value,
    }
}

fn collect(
    node: &AstValue<'_>,
    pointer: &str,
    index: &LineIndex<'_>,
    out: &mut HashMap<String, Position>,
) {
    let Some(object) = node.as_object() else {
        return;
    };
    for prop in &object.properties {
        let name = prop_name(&prop.name);
        if name.starts_with('$') {
            continue;
        }
        let child = pointer_push(pointer, name);
        let offset = u32::try_from(prop.range.start).unwrap_or(u32::MAX);
        out.insert(child.clone(), index.position(offset));
        collect(&prop.value, &child, index, out);
    }
}
