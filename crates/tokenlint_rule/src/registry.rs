//! The rule registry: built-in rules first, then plugins in order.

use std::collections::HashMap;

use tracing::debug;

use crate::{RuleError, RuleModule};

/// Label used as the origin of built-in rules.
pub const BUILTIN: &str = "built-in rules";

/// A collection of rules supplied by a plugin.
///
/// Plugins arrive already resolved; loading them is up to the caller.
pub struct Plugin {
    /// Plugin specifier, as written in the configuration.
    pub name: String,
    pub rules: Vec<Box<dyn RuleModule>>,
}

impl Plugin {
    pub fn new(name: impl Into<String>, rules: Vec<Box<dyn RuleModule>>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish()
    }
}

struct Entry {
    module: Box<dyn RuleModule>,
    origin: String,
}

/// Name to module mapping for one lint invocation.
#[derive(Default)]
pub struct RuleRegistry {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
    strict: bool,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires every rule to carry a `meta.description`.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Registers a rule.
    ///
    /// Fails if the name is empty or taken, if the rule declares no
    /// capabilities, or, in strict mode, if it has no description.
    pub fn register(
        &mut self,
        origin: &str,
        module: Box<dyn RuleModule>,
    ) -> Result<(), RuleError> {
        let name = module.name();
        if name.trim().is_empty() {
            return Err(RuleError::invalid_rule(origin, "rule has an empty name"));
        }
        if module.meta().capabilities.is_empty() {
            return Err(RuleError::invalid_rule(
                origin,
                format!("rule \"{name}\" declares no events and no run-level hook"),
            ));
        }
        if self.strict && module.meta().description().is_none() {
            return Err(RuleError::MissingDescription {
                name: name.to_string(),
                origin: origin.to_string(),
            });
        }
        if let Some(&existing) = self.by_name.get(name) {
            return Err(RuleError::Duplicate {
                name: name.to_string(),
                first: self.entries[existing].origin.clone(),
                second: origin.to_string(),
            });
        }

        debug!("Registered rule '{}' from {}", name, origin);
        self.by_name.insert(name.to_string(), self.entries.len());
        self.entries.push(Entry {
            module,
            origin: origin.to_string(),
        });
        Ok(())
    }

    /// Registers a built-in rule.
    pub fn register_builtin(&mut self, module: Box<dyn RuleModule>) -> Result<(), RuleError> {
        self.register(BUILTIN, module)
    }

    /// Registers every rule of a plugin, in order.
    pub fn register_plugin(&mut self, plugin: Plugin) -> Result<(), RuleError> {
        let origin = format!("plugin \"{}\"", plugin.name);
        plugin
            .rules
            .into_iter()
            .try_for_each(|rule| self.register(&origin, rule))
    }

    pub fn get(&self, name: &str) -> Option<&dyn RuleModule> {
        self.by_name
            .get(name)
            .map(|&i| &*self.entries[i].module)
    }

    /// Returns where a rule came from.
    pub fn origin(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&i| self.entries[i].origin.as_str())
    }

    /// Iterates rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn RuleModule> {
        self.entries.iter().map(|e| &*e.module)
    }

    /// Rule names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .field("strict", &self.strict)
            .finish()
    }
}
