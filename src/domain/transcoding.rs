//! Code transcoding rules applied during cross-sectional transformation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-component code mappings.
///
/// Maps a component identifier to the set of source-to-target code
/// translations configured for it. Pure data holder; components without
/// rules pass their codes through untranslated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranscodingRules {
    rules: HashMap<String, HashMap<String, String>>,
}

impl TranscodingRules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register a translation for one component, returning the previous
    /// target if the source code was already mapped.
    pub fn insert_rule(
        &mut self,
        component: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Option<String> {
        self.rules
            .entry(component.into())
            .or_default()
            .insert(source.into(), target.into())
    }

    /// Look up the target code for a component's source code.
    pub fn rule(&self, component: &str, source: &str) -> Option<&str> {
        self.rules
            .get(component)?
            .get(source)
            .map(String::as_str)
    }

    /// Check whether any translations exist for a component.
    pub fn has_rules_for(&self, component: &str) -> bool {
        self.rules
            .get(component)
            .is_some_and(|codes| !codes.is_empty())
    }

    /// Iterate over the component identifiers that have rules.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Number of components with at least one rule.
    pub fn component_count(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the rule set is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
