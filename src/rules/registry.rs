//! Name-to-rule registry.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{ExcludeRule, IncludeRule, Rule, SortByRule};
use crate::error::{PipelineError, PipelineResult};

/// Built-in rule implementations, addressable by their canonical names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// [`IncludeRule`], canonical name `include`.
    Include,
    /// [`ExcludeRule`], canonical name `exclude`.
    Exclude,
    /// [`SortByRule`], canonical name `sort_by`.
    SortBy,
}

impl RuleKind {
    pub const ALL: [RuleKind; 3] = [RuleKind::Include, RuleKind::Exclude, RuleKind::SortBy];

    /// Canonical registry name.
    pub fn name(self) -> &'static str {
        match self {
            RuleKind::Include => "include",
            RuleKind::Exclude => "exclude",
            RuleKind::SortBy => "sort_by",
        }
    }

    /// A fresh instance of the rule.
    pub fn rule(self) -> Arc<dyn Rule> {
        match self {
            RuleKind::Include => Arc::new(IncludeRule),
            RuleKind::Exclude => Arc::new(ExcludeRule),
            RuleKind::SortBy => Arc::new(SortByRule),
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown rule kind '{s}' (expected one of: {})",
                    RuleKind::ALL.map(RuleKind::name).join(", ")
                )
            })
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from rule name to rule implementation.
///
/// A name binds at most one rule; registering an existing name replaces the binding. Mutation
/// needs `&mut self`, so a registry shared behind `&` (e.g. during processing) cannot change
/// underneath a run.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with `include`, `exclude` and `sort_by` registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for kind in RuleKind::ALL {
            registry.rules.insert(kind.name().to_string(), kind.rule());
        }
        registry
    }

    /// Bind `name` to `rule`, returning the rule previously bound to that name.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidRuleName`] if `name` is empty or whitespace.
    pub fn register<R>(
        &mut self,
        name: impl Into<String>,
        rule: R,
    ) -> PipelineResult<Option<Arc<dyn Rule>>>
    where
        R: Rule + 'static,
    {
        self.register_shared(name, Arc::new(rule))
    }

    /// Like [`Self::register`], for a rule that is already shared.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        rule: Arc<dyn Rule>,
    ) -> PipelineResult<Option<Arc<dyn Rule>>> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PipelineError::InvalidRuleName { name });
        }
        Ok(self.rules.insert(name, rule))
    }

    /// Bind `name` to the built-in implementation described by `kind`.
    ///
    /// This is how configured (textual) rule bindings are registered.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::TypeConstraintViolation`] if `kind` does not name a rule implementation.
    /// - [`PipelineError::InvalidRuleName`] if `name` is empty or whitespace.
    pub fn register_kind(
        &mut self,
        name: impl Into<String>,
        kind: &str,
    ) -> PipelineResult<Option<Arc<dyn Rule>>> {
        let name = name.into();
        let kind = kind
            .parse::<RuleKind>()
            .map_err(|message| PipelineError::TypeConstraintViolation {
                name: name.clone(),
                message,
            })?;
        self.register_shared(name, kind.rule())
    }

    /// Look up a rule by name. Unknown names yield `None`.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Rule>> {
        self.rules.get(name).cloned()
    }

    /// Remove a binding, returning the rule that was bound.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Rule>> {
        self.rules.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{RuleKind, RuleRegistry};
    use crate::error::PipelineError;
    use crate::types::{Collection, Param, Record};
    use serde_json::json;

    fn take_first(data: &[Record], _params: &Param) -> Collection {
        data.iter().take(1).cloned().collect()
    }

    #[test]
    fn builtins_are_registered() {
        let registry = RuleRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["exclude", "include", "sort_by"]);
        assert!(registry.resolve("include").is_some());
        assert!(registry.resolve("nope").is_none());
    }

    #[test]
    fn register_replaces_existing_binding() {
        let mut registry = RuleRegistry::with_builtins();
        let previous = registry.register("include", take_first).unwrap();
        assert!(previous.is_some());
        assert_eq!(registry.len(), 3);

        let data = vec![Record::from([("a", 1)]), Record::from([("a", 2)])];
        let rule = registry.resolve("include").unwrap();
        assert_eq!(rule.execute(&data, &json!([{"a": 2}])), vec![data[0].clone()]);
    }

    #[test]
    fn register_rejects_blank_names() {
        let mut registry = RuleRegistry::new();
        let err = registry.register("  ", take_first).err().unwrap();
        assert_eq!(err, PipelineError::InvalidRuleName { name: "  ".to_string() });
        assert!(registry.is_empty());
    }

    #[test]
    fn register_kind_aliases_builtins() {
        let mut registry = RuleRegistry::new();
        assert!(registry.register_kind("filter", "include").unwrap().is_none());
        assert!(registry.contains("filter"));
    }

    #[test]
    fn register_kind_rejects_unknown_kinds() {
        let mut registry = RuleRegistry::new();
        let err = registry.register_kind("filter", "where").err().unwrap();
        match err {
            PipelineError::TypeConstraintViolation { name, message } => {
                assert_eq!(name, "filter");
                assert!(message.contains("unknown rule kind 'where'"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!registry.contains("filter"));
    }

    #[test]
    fn unregister_removes_binding() {
        let mut registry = RuleRegistry::with_builtins();
        assert!(registry.unregister("sort_by").is_some());
        assert!(registry.resolve("sort_by").is_none());
    }

    #[test]
    fn rule_kind_round_trips_through_names() {
        for kind in RuleKind::ALL {
            assert_eq!(kind.name().parse::<RuleKind>(), Ok(kind));
        }
    }
}
