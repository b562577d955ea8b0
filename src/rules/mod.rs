//! Transformation rules.
//!
//! A [`Rule`] turns a collection into a new collection, driven by an untyped [`Param`]. Rules
//! never fail: a parameter the rule does not understand leaves the collection unchanged.
//!
//! Built-in rules:
//!
//! - [`IncludeRule`] (`include`): keep records that satisfy every clause of a condition group
//! - [`ExcludeRule`] (`exclude`): drop records that satisfy any clause of a condition group
//! - [`SortByRule`] (`sort_by`): stable multi-key sort
//!
//! Custom rules can be written as a type implementing [`Rule`] or as a plain closure:
//!
//! ```rust
//! use rule_pipeline::rules::{Rule, RuleRegistry};
//! use rule_pipeline::types::{Collection, Param, Record};
//!
//! let mut registry = RuleRegistry::with_builtins();
//! registry
//!     .register("limit", |data: &[Record], params: &Param| -> Collection {
//!         let n = params.as_u64().unwrap_or(data.len() as u64) as usize;
//!         data.iter().take(n).cloned().collect()
//!     })
//!     .unwrap();
//! assert!(registry.contains("limit"));
//! ```

pub mod collation;
pub mod condition;
pub mod exclude;
pub mod include;
pub mod registry;
pub mod sort_by;

use crate::types::{Collection, Param, Record};

pub use condition::{Clause, ConditionGroup};
pub use exclude::ExcludeRule;
pub use include::IncludeRule;
pub use registry::{RuleKind, RuleRegistry};
pub use sort_by::{SortByRule, SortKeys};

/// A named, pluggable transformation step.
///
/// Implementations must not mutate their input (they only ever see a shared slice) and must
/// treat malformed parameters as a no-op, returning a copy of `collection`.
pub trait Rule: Send + Sync {
    fn execute(&self, collection: &[Record], params: &Param) -> Collection;
}

impl<F> Rule for F
where
    F: Fn(&[Record], &Param) -> Collection + Send + Sync,
{
    fn execute(&self, collection: &[Record], params: &Param) -> Collection {
        self(collection, params)
    }
}
