//! The `exclude` rule.

use super::{ConditionGroup, Rule};
use crate::types::{Collection, Param, Record};

/// Removes records that satisfy **at least one** clause in the condition group.
///
/// Note the asymmetry with [`super::IncludeRule`], which needs every clause to hold. Both
/// behaviors are relied upon; keep them as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeRule;

impl Rule for ExcludeRule {
    fn execute(&self, collection: &[Record], params: &Param) -> Collection {
        let Some(group) = ConditionGroup::from_param(params) else {
            return collection.to_vec();
        };
        collection
            .iter()
            .filter(|record| !group.matches_any(record))
            .cloned()
            .collect()
    }
}
