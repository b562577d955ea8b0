//! The `include` rule.

use super::{ConditionGroup, Rule};
use crate::types::{Collection, Param, Record};

/// Keeps records that satisfy **every** clause in the condition group.
///
/// Survivors keep their relative order. An empty or non-array parameter keeps everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeRule;

impl Rule for IncludeRule {
    fn execute(&self, collection: &[Record], params: &Param) -> Collection {
        let Some(group) = ConditionGroup::from_param(params) else {
            return collection.to_vec();
        };
        collection
            .iter()
            .filter(|record| group.matches_all(record))
            .cloned()
            .collect()
    }
}
