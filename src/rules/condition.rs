//! Condition groups shared by [`super::IncludeRule`] and [`super::ExcludeRule`].

use crate::types::{Param, Record, Value};

/// A set of field equality constraints; a record satisfies the clause when all of them hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    // `None` marks a non-scalar expected value, which no field can strictly equal.
    constraints: Vec<(String, Option<Value>)>,
}

impl Clause {
    /// Build a clause from a JSON object of `field -> expected scalar`.
    ///
    /// Non-object input carries no constraints, so the resulting clause matches every record.
    pub fn from_param(param: &Param) -> Self {
        let constraints = match param.as_object() {
            Some(obj) => obj
                .iter()
                .map(|(field, expected)| (field.clone(), Value::from_json(expected)))
                .collect(),
            None => Vec::new(),
        };
        Self { constraints }
    }

    /// Returns `true` if every constraint strictly equals the record's field.
    ///
    /// An absent field never matches, not even an expected `null`.
    pub fn matches(&self, record: &Record) -> bool {
        self.constraints
            .iter()
            .all(|(field, expected)| match (record.get(field), expected) {
                (Some(actual), Some(expected)) => actual.strict_eq(expected),
                _ => false,
            })
    }

    /// Number of constraints in the clause.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Ordered sequence of [`Clause`]s.
///
/// Include reads a group conjunctively, exclude disjunctively.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionGroup {
    clauses: Vec<Clause>,
}

impl ConditionGroup {
    /// Parse a rule parameter into a group.
    ///
    /// Returns `None` unless `param` is a non-empty array; callers treat that as a no-op.
    pub fn from_param(param: &Param) -> Option<Self> {
        let items = param.as_array().filter(|items| !items.is_empty())?;
        Some(Self {
            clauses: items.iter().map(Clause::from_param).collect(),
        })
    }

    /// `true` if the record satisfies every clause.
    pub fn matches_all(&self, record: &Record) -> bool {
        self.clauses.iter().all(|c| c.matches(record))
    }

    /// `true` if the record satisfies at least one clause.
    pub fn matches_any(&self, record: &Record) -> bool {
        self.clauses.iter().any(|c| c.matches(record))
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

#[cfg(test)]
mod tests {
    use super::{Clause, ConditionGroup};
    use crate::types::{Record, Value};
    use serde_json::json;

    #[test]
    fn group_requires_non_empty_array() {
        assert!(ConditionGroup::from_param(&json!([])).is_none());
        assert!(ConditionGroup::from_param(&json!({"a": 1})).is_none());
        assert!(ConditionGroup::from_param(&json!(null)).is_none());
        assert_eq!(
            ConditionGroup::from_param(&json!([{"a": 1}, {"b": 2}]))
                .unwrap()
                .clauses()
                .len(),
            2
        );
    }

    #[test]
    fn clause_matches_all_constraints() {
        let clause = Clause::from_param(&json!({"name": "John", "age": 30}));
        let john30 = Record::new().with("name", "John").with("age", 30);
        let john31 = Record::new().with("name", "John").with("age", 31);
        assert!(clause.matches(&john30));
        assert!(!clause.matches(&john31));
    }

    #[test]
    fn clause_number_matching_ignores_int_float_split() {
        let clause = Clause::from_param(&json!({"r": 20.0}));
        assert!(clause.matches(&Record::from([("r", 20)])));
    }

    #[test]
    fn expected_null_matches_only_present_null() {
        let clause = Clause::from_param(&json!({"x": null}));
        assert!(clause.matches(&Record::from([("x", Value::Null)])));
        assert!(!clause.matches(&Record::from([("y", 1)])));
    }

    #[test]
    fn compound_expected_values_never_match() {
        let clause = Clause::from_param(&json!({"x": [1]}));
        assert!(!clause.matches(&Record::from([("x", 1)])));
    }

    #[test]
    fn non_object_clause_matches_everything() {
        let clause = Clause::from_param(&json!(5));
        assert!(clause.is_empty());
        assert!(clause.matches(&Record::new()));
    }
}
