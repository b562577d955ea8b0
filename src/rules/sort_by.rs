//! The `sort_by` rule.

use std::cmp::Ordering;

use super::Rule;
use super::collation::collate;
use crate::types::{Collection, Param, Record, Value};

/// Ordered list of sort key field names; earlier keys take priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKeys {
    keys: Vec<String>,
}

impl SortKeys {
    /// Parse a rule parameter into sort keys.
    ///
    /// Returns `None` unless `param` is a non-empty array. String entries are used as field
    /// names; other entries are looked up by their JSON text (`1`, `true`, `null`).
    pub fn from_param(param: &Param) -> Option<Self> {
        let items = param.as_array().filter(|items| !items.is_empty())?;
        let keys = items
            .iter()
            .map(|item| match item.as_str() {
                Some(s) => s.to_string(),
                None => item.to_string(),
            })
            .collect();
        Some(Self { keys })
    }

    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keys
    }

    /// Compare two records key by key, stopping at the first key that decides.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for key in &self.keys {
            match compare_field(a.get(key), b.get(key)) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }
}

/// Stable multi-key sort.
///
/// Per key, the first matching case decides:
///
/// 1. strictly equal values (including both absent, or both null): next key
/// 2. left absent or null: left sorts after
/// 3. right absent or null: left sorts before
/// 4. left is a string: [`collate`] against the right value's text form; equal means next key
/// 5. otherwise left sorts before if `left < right`, and after in every other case
///
/// Case 5 makes values that cannot be ordered (`NaN`, mismatched kinds) compare as "after" in
/// both directions. The merge below only moves an element forward when it is strictly less,
/// so such values keep their input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortByRule;

impl Rule for SortByRule {
    fn execute(&self, collection: &[Record], params: &Param) -> Collection {
        let Some(keys) = SortKeys::from_param(params) else {
            return collection.to_vec();
        };
        let mut order: Vec<usize> = (0..collection.len()).collect();
        merge_sort_by(&mut order, |a, b| keys.compare(&collection[a], &collection[b]));
        order.into_iter().map(|i| collection[i].clone()).collect()
    }
}

fn compare_field(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    let strictly_equal = match (left, right) {
        (None, None) => true,
        (Some(l), Some(r)) => l.strict_eq(r),
        _ => false,
    };
    if strictly_equal {
        return Ordering::Equal;
    }

    let (l, r) = match (present(left), present(right)) {
        (None, _) => return Ordering::Greater,
        (_, None) => return Ordering::Less,
        (Some(l), Some(r)) => (l, r),
    };

    match l {
        Value::Utf8(s) => collate(s, &r.to_text()),
        _ if l.loosely_less_than(r) => Ordering::Less,
        _ => Ordering::Greater,
    }
}

// Absent and null both count as missing.
fn present(v: Option<&Value>) -> Option<&Value> {
    v.filter(|v| !v.is_null())
}

// Bottom-up merge sort over indices. Never panics on an inconsistent comparator.
fn merge_sort_by<F>(items: &mut Vec<usize>, mut cmp: F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    let len = items.len();
    if len < 2 {
        return;
    }

    let mut buf = items.clone();
    let mut width = 1;
    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j) = (start, mid);
            for slot in &mut buf[start..end] {
                // Take from the right run only when strictly less, which keeps ties stable.
                let take_right =
                    i >= mid || (j < end && cmp(items[j], items[i]) == Ordering::Less);
                if take_right {
                    *slot = items[j];
                    j += 1;
                } else {
                    *slot = items[i];
                    i += 1;
                }
            }
            start = end;
        }
        std::mem::swap(items, &mut buf);
        width *= 2;
    }
}
