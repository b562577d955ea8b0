//! Core data model types for the rule pipeline.
//!
//! A [`Collection`] is an ordered list of [`Record`]s. Each record maps field names to scalar
//! [`Value`]s. Rules are selected and parameterized by a [`ConditionSpec`], whose entry order is
//! the order in which rules run.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Untyped rule parameter.
///
/// Each rule interprets its own parameter shape and treats anything it does not understand
/// as a no-op.
pub type Param = serde_json::Value;

/// Ordered sequence of records.
pub type Collection = Vec<Record>;

/// A single scalar field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string slice for [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used for equality and ordering: ints and floats share one number space.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Strict equality where all numbers share one space.
    ///
    /// `Int64(1)` equals `Float64(1.0)`, `NaN` equals nothing (not even itself), and values of
    /// different kinds are never equal.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Utf8(a), Value::Utf8(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Number conversion used by relational comparison.
    ///
    /// Booleans map to 0/1. Strings are parsed after trimming: empty means 0, unsigned `0x`, `0o`
    /// and `0b` prefixes select a radix, `Infinity` is accepted, and anything else that is not a
    /// decimal literal yields `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Int64(v) => *v as f64,
            Value::Float64(v) => *v,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Utf8(s) => parse_number(s),
        }
    }

    /// Relational `<` over non-null values.
    ///
    /// String pairs compare by code units; every other pairing compares numerically, and any
    /// comparison involving `NaN` is `false`.
    pub fn loosely_less_than(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Utf8(a), Value::Utf8(b)) => a < b,
            (a, b) => a.to_number() < b.to_number(),
        }
    }

    /// Text form used when a string is collated against a non-string value.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed("null"),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Int64(v) => Cow::Owned(v.to_string()),
            Value::Float64(v) => Cow::Owned(format_number(*v)),
            Value::Utf8(s) => Cow::Borrowed(s),
        }
    }

    /// Convert a JSON scalar into a [`Value`].
    ///
    /// Returns `None` for arrays and objects.
    pub fn from_json(v: &serde_json::Value) -> Option<Value> {
        match v {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::String(s) => Some(Value::Utf8(s.clone())),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Int64(i)),
                None => n.as_f64().map(Value::Float64),
            },
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// Convert this value into JSON. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int64(v) => serde_json::Value::from(*v),
            Value::Float64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Utf8(s) => serde_json::Value::String(s.clone()),
        }
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

fn parse_number(s: &str) -> f64 {
    let t = s.trim();
    match t {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if t.starts_with("0x") || t.starts_with("0X") => parse_radix(&t[2..], 16),
        _ if t.starts_with("0o") || t.starts_with("0O") => parse_radix(&t[2..], 8),
        _ if t.starts_with("0b") || t.starts_with("0B") => parse_radix(&t[2..], 2),
        _ if t
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) =>
        {
            t.parse::<f64>().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

// Shortest round-trip digits laid out the way number-to-string conversion does: plain
// notation for decimal exponents in [-7, 21), exponent notation (`1e+21`, `1.5e-7`) otherwise.
fn format_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        let s = if v > 0.0 { "Infinity" } else { "-Infinity" };
        return s.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let sign = if v < 0.0 { "-" } else { "" };
    let sci = format!("{:e}", v.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return v.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return v.to_string();
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the start of `digits`.
    let n = exp + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let e = n - 1;
        let e_sign = if e >= 0 { "+" } else { "-" };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{e_sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{e_sign}{}", e.abs())
        }
    };
    format!("{sign}{body}")
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A single record: an open mapping from field name to [`Value`].
///
/// Reading an absent field yields `None`. A field holding [`Value::Null`] is present; equality
/// matching distinguishes the two. Fields keep insertion order; equality ignores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `field`, or `None` if the record has no such field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set `field`, returning the previous value if there was one.
    ///
    /// An existing field keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Builder-style [`Self::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a record from a JSON object whose values are all scalars.
    ///
    /// Returns `None` if `v` is not an object or holds a nested array/object.
    pub fn from_json(v: &serde_json::Value) -> Option<Record> {
        let obj = v.as_object()?;
        let mut fields = IndexMap::with_capacity(obj.len());
        for (k, jv) in obj {
            fields.insert(k.clone(), Value::from_json(jv)?);
        }
        Some(Record { fields })
    }

    /// Convert this record into a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Record {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Ordered mapping from rule name to rule parameter.
///
/// Entry order is the rule application order. Setting an existing name replaces its parameter
/// but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSpec {
    entries: Vec<(String, Param)>,
}

impl ConditionSpec {
    /// Create an empty condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameter for `rule`.
    pub fn set(&mut self, rule: impl Into<String>, param: impl Into<Param>) {
        let rule = rule.into();
        let param = param.into();
        match self.entries.iter_mut().find(|(name, _)| *name == rule) {
            Some((_, slot)) => *slot = param,
            None => self.entries.push((rule, param)),
        }
    }

    /// Builder-style [`Self::set`].
    pub fn with(mut self, rule: impl Into<String>, param: impl Into<Param>) -> Self {
        self.set(rule, param);
        self
    }

    /// Returns the parameter for `rule`, if set.
    pub fn get(&self, rule: &str) -> Option<&Param> {
        self.entries
            .iter()
            .find(|(name, _)| name == rule)
            .map(|(_, p)| p)
    }

    /// Iterate `(rule name, parameter)` pairs in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Rule names in application order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no rules are named.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a condition from JSON, keeping object key order.
    ///
    /// Anything other than an object yields an empty condition: it names no rules.
    pub fn from_json(v: &serde_json::Value) -> Self {
        match v.as_object() {
            Some(obj) => Self {
                entries: obj.iter().map(|(k, p)| (k.clone(), p.clone())).collect(),
            },
            None => Self::default(),
        }
    }
}

impl Serialize for ConditionSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConditionSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::<String, Param>::deserialize(deserializer)?;
        Ok(Self {
            entries: map.into_iter().collect(),
        })
    }
}
