//! Filter primitives for list queries
//!
//! A [`FilterSet`] is an ordered conjunction of `field == value` predicates.
//! Listing features keep compile-time safety by defining a typed filter enum
//! (see `domain::models`) that converts into `(String, FieldValue)` pairs.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scalar value a record field can be filtered or sorted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl FieldValue {
    /// Variant rank used to order values of mismatched types deterministically.
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Integer(_) => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Timestamp(_) => 2,
            FieldValue::Text(_) => 3,
        }
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(v)
    }
}

/// Conjunction of equality predicates, applied in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet(Vec<(String, FieldValue)>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.push((field.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(f, v)| (f.as_str(), v))
    }

    /// Conjunction of `self AND other`, with `self` acting as the base.
    pub fn merge(&self, other: &FilterSet) -> FilterSet {
        let mut merged = self.clone();
        merged.0.extend(other.0.iter().cloned());
        merged
    }
}

impl<F> FromIterator<F> for FilterSet
where
    F: Into<(String, FieldValue)>,
{
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        FilterSet(iter.into_iter().map(Into::into).collect())
    }
}
