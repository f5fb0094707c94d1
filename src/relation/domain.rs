//! # Column domains
//!
//! The distinct values observed in each column of a relation.
//!

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, ops::Index};

use crate::data_type::Value;

/// The distinct values of a column, sorted so that they can be drawn by index
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Value>", into = "Vec<Value>")]
pub struct Domain(Vec<Value>);

impl Domain {
    pub fn new() -> Domain {
        Domain(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.binary_search(value).is_ok()
    }

    /// Insert a value, return `true` if it was not already there
    pub fn insert(&mut self, value: Value) -> bool {
        match self.0.binary_search(&value) {
            Ok(_) => false,
            Err(index) => {
                self.0.insert(index, value);
                true
            }
        }
    }

    /// The number of values satisfying `pred`
    pub fn count<P: Fn(&Value) -> bool>(&self, pred: P) -> usize {
        self.0.iter().filter(|&value| pred(value)).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl FromIterator<Value> for Domain {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let set: BTreeSet<Value> = iter.into_iter().collect();
        Domain(set.into_iter().collect())
    }
}

// Values read from a record are sorted and deduplicated
impl From<Vec<Value>> for Domain {
    fn from(values: Vec<Value>) -> Self {
        values.into_iter().collect()
    }
}

impl From<Domain> for Vec<Value> {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

impl Index<usize> for Domain {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Domain {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

/// Collect the domain of each of the `width` columns of `rows`.
///
/// Each column gets its own set, so inserting into one domain never affects another.
pub fn extract_domains<R: AsRef<[Value]>>(rows: &[R], width: usize) -> Vec<Domain> {
    let mut sets: Vec<BTreeSet<Value>> = (0..width).map(|_| BTreeSet::new()).collect();
    for row in rows {
        for (set, value) in sets.iter_mut().zip(row.as_ref()) {
            set.insert(value.clone());
        }
    }
    sets.into_iter()
        .map(|set| Domain(set.into_iter().collect()))
        .collect()
}
