//! # The values stored in relations
//!
//! A value is either a number or a piece of text.
//! Values are totally ordered and hashable so they can be collected into domains and sets.
//!

use serde::{Deserialize, Serialize};
use std::{cmp, fmt, hash};

use super::ColumnType;

/// A cell of a relation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Float(f64),
    Text(String),
}

impl Value {
    pub fn float(f: f64) -> Value {
        Value::Float(f)
    }

    pub fn text(s: impl Into<String>) -> Value {
        Value::Text(s.into())
    }

    /// The numerical content of the value, if any
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Float(_) => None,
            Value::Text(s) => Some(s),
        }
    }

    /// Whether the value can be stored in a column of type `column_type`, numbers must be finite
    pub fn is_of(&self, column_type: ColumnType) -> bool {
        match (self, column_type) {
            (Value::Float(f), ColumnType::Numerical) => f.is_finite(),
            (Value::Text(_), ColumnType::Categorical) => true,
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Float(_) => 0,
            Value::Text(_) => 1,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// Floats are compared with `total_cmp` so that `Value` is a lawful `Ord`
impl Ord for Value {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match (self, other) {
            (Value::Float(l), Value::Float(r)) => l.total_cmp(r),
            (Value::Text(l), Value::Text(r)) => l.cmp(r),
            (l, r) => l.rank().cmp(&r.rank()),
        }
    }
}

impl hash::Hash for Value {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Float(f) => f.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Float(i as f64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        self.as_float() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};

    #[test]
    fn test_ordering() {
        let values: BTreeSet<Value> = [
            Value::text("b"),
            Value::float(2.),
            Value::text("a"),
            Value::float(-1.),
            Value::text("a"),
        ]
        .into_iter()
        .collect();
        println!("{:?}", values);
        assert_eq!(
            values.into_iter().collect::<Vec<_>>(),
            vec![
                Value::float(-1.),
                Value::float(2.),
                Value::text("a"),
                Value::text("b")
            ]
        );
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let set: HashSet<Value> = [Value::float(0.5), Value::float(0.5), Value::text("0.5")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Value::text("0.5")));
    }

    #[test]
    fn test_comparison_with_literals() {
        assert!(Value::text("A") == "A");
        assert!(Value::float(3.) == 3.);
        assert!(Value::float(3.) != "3");
    }

    #[test]
    fn test_is_of() {
        assert!(Value::float(1.).is_of(ColumnType::Numerical));
        assert!(!Value::float(f64::NAN).is_of(ColumnType::Numerical));
        assert!(!Value::float(f64::NEG_INFINITY).is_of(ColumnType::Numerical));
        assert!(!Value::float(1.).is_of(ColumnType::Categorical));
        assert!(Value::text("NaN").is_of(ColumnType::Categorical));
    }

    #[test]
    fn test_serde_untagged() {
        let values = vec![Value::float(1.5), Value::text("1.5")];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1.5,"1.5"]"#);
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
