//! # Predicate builders
//!
//! Queries take any `Fn(&Value) -> bool`, these are shortcuts for the usual ones.
//!

use std::collections::HashSet;

use crate::data_type::Value;

/// Equal to `value`
pub fn eq<V: Into<Value>>(value: V) -> impl Fn(&Value) -> bool + Clone {
    let value = value.into();
    move |x: &Value| x == &value
}

/// Different from `value`
pub fn ne<V: Into<Value>>(value: V) -> impl Fn(&Value) -> bool + Clone {
    let value = value.into();
    move |x: &Value| x != &value
}

/// One of `values`
pub fn is_in<V: Into<Value>, I: IntoIterator<Item = V>>(values: I) -> impl Fn(&Value) -> bool + Clone {
    let values: HashSet<Value> = values.into_iter().map(Into::into).collect();
    move |x: &Value| values.contains(x)
}
