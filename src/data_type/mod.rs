//! # Column types and type inference
//!
//! Only two column types are supported: categorical and numerical.
//! Raw fields are typed once, when a relation is built.
//!

pub mod value;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, error, fmt, result};

pub use value::Value;

// Error handling

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    InvalidInput(String),
    Other(String),
}

impl Error {
    pub fn invalid_input(desc: impl fmt::Display) -> Error {
        Error::InvalidInput(format!("{}", desc))
    }
    pub fn other(desc: impl fmt::Display) -> Error {
        Error::Other(format!("{}", desc))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(desc) => writeln!(f, "InvalidInput: {}", desc),
            Error::Other(desc) => writeln!(f, "{}", desc),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

/// The type of a column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Categorical,
    Numerical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Categorical => write!(f, "categorical"),
            ColumnType::Numerical => write!(f, "numerical"),
        }
    }
}

impl ColumnType {
    /// Type a raw field according to the column type, numerical fields must be finite
    pub fn parse(&self, field: &str) -> Result<Value> {
        match self {
            ColumnType::Categorical => Ok(Value::text(field)),
            ColumnType::Numerical => parse_finite(field)
                .map(Value::Float)
                .ok_or_else(|| Error::invalid_input(format!("`{field}` is not a finite number"))),
        }
    }
}

fn parse_finite(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Infer column types from raw fields.
///
/// A column is numerical when all its fields parse as finite floats.
/// Otherwise it is categorical when it has at most `max_categories` distinct values.
/// Anything else is free text, which is not supported.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeInference {
    max_categories: usize,
}

impl TypeInference {
    pub const DEFAULT_MAX_CATEGORIES: usize = 256;

    pub fn new(max_categories: usize) -> TypeInference {
        TypeInference { max_categories }
    }

    pub fn max_categories(&self) -> usize {
        self.max_categories
    }

    /// Infer the type of a single column
    pub fn column_type<'a, I>(&self, fields: I) -> Option<ColumnType>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        if fields
            .clone()
            .into_iter()
            .all(|field| parse_finite(field).is_some())
        {
            return Some(ColumnType::Numerical);
        }
        let distinct: HashSet<&str> = fields.into_iter().collect();
        (distinct.len() <= self.max_categories).then_some(ColumnType::Categorical)
    }

    /// Infer the types of all the columns of a raw table whose rows all have `width` fields
    pub fn column_types<R: AsRef<[String]>>(&self, rows: &[R], width: usize) -> Result<Vec<ColumnType>> {
        if let Some(r) = rows.iter().position(|row| row.as_ref().len() != width) {
            return Err(Error::invalid_input(format!(
                "row {r} does not have the expected {width} fields"
            )));
        }
        (0..width)
            .map(|i| {
                self.column_type(rows.iter().map(|row| row.as_ref()[i].as_str()))
                    .ok_or_else(|| {
                        let sample = rows
                            .iter()
                            .map(|row| row.as_ref()[i].as_str())
                            .unique()
                            .take(3)
                            .join(", ");
                        Error::invalid_input(format!(
                            "column {i} is free text ({sample}, ...), only categorical and numerical columns are supported"
                        ))
                    })
            })
            .collect()
    }
}

impl Default for TypeInference {
    fn default() -> Self {
        TypeInference::new(TypeInference::DEFAULT_MAX_CATEGORIES)
    }
}
