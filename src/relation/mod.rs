//! # The `Relation` struct
//!
//! An in-memory table of typed values, the input of the privatization.
//! Column types are fixed at construction and the domains of all columns are collected once.
//!

pub mod domain;

use itertools::Itertools;
use std::{error, fmt, result};

use crate::data_type::{self, ColumnType, TypeInference, Value};
pub use domain::{extract_domains, Domain};

// Error handling

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    InvalidInput(String),
    UnknownColumn(String),
    Other(String),
}

impl Error {
    pub fn invalid_input(desc: impl fmt::Display) -> Error {
        Error::InvalidInput(format!("{}", desc))
    }
    pub fn unknown_column(col: usize, width: usize) -> Error {
        Error::UnknownColumn(format!("column {col} does not exist, there are {width} columns"))
    }
    pub fn other(desc: impl fmt::Display) -> Error {
        Error::Other(format!("{}", desc))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(desc) => writeln!(f, "InvalidInput: {}", desc),
            Error::UnknownColumn(desc) => writeln!(f, "UnknownColumn: {}", desc),
            Error::Other(desc) => writeln!(f, "{}", desc),
        }
    }
}

impl error::Error for Error {}

impl From<data_type::Error> for Error {
    fn from(err: data_type::Error) -> Self {
        match err {
            data_type::Error::InvalidInput(desc) => Error::InvalidInput(desc),
            data_type::Error::Other(desc) => Error::Other(desc),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// A relation: rows of values with one type per column
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    rows: Vec<Vec<Value>>,
    types: Vec<ColumnType>,
    domains: Vec<Domain>,
}

impl Relation {
    /// Build a relation from raw fields, inferring the column types
    pub fn new<R: AsRef<[String]>>(rows: &[R]) -> Result<Relation> {
        Relation::with_inference(rows, &TypeInference::default())
    }

    /// Build a relation from raw fields with a specific type inference
    pub fn with_inference<R: AsRef<[String]>>(rows: &[R], inference: &TypeInference) -> Result<Relation> {
        let first = rows
            .first()
            .ok_or_else(|| Error::invalid_input("cannot infer the column types of an empty relation"))?;
        let width = first.as_ref().len();
        check_width(rows.iter().map(|row| row.as_ref().len()), width)?;
        let types = inference.column_types(rows, width)?;
        Relation::with_types(rows, types)
    }

    /// Build a relation from raw fields with known column types
    pub fn with_types<R: AsRef<[String]>>(rows: &[R], types: Vec<ColumnType>) -> Result<Relation> {
        check_width(rows.iter().map(|row| row.as_ref().len()), types.len())?;
        let rows = rows
            .iter()
            .map(|row| {
                row.as_ref()
                    .iter()
                    .zip(&types)
                    .map(|(field, column_type)| column_type.parse(field))
                    .collect::<data_type::Result<Vec<Value>>>()
            })
            .collect::<data_type::Result<Vec<Vec<Value>>>>()?;
        Relation::from_values(rows, types)
    }

    /// Build a relation from already typed values
    pub fn from_values(rows: Vec<Vec<Value>>, types: Vec<ColumnType>) -> Result<Relation> {
        check_width(rows.iter().map(Vec::len), types.len())?;
        if let Some((r, i)) = rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .zip(&types)
                .position(|(value, column_type)| !value.is_of(*column_type))
                .map(|i| (r, i))
        }) {
            return Err(Error::invalid_input(format!(
                "value `{}` at row {r} does not fit the {} column {i}",
                rows[r][i], types[i]
            )));
        }
        let domains = extract_domains(&rows, types.len());
        Ok(Relation { rows, types, domains })
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn domain(&self, col: usize) -> Result<&Domain> {
        self.domains
            .get(col)
            .ok_or_else(|| Error::unknown_column(col, self.width()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The number of columns
    pub fn width(&self) -> usize {
        self.types.len()
    }
}

fn check_width<I: IntoIterator<Item = usize>>(widths: I, width: usize) -> Result<()> {
    match widths.into_iter().position(|w| w != width) {
        Some(r) => Err(Error::invalid_input(format!(
            "row {r} does not have the expected {width} fields"
        ))),
        None => Ok(()),
    }
}

/// Display the first rows of a table
pub(crate) fn fmt_table(
    f: &mut fmt::Formatter<'_>,
    types: &[ColumnType],
    rows: &[Vec<Value>],
) -> fmt::Result {
    const MAX_ROWS: usize = 10;
    writeln!(f, "{}", types.iter().join(" | "))?;
    for row in rows.iter().take(MAX_ROWS) {
        writeln!(f, "{}", row.iter().join(" | "))?;
    }
    if rows.len() > MAX_ROWS {
        writeln!(f, "... ({} rows)", rows.len())?;
    }
    Ok(())
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_table(f, &self.types, &self.rows)
    }
}
