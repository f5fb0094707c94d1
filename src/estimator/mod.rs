//! # Debiased aggregates over a private dataset
//!
//! Randomized response mixes rows in and out of a predicate at known rates.
//! Inverting this mixing gives unbiased estimates of COUNT, SUM and AVERAGE over the original data.
//!

pub mod rates;

use std::{error, fmt, path::Path, result};

use crate::{
    data_type::{ColumnType, Value},
    io::{self, PrivateDataset},
    randomization::PrivateParams,
    relation::{fmt_table, Domain},
};

pub use rates::Rates;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    TypeMismatch(String),
    DegenerateEstimate(String),
    UnknownColumn(String),
    Other(String),
}

impl Error {
    pub fn type_mismatch(col: usize, found: ColumnType, expected: ColumnType) -> Error {
        Error::TypeMismatch(format!("column {col} is {found}, expected {expected}"))
    }
    pub fn degenerate_estimate(desc: impl fmt::Display) -> Error {
        Error::DegenerateEstimate(format!("{}", desc))
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
            Error::TypeMismatch(desc) => writeln!(f, "TypeMismatch: {}", desc),
            Error::DegenerateEstimate(desc) => writeln!(f, "DegenerateEstimate: {}", desc),
            Error::UnknownColumn(desc) => writeln!(f, "UnknownColumn: {}", desc),
            Error::Other(desc) => writeln!(f, "{}", desc),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

/// Something answering debiased aggregate queries.
///
/// Predicates are total functions from a value of the predicate column to a boolean.
pub trait Estimator {
    fn column_types(&self) -> &[ColumnType];

    fn domain(&self, col: usize) -> Result<&Domain>;

    /// The number of private rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The type of column `col`, checked against `expected`
    fn column_type(&self, col: usize, expected: ColumnType) -> Result<ColumnType> {
        let types = self.column_types();
        let found = *types
            .get(col)
            .ok_or_else(|| Error::unknown_column(col, types.len()))?;
        if found == expected {
            Ok(found)
        } else {
            Err(Error::type_mismatch(col, found, expected))
        }
    }

    /// Estimate the number of rows whose value in the categorical column `col` satisfies `pred`
    fn count<P: Fn(&Value) -> bool>(&self, col: usize, pred: P) -> Result<f64>;

    /// Estimate the sum of the numerical column `scol` over the rows whose value in the categorical column `pcol` satisfies `pred`
    fn sum<P: Fn(&Value) -> bool>(&self, scol: usize, pcol: usize, pred: P) -> Result<f64>;

    /// The ratio of the `sum` and `count` estimates
    fn average<P: Fn(&Value) -> bool>(&self, scol: usize, pcol: usize, pred: P) -> Result<f64> {
        let sum = self.sum(scol, pcol, &pred)?;
        let count = self.count(pcol, &pred)?;
        if count == 0. {
            Err(Error::degenerate_estimate(
                "the estimated count is 0, the average is undefined",
            ))
        } else {
            Ok(sum / count)
        }
    }
}

impl<E: Estimator + ?Sized> Estimator for &E {
    fn column_types(&self) -> &[ColumnType] {
        (**self).column_types()
    }

    fn domain(&self, col: usize) -> Result<&Domain> {
        (**self).domain(col)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn count<P: Fn(&Value) -> bool>(&self, col: usize, pred: P) -> Result<f64> {
        (**self).count(col, pred)
    }

    fn sum<P: Fn(&Value) -> bool>(&self, scol: usize, pcol: usize, pred: P) -> Result<f64> {
        (**self).sum(scol, pcol, pred)
    }

    fn average<P: Fn(&Value) -> bool>(&self, scol: usize, pcol: usize, pred: P) -> Result<f64> {
        (**self).average(scol, pcol, pred)
    }
}

/// The estimator engine over a loaded private dataset
#[derive(Clone, Debug, PartialEq)]
pub struct PrivateRelation {
    dataset: PrivateDataset,
}

impl PrivateRelation {
    pub fn new(dataset: PrivateDataset) -> PrivateRelation {
        PrivateRelation { dataset }
    }

    /// Load a persisted private dataset
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<PrivateRelation> {
        Ok(PrivateRelation::new(PrivateDataset::load(path)?))
    }

    pub fn dataset(&self) -> &PrivateDataset {
        &self.dataset
    }

    pub fn params(&self) -> PrivateParams {
        self.dataset.params()
    }

    /// The randomized-response rates of `pred` on the categorical column `col`
    pub fn rates<P: Fn(&Value) -> bool>(&self, col: usize, pred: P) -> Result<Rates> {
        self.column_type(col, ColumnType::Categorical)?;
        let domain = self.domain(col)?;
        Rates::new(self.params().p(), domain.count(pred), domain.len())
    }

    fn numerical(&self, row: &[Value], col: usize) -> Result<f64> {
        row[col]
            .as_float()
            .ok_or_else(|| Error::other(format!("`{}` in column {col} is not numerical", row[col])))
    }
}

impl From<PrivateDataset> for PrivateRelation {
    fn from(dataset: PrivateDataset) -> Self {
        PrivateRelation::new(dataset)
    }
}

impl Estimator for PrivateRelation {
    fn column_types(&self) -> &[ColumnType] {
        self.dataset.types()
    }

    fn domain(&self, col: usize) -> Result<&Domain> {
        self.dataset
            .domains()
            .get(col)
            .ok_or_else(|| Error::unknown_column(col, self.dataset.domains().len()))
    }

    fn len(&self) -> usize {
        self.dataset.data().len()
    }

    fn count<P: Fn(&Value) -> bool>(&self, col: usize, pred: P) -> Result<f64> {
        let rates = self.rates(col, &pred)?;
        let positives = self
            .dataset
            .data()
            .iter()
            .filter(|row| pred(&row[col]))
            .count();
        let estimate = rates.count(positives as f64, self.len() as f64);
        log::debug!(
            "count on column {col}: {positives} observed out of {} rows, {rates}, estimate = {estimate}",
            self.len()
        );
        Ok(estimate)
    }

    fn sum<P: Fn(&Value) -> bool>(&self, scol: usize, pcol: usize, pred: P) -> Result<f64> {
        self.column_type(scol, ColumnType::Numerical)?;
        let rates = self.rates(pcol, &pred)?;
        let (mut positives, mut negatives) = (0., 0.);
        for row in self.dataset.data() {
            let value = self.numerical(row, scol)?;
            if pred(&row[pcol]) {
                positives += value;
            } else {
                negatives += value;
            }
        }
        let estimate = rates.sum(positives, negatives);
        log::debug!(
            "sum of column {scol} on column {pcol}: {positives} observed in, {negatives} observed out, {rates}, estimate = {estimate}"
        );
        Ok(estimate)
    }
}

impl fmt::Display for PrivateRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p = {}, b = {}", self.params().p(), self.params().b())?;
        fmt_table(f, self.dataset.types(), self.dataset.data())
    }
}
