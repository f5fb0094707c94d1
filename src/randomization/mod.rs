//! # Methods to randomize `Relation`s
//!
//! Each categorical cell goes through randomized response and each numerical cell gets
//! independent Laplace noise. The result is a `PrivateDataset` holding everything
//! needed to debias queries later on.
//!

pub mod mechanisms;
pub mod parameters;

use rand::Rng;
use std::{error, fmt, result};

use crate::{
    data_type::{ColumnType, Value},
    io::PrivateDataset,
    relation::Relation,
};

pub use mechanisms::{LaplaceNoise, RandomizedResponse};
pub use parameters::PrivateParams;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    InvalidParameter(String),
    Other(String),
}

impl Error {
    pub fn invalid_parameter(desc: impl fmt::Display) -> Error {
        Error::InvalidParameter(format!("{}", desc))
    }
    pub fn other(desc: impl fmt::Display) -> Error {
        Error::Other(format!("{}", desc))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter(desc) => writeln!(f, "InvalidParameter: {}", desc),
            Error::Other(desc) => writeln!(f, "{}", desc),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

impl Relation {
    /// Randomize the relation with the thread-local RNG
    pub fn privatize(&self, p: f64, b: f64) -> Result<PrivateDataset> {
        let params = PrivateParams::new(p, b)?;
        self.privatize_with_rng(&params, &mut rand::thread_rng())
    }

    /// Randomize the relation with a given RNG
    pub fn privatize_with_rng<R: Rng>(&self, params: &PrivateParams, rng: &mut R) -> Result<PrivateDataset> {
        let laplace = LaplaceNoise::new(params.b())?;
        let responses: Vec<RandomizedResponse> = self
            .domains()
            .iter()
            .map(|domain| RandomizedResponse::new(params, domain))
            .collect();
        let data: Vec<Vec<Value>> = self
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .zip(self.types())
                    .zip(&responses)
                    .map(|((value, column_type), response)| match (column_type, value) {
                        (ColumnType::Numerical, Value::Float(x)) => {
                            Ok(Value::Float(laplace.randomize(*x, rng)))
                        }
                        (ColumnType::Categorical, value) => Ok(response.randomize(value, rng)),
                        (ColumnType::Numerical, value) => Err(Error::other(format!(
                            "`{value}` is not numerical"
                        ))),
                    })
                    .collect::<Result<Vec<Value>>>()
            })
            .collect::<Result<Vec<Vec<Value>>>>()?;
        log::info!(
            "Privatized {} rows and {} columns with p = {}, b = {}",
            data.len(),
            self.width(),
            params.p(),
            params.b()
        );
        Ok(PrivateDataset::new(
            data,
            *params,
            self.domains().to_vec(),
            self.types().to_vec(),
        ))
    }
}
