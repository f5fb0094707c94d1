//! # The persisted private dataset
//!
//! A `PrivateDataset` is the randomized data together with the randomization parameters,
//! the column domains and the column types. It is all the estimators need.
//!
//! It is stored as a JSON record:
//! ```text
//! {"version": 1, "data": [[...], ...], "p": 0.25, "b": 1.0, "domains": [[...], ...], "types": ["numerical", "categorical"]}
//! ```
//!

use serde::{Deserialize, Serialize};
use std::{
    error, fmt,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
    result,
};

use crate::{
    data_type::{ColumnType, Value},
    randomization::{self, PrivateParams},
    relation::{Domain, Relation},
};

// Error management
#[derive(Debug)]
pub enum Error {
    Io(String),
    Serialization(String),
    Dataset(String),
}

impl Error {
    pub fn dataset(dataset: impl fmt::Display) -> Error {
        Error::Dataset(format!("Dataset error {}", dataset))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(desc) => writeln!(f, "Io: {}", desc),
            Error::Serialization(desc) => writeln!(f, "Serialization: {}", desc),
            Error::Dataset(dataset) => writeln!(f, "Dataset: {}", dataset),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
impl From<randomization::Error> for Error {
    fn from(err: randomization::Error) -> Self {
        Error::Dataset(err.to_string())
    }
}

pub type Result<T> = result::Result<T, Error>;

/// The record as read, before any consistency check
#[derive(Deserialize)]
struct Record {
    version: u32,
    data: Vec<Vec<Value>>,
    #[serde(flatten)]
    params: PrivateParams,
    domains: Vec<Domain>,
    types: Vec<ColumnType>,
}

/// A randomized dataset, immutable once produced.
///
/// Deserialized datasets are always validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Record")]
pub struct PrivateDataset {
    version: u32,
    data: Vec<Vec<Value>>,
    #[serde(flatten)]
    params: PrivateParams,
    domains: Vec<Domain>,
    types: Vec<ColumnType>,
}

impl PrivateDataset {
    /// The version of the persisted record
    pub const VERSION: u32 = 1;

    pub(crate) fn new(
        data: Vec<Vec<Value>>,
        params: PrivateParams,
        domains: Vec<Domain>,
        types: Vec<ColumnType>,
    ) -> PrivateDataset {
        PrivateDataset {
            version: PrivateDataset::VERSION,
            data,
            params,
            domains,
            types,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn data(&self) -> &[Vec<Value>] {
        &self.data
    }

    pub fn params(&self) -> PrivateParams {
        self.params
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    /// Check the record is consistent
    fn validate(&self) -> Result<()> {
        if self.version != PrivateDataset::VERSION {
            return Err(Error::dataset(format!(
                "unsupported version {} (expected {})",
                self.version,
                PrivateDataset::VERSION
            )));
        }
        PrivateParams::new(self.params.p(), self.params.b())?;
        if self.domains.len() != self.types.len() {
            return Err(Error::dataset(format!(
                "{} domains for {} columns",
                self.domains.len(),
                self.types.len()
            )));
        }
        for (i, (domain, column_type)) in self.domains.iter().zip(&self.types).enumerate() {
            if let Some(value) = domain.iter().find(|value| !value.is_of(*column_type)) {
                return Err(Error::dataset(format!(
                    "domain value `{value}` does not fit the {column_type} column {i}"
                )));
            }
        }
        for (r, row) in self.data.iter().enumerate() {
            if row.len() != self.types.len() {
                return Err(Error::dataset(format!(
                    "row {r} has {} fields instead of {}",
                    row.len(),
                    self.types.len()
                )));
            }
            if let Some(i) = row
                .iter()
                .zip(&self.types)
                .position(|(value, column_type)| !value.is_of(*column_type))
            {
                return Err(Error::dataset(format!(
                    "value `{}` at row {r} does not fit the {} column {i}",
                    row[i], self.types[i]
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<PrivateDataset> {
        let record: Record = serde_json::from_str(json)?;
        PrivateDataset::try_from(record)
    }

    /// Write the record to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        log::info!(
            "Saved {} private rows to {}",
            self.data.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Read a record from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PrivateDataset> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let record: Record = serde_json::from_reader(reader)?;
        let dataset = PrivateDataset::try_from(record)?;
        log::info!(
            "Loaded {} private rows from {}",
            dataset.data.len(),
            path.as_ref().display()
        );
        Ok(dataset)
    }
}

impl TryFrom<Record> for PrivateDataset {
    type Error = Error;

    fn try_from(record: Record) -> Result<Self> {
        let dataset = PrivateDataset {
            version: record.version,
            data: record.data,
            params: record.params,
            domains: record.domains,
            types: record.types,
        };
        dataset.validate()?;
        Ok(dataset)
    }
}

impl Relation {
    /// Randomize the relation and store the result in `path`
    pub fn make_private<P: AsRef<Path>>(&self, p: f64, b: f64, path: P) -> Result<PrivateDataset> {
        let dataset = self.privatize(p, b)?;
        dataset.save(path)?;
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> PrivateDataset {
        let rows: Vec<Vec<String>> = vec![
            vec!["1".into(), "A".into()],
            vec!["2".into(), "B".into()],
            vec!["3".into(), "A".into()],
        ];
        Relation::new(&rows).unwrap().privatize(0.5, 1.).unwrap()
    }

    #[test]
    fn test_record_schema() {
        let json: serde_json::Value = serde_json::from_str(&dataset().to_json().unwrap()).unwrap();
        println!("{json}");
        assert_eq!(json["version"], 1);
        assert_eq!(json["p"], 0.5);
        assert_eq!(json["b"], 1.);
        assert_eq!(json["types"], serde_json::json!(["numerical", "categorical"]));
        assert_eq!(json["domains"][1], serde_json::json!(["A", "B"]));
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("private.json");
        let dataset = dataset();
        dataset.save(&path).unwrap();
        assert_eq!(PrivateDataset::load(&path).unwrap(), dataset);
    }

    #[test]
    fn test_make_private() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("private.json");
        let rows: Vec<Vec<String>> = vec![vec!["x".into()], vec!["y".into()]];
        let dataset = Relation::new(&rows).unwrap().make_private(0.1, 2., &path).unwrap();
        assert_eq!(PrivateDataset::load(&path).unwrap(), dataset);
        assert!(PrivateDataset::load(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_invalid_records() {
        let inconsistent = r#"{"version":1,"data":[["A",1.0]],"p":0.5,"b":1.0,"domains":[["A"],[1.0]],"types":["categorical","categorical"]}"#;
        assert!(matches!(PrivateDataset::from_json(inconsistent), Err(Error::Dataset(_))));
        let bad_params = r#"{"version":1,"data":[],"p":1.5,"b":1.0,"domains":[],"types":[]}"#;
        assert!(matches!(PrivateDataset::from_json(bad_params), Err(Error::Dataset(_))));
        let bad_version = r#"{"version":2,"data":[],"p":0.5,"b":1.0,"domains":[],"types":[]}"#;
        assert!(matches!(PrivateDataset::from_json(bad_version), Err(Error::Dataset(_))));
        let bad_type = r#"{"version":1,"data":[],"p":0.5,"b":1.0,"domains":[],"types":["text"]}"#;
        assert!(matches!(PrivateDataset::from_json(bad_type), Err(Error::Serialization(_))));
        let bad_domain = r#"{"version":1,"data":[],"p":0.5,"b":1.0,"domains":[[1.0]],"types":["categorical"]}"#;
        assert!(matches!(PrivateDataset::from_json(bad_domain), Err(Error::Dataset(_))));
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let null_value = r#"{"version":1,"data":[[null]],"p":0.5,"b":1.0,"domains":[[1.0]],"types":["numerical"]}"#;
        assert!(PrivateDataset::from_json(null_value).is_err());
        let dataset = PrivateDataset::new(
            vec![vec![Value::float(f64::NAN)]],
            PrivateParams::new(0.5, 1.).unwrap(),
            vec![[Value::float(1.)].into_iter().collect()],
            vec![ColumnType::Numerical],
        );
        assert!(matches!(dataset.validate(), Err(Error::Dataset(_))));
    }

    #[test]
    fn test_deserialize_validates() {
        let ragged = r#"{"version":1,"data":[["A"],[]],"p":0.5,"b":1.0,"domains":[["A"]],"types":["categorical"]}"#;
        assert!(serde_json::from_str::<PrivateDataset>(ragged).is_err());
        let valid = r#"{"version":1,"data":[["A"]],"p":0.5,"b":1.0,"domains":[["A"]],"types":["categorical"]}"#;
        let dataset: PrivateDataset = serde_json::from_str(valid).unwrap();
        assert_eq!(dataset, PrivateDataset::from_json(valid).unwrap());
    }

    #[test]
    fn test_loaded_domains_are_normalized() {
        let json = r#"{"version":1,"data":[["C"],["A"],["A"]],"p":0.5,"b":1.0,"domains":[["C","B","A","A"]],"types":["categorical"]}"#;
        let dataset = PrivateDataset::from_json(json).unwrap();
        assert_eq!(
            dataset.domains()[0].values(),
            &[Value::text("A"), Value::text("B"), Value::text("C")]
        );
        assert!(dataset.domains()[0].contains(&Value::text("C")));
    }
}
