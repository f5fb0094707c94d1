//! # Cleaning over a private relation
//!
//! The analyst declares that some clean labels stand for dirty values of a categorical column.
//! Predicates written with clean labels are rewritten into predicates over the dirty values
//! and passed to the underlying estimator. The private data itself is never modified.
//!

use parking_lot::RwLock;
use std::{
    collections::{BTreeMap, HashSet},
    error, fmt, result,
};

use crate::{
    data_type::{ColumnType, Value},
    estimator::{self, Estimator},
    relation::Domain,
};

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    UnknownValue(String),
    UnknownColumn(String),
    TypeMismatch(String),
    Other(String),
}

impl Error {
    pub fn unknown_value(col: usize, value: &Value) -> Error {
        Error::UnknownValue(format!("`{value}` is not in the domain of column {col}"))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownValue(desc) => writeln!(f, "UnknownValue: {}", desc),
            Error::UnknownColumn(desc) => writeln!(f, "UnknownColumn: {}", desc),
            Error::TypeMismatch(desc) => writeln!(f, "TypeMismatch: {}", desc),
            Error::Other(desc) => writeln!(f, "{}", desc),
        }
    }
}

impl error::Error for Error {}

impl From<estimator::Error> for Error {
    fn from(err: estimator::Error) -> Self {
        match err {
            estimator::Error::UnknownColumn(desc) => Error::UnknownColumn(desc),
            estimator::Error::TypeMismatch(desc) => Error::TypeMismatch(desc),
            err => Error::Other(err.to_string()),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// The clean label to dirty value edges of one column
type Edges = RwLock<BTreeMap<Value, Value>>;

/// An estimator queried with clean labels.
///
/// Each column has its own mapping behind its own lock:
/// `add_map` and `translate_predicate` on the same column are serialized.
///
/// `add_map` does not check that the dirty value exists in the column domain,
/// `add_map_checked` does.
#[derive(Debug)]
pub struct CleanPrivateRelation<E> {
    estimator: E,
    graph: Vec<Edges>,
}

impl<E: Estimator> CleanPrivateRelation<E> {
    pub fn new(estimator: E) -> CleanPrivateRelation<E> {
        let graph = (0..estimator.column_types().len())
            .map(|_| RwLock::new(BTreeMap::new()))
            .collect();
        CleanPrivateRelation { estimator, graph }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    fn edges(&self, col: usize) -> Result<&Edges> {
        self.estimator.column_type(col, ColumnType::Categorical)?;
        self.graph
            .get(col)
            .ok_or_else(|| estimator::Error::unknown_column(col, self.graph.len()).into())
    }

    /// Let `clean` stand for `dirty` in column `col`, replacing any previous dirty value for `clean`
    pub fn add_map<D: Into<Value>, C: Into<Value>>(&self, col: usize, dirty: D, clean: C) -> Result<()> {
        let (dirty, clean) = (dirty.into(), clean.into());
        log::debug!("column {col}: `{clean}` -> `{dirty}`");
        if let Some(previous) = self.edges(col)?.write().insert(clean, dirty) {
            log::debug!("column {col}: replaced `{previous}`");
        }
        Ok(())
    }

    /// Same as `add_map` but fails if `dirty` is not in the domain of `col`
    pub fn add_map_checked<D: Into<Value>, C: Into<Value>>(&self, col: usize, dirty: D, clean: C) -> Result<()> {
        let dirty = dirty.into();
        let domain: &Domain = self.estimator.domain(col)?;
        if !domain.contains(&dirty) {
            return Err(Error::unknown_value(col, &dirty));
        }
        self.add_map(col, dirty, clean)
    }

    /// The dirty value `clean` stands for in column `col`, if any
    pub fn dirty_value(&self, col: usize, clean: &Value) -> Result<Option<Value>> {
        Ok(self.edges(col)?.read().get(clean).cloned())
    }

    /// Rewrite a predicate over clean labels into a predicate over dirty values.
    ///
    /// The dirty values selected are fixed when this is called.
    pub fn translate_predicate<P: Fn(&Value) -> bool>(
        &self,
        col: usize,
        pred: P,
    ) -> Result<impl Fn(&Value) -> bool + Clone> {
        let dirty: HashSet<Value> = self
            .edges(col)?
            .read()
            .iter()
            .filter(|&(clean, _)| pred(clean))
            .map(|(_, dirty)| dirty.clone())
            .collect();
        log::debug!("column {col}: predicate selects {} dirty values", dirty.len());
        Ok(move |value: &Value| dirty.contains(value))
    }

    fn translate<P: Fn(&Value) -> bool>(&self, col: usize, pred: P) -> estimator::Result<impl Fn(&Value) -> bool + Clone> {
        self.translate_predicate(col, pred).map_err(|err| match err {
            Error::UnknownColumn(desc) => estimator::Error::UnknownColumn(desc),
            Error::TypeMismatch(desc) => estimator::Error::TypeMismatch(desc),
            Error::UnknownValue(desc) | Error::Other(desc) => estimator::Error::Other(desc),
        })
    }
}

impl<E: Estimator> Estimator for CleanPrivateRelation<E> {
    fn column_types(&self) -> &[ColumnType] {
        self.estimator.column_types()
    }

    fn domain(&self, col: usize) -> estimator::Result<&Domain> {
        self.estimator.domain(col)
    }

    fn len(&self) -> usize {
        self.estimator.len()
    }

    fn count<P: Fn(&Value) -> bool>(&self, col: usize, pred: P) -> estimator::Result<f64> {
        let pred = self.translate(col, pred)?;
        self.estimator.count(col, pred)
    }

    fn sum<P: Fn(&Value) -> bool>(&self, scol: usize, pcol: usize, pred: P) -> estimator::Result<f64> {
        let pred = self.translate(pcol, pred)?;
        self.estimator.sum(scol, pcol, pred)
    }

    fn average<P: Fn(&Value) -> bool>(&self, scol: usize, pcol: usize, pred: P) -> estimator::Result<f64> {
        let pred = self.translate(pcol, pred)?;
        self.estimator.average(scol, pcol, pred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{estimator::PrivateRelation, io::PrivateDataset, predicate, relation::Relation};
    use std::{sync::Arc, thread};

    fn relation() -> PrivateRelation {
        let rows: Vec<Vec<String>> = [
            ["10", " Private", "a"],
            ["20", " Self-emp-inc", "a"],
            ["30", " Private", "b"],
            ["40", " Self-emp-not-inc", "b"],
            ["50", " Self-emp-inc", "b"],
            ["60", " ?", "a"],
        ]
        .iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect();
        Relation::new(&rows).unwrap().privatize(0., 0.).unwrap().into()
    }

    #[test]
    fn test_translate_predicate() {
        let relation = relation();
        let clean = CleanPrivateRelation::new(&relation);
        clean.add_map(1, " Self-emp-inc", "Self-employed").unwrap();
        clean.add_map(1, " Self-emp-not-inc", "Self-employed-other").unwrap();
        let pred = clean.translate_predicate(1, predicate::eq("Self-employed")).unwrap();
        assert!(pred(&Value::text(" Self-emp-inc")));
        assert!(!pred(&Value::text(" Self-emp-not-inc")));
        assert!(!pred(&Value::text("Self-employed")));
        let pred = clean
            .translate_predicate(1, |v: &Value| v.as_text().map_or(false, |s| s.starts_with("Self")))
            .unwrap();
        assert!(pred(&Value::text(" Self-emp-inc")));
        assert!(pred(&Value::text(" Self-emp-not-inc")));
        // Unmapped dirty values are never selected
        assert!(!pred(&Value::text(" Private")));
    }

    #[test]
    fn test_last_write_wins() {
        let relation = relation();
        let clean = CleanPrivateRelation::new(&relation);
        clean.add_map(1, " Self-emp-inc", "Self-emp-inc").unwrap();
        clean.add_map(1, " Self-emp-inc", "Self-emp-inc").unwrap();
        assert_eq!(clean.count(1, predicate::eq("Self-emp-inc")).unwrap(), 2.);
        assert_eq!(
            clean.dirty_value(1, &Value::text("Self-emp-inc")).unwrap(),
            Some(Value::text(" Self-emp-inc"))
        );
        clean.add_map(1, " Private", "Self-emp-inc").unwrap();
        let pred = clean.translate_predicate(1, predicate::eq("Self-emp-inc")).unwrap();
        assert!(pred(&Value::text(" Private")));
        assert!(!pred(&Value::text(" Self-emp-inc")));
        assert_eq!(clean.sum(0, 1, predicate::eq("Self-emp-inc")).unwrap(), 40.);
    }

    #[test]
    fn test_many_to_one() {
        let relation = relation();
        let clean = CleanPrivateRelation::new(&relation);
        clean.add_map(1, " ?", "unknown").unwrap();
        clean.add_map(1, " ?", "missing").unwrap();
        assert_eq!(clean.count(1, predicate::eq("unknown")).unwrap(), 1.);
        assert_eq!(clean.count(1, predicate::is_in(["unknown", "missing"])).unwrap(), 1.);
        assert_eq!(clean.average(0, 1, predicate::eq("missing")).unwrap(), 60.);
    }

    #[test]
    fn test_columns_are_independent() {
        let relation = relation();
        let clean = CleanPrivateRelation::new(&relation);
        clean.add_map(1, " Private", "P").unwrap();
        clean.add_map(2, "a", "A").unwrap();
        assert_eq!(clean.dirty_value(2, &Value::text("P")).unwrap(), None);
        assert_eq!(clean.dirty_value(1, &Value::text("A")).unwrap(), None);
        assert_eq!(clean.count(1, predicate::eq("A")).unwrap(), 0.);
        assert_eq!(clean.count(2, predicate::eq("A")).unwrap(), 3.);
    }

    #[test]
    fn test_errors() {
        let relation = relation();
        let clean = CleanPrivateRelation::new(&relation);
        assert!(matches!(clean.add_map(0, "10", "ten"), Err(Error::TypeMismatch(_))));
        assert!(matches!(clean.add_map(5, "x", "y"), Err(Error::UnknownColumn(_))));
        let err = clean.add_map_checked(1, " Privat", "Private").unwrap_err();
        println!("{err}");
        assert!(matches!(err, Error::UnknownValue(_)));
        clean.add_map_checked(1, " Private", "Private").unwrap();
        assert!(matches!(
            clean.count(0, predicate::eq("x")),
            Err(estimator::Error::TypeMismatch(_))
        ));
        assert!(matches!(
            clean.sum(1, 1, predicate::eq("Private")),
            Err(estimator::Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_concurrent_mapping() {
        let clean = Arc::new(CleanPrivateRelation::new(relation()));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let clean = clean.clone();
                thread::spawn(move || {
                    for j in 0..100 {
                        clean
                            .add_map(1, " Private", format!("label-{i}-{j}"))
                            .unwrap();
                        clean.count(1, predicate::eq(format!("label-{i}-{j}"))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(clean.count(1, predicate::eq("label-3-99")).unwrap(), 2.);
    }

    #[test]
    fn test_checked_map_on_reloaded_domain() {
        let json = r#"{"version":1,"data":[["C"],["A"],["A"]],"p":0.5,"b":1.0,"domains":[["C","B","A","A"]],"types":["categorical"]}"#;
        let clean = CleanPrivateRelation::new(PrivateRelation::from(PrivateDataset::from_json(json).unwrap()));
        clean.add_map_checked(0, "C", "c").unwrap();
        clean.add_map_checked(0, "A", "a").unwrap();
        assert!(matches!(clean.add_map_checked(0, "D", "d"), Err(Error::UnknownValue(_))));
        assert!((clean.count(0, predicate::eq("a")).unwrap() - 3.).abs() < 1e-9);
    }
}
