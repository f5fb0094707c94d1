//! # PrivateClean
//! Debiased aggregate queries over a randomized relation, with a cleaning layer on top
//!
//! ## Randomization
//! A `Relation` of categorical and numerical columns is randomized once:
//! each categorical value is replaced, with probability `p`, by a value drawn uniformly from its column domain,
//! and each numerical value gets additive Laplace noise of scale `b`.
//! The result is a `PrivateDataset` that can be persisted and shared instead of the original data.
//!
//! ## Estimation
//! A `PrivateRelation` answers COUNT, SUM and AVERAGE queries with a predicate on a categorical column.
//! Knowing `p` and the domains, the mixing due to randomization is inverted so that the estimates are unbiased.
//!
//! ## Cleaning
//! A `CleanPrivateRelation` lets the analyst map clean labels to the dirty values found in the data
//! and write predicates with the clean labels. The private data is never touched.
//!
//! ```
//! use privateclean::{predicate, CleanPrivateRelation, Estimator, PrivateRelation, Relation};
//!
//! let rows: Vec<Vec<String>> = vec![
//!     vec!["1".into(), "A".into()],
//!     vec!["2".into(), "B".into()],
//!     vec!["3".into(), "A".into()],
//! ];
//! let relation = Relation::new(&rows).unwrap();
//! let private = PrivateRelation::from(relation.privatize(0., 0.).unwrap());
//! assert_eq!(private.count(1, predicate::eq("A")).unwrap(), 2.);
//!
//! let clean = CleanPrivateRelation::new(&private);
//! clean.add_map(1, "A", "Self-emp").unwrap();
//! assert_eq!(clean.count(1, predicate::eq("Self-emp")).unwrap(), 2.);
//! ```
//!

pub mod cleaning;
pub mod data_type;
pub mod estimator;
pub mod io;
pub mod predicate;
pub mod randomization;
pub mod relation;
pub mod setup;

pub use cleaning::CleanPrivateRelation;
pub use data_type::{ColumnType, TypeInference, Value};
pub use estimator::{Estimator, PrivateRelation};
pub use io::PrivateDataset;
pub use randomization::PrivateParams;
pub use relation::{Domain, Relation};
