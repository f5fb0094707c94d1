use std::fmt;

use super::{Error, Result};

/// Randomized-response rates of a predicate
///
/// - `tp`: probability that a row truly satisfying the predicate is observed satisfying it
/// - `tn`: probability that a row truly not satisfying the predicate is observed satisfying it
///
/// A row keeps its value with probability `1 - p` and is otherwise redrawn uniformly from
/// the `size` values of the domain, `selected` of which satisfy the predicate.
/// Hence `tn = p selected / size` and `tp = 1 - p + tn`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rates {
    tn: f64,
    tp: f64,
}

impl Rates {
    /// Below this gap between `tp` and `tn` the mixing cannot be inverted
    pub const MIN_GAP: f64 = 1e-9;

    pub fn new(p: f64, selected: usize, size: usize) -> Result<Rates> {
        if size == 0 {
            return Err(Error::degenerate_estimate("the domain is empty"));
        }
        let tn = p * selected as f64 / size as f64;
        let tp = (1. - p) + tn;
        if (tp - tn).abs() < Rates::MIN_GAP {
            return Err(Error::degenerate_estimate(format!(
                "tp = {tp} and tn = {tn} are too close for p = {p}, {selected} selected out of {size}"
            )));
        }
        Ok(Rates { tn, tp })
    }

    pub fn tn(&self) -> f64 {
        self.tn
    }

    pub fn tp(&self) -> f64 {
        self.tp
    }

    /// Invert `positives = count tp + (rows - count) tn`
    pub fn count(&self, positives: f64, rows: f64) -> f64 {
        (positives - rows * self.tn) / (self.tp - self.tn)
    }

    /// Remove the expected cross-contamination between the sums in and out of the predicate
    pub fn sum(&self, positives: f64, negatives: f64) -> f64 {
        ((1. - self.tn) * positives - self.tn * negatives) / (self.tp - self.tn)
    }
}

impl fmt::Display for Rates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tp = {}, tn = {}", self.tp, self.tn)
    }
}
