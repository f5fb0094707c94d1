use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// The randomization parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrivateParams {
    /// Probability to replace a categorical value by a random value of its domain
    p: f64,
    /// Scale of the Laplace noise added to numerical values
    b: f64,
}

impl PrivateParams {
    pub fn new(p: f64, b: f64) -> Result<PrivateParams> {
        if !(0. ..=1.).contains(&p) {
            return Err(Error::invalid_parameter(format!("p = {p} should be in [0, 1]")));
        }
        if !b.is_finite() || b < 0. {
            return Err(Error::invalid_parameter(format!(
                "b = {b} should be a finite non-negative scale"
            )));
        }
        if b == 0. {
            log::warn!("b = 0, numerical values will not be randomized");
        }
        if p == 1. {
            log::warn!("p = 1, no categorical estimate will be possible");
        }
        Ok(PrivateParams { p, b })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn b(&self) -> f64 {
        self.b
    }
}
