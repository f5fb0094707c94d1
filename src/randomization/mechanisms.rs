//! The two randomization mechanisms
//!
//! - Randomized response on categorical values
//! - Additive Laplace noise on numerical values
//!

use rand::{distributions::Distribution, Rng};
use statrs::distribution::Laplace;

use super::{Error, PrivateParams, Result};
use crate::{data_type::Value, relation::Domain};

/// Randomized response: with probability `p` a value is replaced by a uniform draw from the domain
#[derive(Clone, Debug)]
pub struct RandomizedResponse<'a> {
    p: f64,
    domain: &'a Domain,
}

impl<'a> RandomizedResponse<'a> {
    /// `p` comes from validated parameters so that it is always a probability
    pub fn new(params: &PrivateParams, domain: &'a Domain) -> RandomizedResponse<'a> {
        RandomizedResponse {
            p: params.p(),
            domain,
        }
    }

    pub fn randomize<R: Rng>(&self, value: &Value, rng: &mut R) -> Value {
        if self.domain.is_empty() || !rng.gen_bool(self.p) {
            value.clone()
        } else {
            self.domain[rng.gen_range(0..self.domain.len())].clone()
        }
    }
}

/// Zero-mean Laplace noise with scale `b`, no noise at all when `b = 0`
#[derive(Clone, Debug)]
pub struct LaplaceNoise(Option<Laplace>);

impl LaplaceNoise {
    pub fn new(b: f64) -> Result<LaplaceNoise> {
        if b == 0. {
            Ok(LaplaceNoise(None))
        } else {
            Laplace::new(0., b)
                .map(|laplace| LaplaceNoise(Some(laplace)))
                .map_err(|err| Error::invalid_parameter(format!("b = {b}: {err}")))
        }
    }

    pub fn randomize<R: Rng>(&self, value: f64, rng: &mut R) -> f64 {
        match &self.0 {
            Some(laplace) => value + laplace.sample(rng),
            None => value,
        }
    }
}
