//! State samplers
//!
//! One sampler instance is owned by each worker thread, so none of the
//! implementations here take locks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::common::error::{PlannerError, PlannerResult};
use crate::common::traits::{StateSampler, StateSpace};
use crate::common::types::State;

/// Uniform sampler over the bounds of a state space
pub struct UniformSampler {
    bounds: Vec<(f64, f64)>,
    rng: StdRng,
}

impl UniformSampler {
    pub fn new(space: &dyn StateSpace) -> Self {
        Self::with_rng(space, StdRng::from_entropy())
    }

    /// Deterministic sampler for reproducible runs
    pub fn seeded(space: &dyn StateSpace, seed: u64) -> Self {
        Self::with_rng(space, StdRng::seed_from_u64(seed))
    }

    fn with_rng(space: &dyn StateSpace, rng: StdRng) -> Self {
        let bounds = (0..space.dimension())
            .map(|i| space.component_range(i))
            .collect();
        Self { bounds, rng }
    }
}

impl StateSampler for UniformSampler {
    fn sample(&mut self, out: &mut State) {
        for (i, &(lo, hi)) in self.bounds.iter().enumerate() {
            out[i] = self.rng.gen_range(lo..hi);
        }
    }

    fn uniform01(&mut self) -> f64 {
        self.rng.gen()
    }
}

/// Gaussian sampler focused around a mean state, clamped to bounds.
///
/// Useful when planning effort should concentrate near a known corridor
/// or previous solution.
pub struct GaussianSampler {
    bounds: Vec<(f64, f64)>,
    mean: State,
    normal: Normal<f64>,
    rng: StdRng,
}

impl GaussianSampler {
    pub fn new(space: &dyn StateSpace, mean: State, stddev: f64) -> PlannerResult<Self> {
        Self::with_rng(space, mean, stddev, StdRng::from_entropy())
    }

    pub fn seeded(
        space: &dyn StateSpace,
        mean: State,
        stddev: f64,
        seed: u64,
    ) -> PlannerResult<Self> {
        Self::with_rng(space, mean, stddev, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        space: &dyn StateSpace,
        mean: State,
        stddev: f64,
        rng: StdRng,
    ) -> PlannerResult<Self> {
        if mean.len() != space.dimension() {
            return Err(PlannerError::InvalidParameter(
                "mean state dimension does not match the space".to_string(),
            ));
        }
        let normal = Normal::new(0.0, stddev).map_err(|e| {
            PlannerError::InvalidParameter(format!("invalid standard deviation: {}", e))
        })?;
        let bounds = (0..space.dimension())
            .map(|i| space.component_range(i))
            .collect();
        Ok(Self {
            bounds,
            mean,
            normal,
            rng,
        })
    }
}

impl StateSampler for GaussianSampler {
    fn sample(&mut self, out: &mut State) {
        for (i, &(lo, hi)) in self.bounds.iter().enumerate() {
            let v = self.mean[i] + self.normal.sample(&mut self.rng);
            out[i] = v.clamp(lo, hi);
        }
    }

    fn uniform01(&mut self) -> f64 {
        self.rng.gen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::RealVectorSpace;
    use nalgebra::DVector;

    #[test]
    fn test_uniform_sampler_stays_in_bounds() {
        let space = RealVectorSpace::new(vec![(-1.0, 2.0), (3.0, 4.0)]);
        let mut sampler = UniformSampler::seeded(&space, 7);
        let mut state = DVector::zeros(2);
        for _ in 0..100 {
            sampler.sample(&mut state);
            assert!(space.satisfies_bounds(&state));
        }
    }

    #[test]
    fn test_uniform01_range() {
        let space = RealVectorSpace::new(vec![(0.0, 1.0)]);
        let mut sampler = UniformSampler::seeded(&space, 11);
        for _ in 0..100 {
            let u = sampler.uniform01();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_seeded_samplers_reproduce() {
        let space = RealVectorSpace::new(vec![(0.0, 1.0), (0.0, 1.0)]);
        let mut a = UniformSampler::seeded(&space, 42);
        let mut b = UniformSampler::seeded(&space, 42);
        let mut sa = DVector::zeros(2);
        let mut sb = DVector::zeros(2);
        for _ in 0..10 {
            a.sample(&mut sa);
            b.sample(&mut sb);
            assert_eq!(sa, sb);
        }
    }

    #[test]
    fn test_gaussian_sampler_clamps_to_bounds() {
        let space = RealVectorSpace::new(vec![(0.0, 1.0), (0.0, 1.0)]);
        let mean = DVector::from_vec(vec![0.9, 0.9]);
        let mut sampler = GaussianSampler::seeded(&space, mean, 0.5, 3).unwrap();
        let mut state = DVector::zeros(2);
        for _ in 0..100 {
            sampler.sample(&mut state);
            assert!(space.satisfies_bounds(&state));
        }
    }

    #[test]
    fn test_gaussian_sampler_rejects_bad_stddev() {
        let space = RealVectorSpace::new(vec![(0.0, 1.0)]);
        let mean = DVector::from_vec(vec![0.5]);
        assert!(GaussianSampler::seeded(&space, mean, -1.0, 0).is_err());
    }
}
