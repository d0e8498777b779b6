//! Bounded real-vector configuration space
//!
//! Axis-aligned bounds, a pluggable validity predicate, and
//! interpolation-based motion checking.

use crate::common::traits::StateSpace;
use crate::common::types::State;

/// Validity predicate over states (e.g. a collision checker)
pub type ValidityFn = Box<dyn Fn(&State) -> bool + Send + Sync>;

/// An axis-aligned bounded subset of R^n
pub struct RealVectorSpace {
    bounds: Vec<(f64, f64)>,
    validity: Option<ValidityFn>,
    motion_resolution: f64,
}

impl RealVectorSpace {
    /// Create a free space (every in-bounds state is valid).
    ///
    /// The motion-checking resolution defaults to 1% of the longest
    /// component span; use `set_motion_resolution` to override it.
    pub fn new(bounds: Vec<(f64, f64)>) -> Self {
        let longest = bounds
            .iter()
            .map(|&(lo, hi)| hi - lo)
            .fold(0.0, f64::max);
        Self {
            bounds,
            validity: None,
            motion_resolution: longest * 0.01,
        }
    }

    /// Create a space with a validity predicate (e.g. a collision checker)
    pub fn with_validity<F>(bounds: Vec<(f64, f64)>, validity: F) -> Self
    where
        F: Fn(&State) -> bool + Send + Sync + 'static,
    {
        let mut space = Self::new(bounds);
        space.validity = Some(Box::new(validity));
        space
    }

    /// Set the step length used when subdividing motions for validation
    pub fn set_motion_resolution(&mut self, resolution: f64) {
        self.motion_resolution = resolution;
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }
}

impl StateSpace for RealVectorSpace {
    fn dimension(&self) -> usize {
        self.bounds.len()
    }

    fn component_range(&self, i: usize) -> (f64, f64) {
        self.bounds[i]
    }

    fn satisfies_bounds(&self, state: &State) -> bool {
        self.bounds
            .iter()
            .enumerate()
            .all(|(i, &(lo, hi))| state[i] >= lo && state[i] <= hi)
    }

    fn is_valid(&self, state: &State) -> bool {
        match &self.validity {
            Some(validity) => validity(state),
            None => true,
        }
    }

    fn check_motion(&self, from: &State, to: &State) -> bool {
        if !self.satisfies_bounds(to) || !self.is_valid(to) {
            return false;
        }
        // subdivide and validate the interior of the segment
        let steps = (self.distance(from, to) / self.motion_resolution).ceil() as usize;
        for k in 1..steps {
            let t = k as f64 / steps as f64;
            let probe = from.lerp(to, t);
            if !self.satisfies_bounds(&probe) || !self.is_valid(&probe) {
                return false;
            }
        }
        true
    }
}
