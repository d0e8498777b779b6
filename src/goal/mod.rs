//! Goal regions and solve-outcome feedback

use std::sync::{Arc, Mutex};

use crate::common::traits::{GoalRegion, SampleableGoalRegion, StateSampler};
use crate::common::types::{PlannedPath, State};

/// Post-solve feedback storage embedded in goal implementations.
///
/// Written by the planner after all worker threads have joined; the
/// mutex only exists so the goal can stay behind a shared reference.
#[derive(Debug)]
pub struct SolutionStore {
    inner: Mutex<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    path: Option<PlannedPath>,
    approximate: bool,
    difference: f64,
}

impl SolutionStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                path: None,
                approximate: false,
                difference: f64::INFINITY,
            }),
        }
    }

    pub fn set_difference(&self, difference: f64) {
        self.inner.lock().unwrap().difference = difference;
    }

    pub fn set_solution_path(&self, path: PlannedPath, approximate: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.path = Some(path);
        inner.approximate = approximate;
    }

    pub fn difference(&self) -> f64 {
        self.inner.lock().unwrap().difference
    }

    pub fn solution_path(&self) -> Option<PlannedPath> {
        self.inner.lock().unwrap().path.clone()
    }

    /// True only when an exact solution path has been recorded
    pub fn is_achieved(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.path.is_some() && !inner.approximate
    }
}

impl Default for SolutionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Goal configured on a planner, with its sampling capability resolved
/// once at configuration time.
#[derive(Clone)]
pub struct GoalHandle {
    region: Arc<dyn GoalRegion>,
    sampleable: Option<Arc<dyn SampleableGoalRegion>>,
}

impl GoalHandle {
    /// Wrap a goal that only supports membership and distance queries
    pub fn from_region<G: GoalRegion + 'static>(goal: G) -> Self {
        Self {
            region: Arc::new(goal),
            sampleable: None,
        }
    }

    /// Wrap a goal that also supports direct sampling
    pub fn from_sampleable<G: SampleableGoalRegion + 'static>(goal: G) -> Self {
        let goal = Arc::new(goal);
        Self {
            region: goal.clone(),
            sampleable: Some(goal),
        }
    }

    pub fn region(&self) -> &dyn GoalRegion {
        self.region.as_ref()
    }

    pub fn sampleable(&self) -> Option<&dyn SampleableGoalRegion> {
        self.sampleable.as_deref()
    }
}

/// Goal region defined by a ball around a center state.
///
/// A state satisfies the goal when its Euclidean distance to the center
/// is at most the radius. Supports direct sampling, so planners can
/// goal-bias toward it.
pub struct BallGoal {
    center: State,
    radius: f64,
    store: SolutionStore,
}

impl BallGoal {
    pub fn new(center: State, radius: f64) -> Self {
        Self {
            center,
            radius,
            store: SolutionStore::new(),
        }
    }

    pub fn center(&self) -> &State {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl GoalRegion for BallGoal {
    fn is_satisfied(&self, state: &State) -> (bool, f64) {
        let distance = (state - &self.center).norm();
        (distance <= self.radius, distance)
    }

    fn store(&self) -> &SolutionStore {
        &self.store
    }
}

impl SampleableGoalRegion for BallGoal {
    fn sample_goal(&self, sampler: &mut dyn StateSampler, out: &mut State) {
        // rejection-sample the ball from its bounding box; acceptance
        // shrinks with dimension, which is fine for the low-dimensional
        // spaces this goal is used with
        loop {
            for i in 0..self.center.len() {
                out[i] = self.center[i] + (2.0 * sampler.uniform01() - 1.0) * self.radius;
            }
            if (&*out - &self.center).norm() <= self.radius {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::UniformSampler;
    use crate::space::RealVectorSpace;
    use nalgebra::DVector;

    #[test]
    fn test_ball_goal_membership() {
        let goal = BallGoal::new(DVector::from_vec(vec![1.0, 1.0]), 0.1);
        let (hit, d) = goal.is_satisfied(&DVector::from_vec(vec![1.0, 1.05]));
        assert!(hit);
        assert!((d - 0.05).abs() < 1e-10);
        let (miss, d) = goal.is_satisfied(&DVector::from_vec(vec![0.0, 0.0]));
        assert!(!miss);
        assert!((d - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_ball_goal_samples_inside() {
        let space = RealVectorSpace::new(vec![(0.0, 2.0), (0.0, 2.0)]);
        let mut sampler = UniformSampler::seeded(&space, 5);
        let goal = BallGoal::new(DVector::from_vec(vec![1.0, 1.0]), 0.25);
        let mut state = DVector::zeros(2);
        for _ in 0..50 {
            goal.sample_goal(&mut sampler, &mut state);
            let (inside, _) = goal.is_satisfied(&state);
            assert!(inside);
        }
    }

    #[test]
    fn test_store_achievement() {
        let goal = BallGoal::new(DVector::from_vec(vec![0.0]), 1.0);
        assert!(!goal.is_achieved());
        goal.set_solution_path(PlannedPath::new(), true);
        assert!(!goal.is_achieved());
        goal.set_solution_path(PlannedPath::new(), false);
        assert!(goal.is_achieved());
    }

    #[test]
    fn test_store_difference_starts_infinite() {
        let goal = BallGoal::new(DVector::from_vec(vec![0.0]), 1.0);
        assert!(goal.difference().is_infinite());
        goal.set_difference(0.5);
        assert!((goal.difference() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_goal_handle_capability_tiers() {
        let sampleable = GoalHandle::from_sampleable(BallGoal::new(DVector::zeros(2), 1.0));
        assert!(sampleable.sampleable().is_some());
        let plain = GoalHandle::from_region(BallGoal::new(DVector::zeros(2), 1.0));
        assert!(plain.sampleable().is_none());
    }
}
