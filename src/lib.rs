//! parallel_rrt - multithreaded sampling-based motion planning
//!
//! This crate provides a parallel Rapidly-exploring Random Tree (pRRT)
//! planner that grows a single shared search tree from several worker
//! threads at once, together with the configuration-space, sampling,
//! goal and nearest-neighbor building blocks it plans over.

// Core modules
pub mod common;

// Collaborator implementations
pub mod space;
pub mod sampling;
pub mod goal;
pub mod nearest;

// Planner modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{PlannedPath, State};
pub use common::{GoalRegion, NearestNeighbors, SampleableGoalRegion, StateSampler, StateSpace};
pub use common::{PlannerError, PlannerResult};
pub use goal::{BallGoal, GoalHandle, SolutionStore};
pub use nearest::LinearNearestNeighbors;
pub use path_planning::{ParallelRrt, PrrtConfig};
pub use sampling::{GaussianSampler, UniformSampler};
pub use space::RealVectorSpace;
