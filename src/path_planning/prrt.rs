//! Parallel RRT (pRRT) motion planner
//!
//! Grows a single shared random tree from several worker threads at
//! once. Each worker repeats a sample -> nearest -> steer -> validate ->
//! insert -> goal-check cycle until the wall-clock deadline passes or
//! some thread records an exact solution. The tree and the incumbent
//! solution are the only shared mutable state; each is behind its own
//! mutex, held only for the duration of the index or bookkeeping
//! operation itself.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use nalgebra::DVector;

use crate::common::error::{PlannerError, PlannerResult};
use crate::common::traits::{NearestNeighbors, StateSampler, StateSpace};
use crate::common::types::{PlannedPath, State};
use crate::goal::GoalHandle;
use crate::nearest::LinearNearestNeighbors;
use crate::sampling::UniformSampler;

/// Node of the search tree
#[derive(Debug, Clone)]
pub struct Motion {
    pub state: State,
    /// Arena id of the node this motion extends from; None for roots
    pub parent: Option<usize>,
}

impl Motion {
    /// A parentless motion with a zeroed state of the given dimension
    pub fn new(dim: usize) -> Self {
        Self {
            state: DVector::zeros(dim),
            parent: None,
        }
    }
}

/// Motion arena plus spatial index behind one lock.
///
/// Nodes are append-only and referenced by stable arena index, so parent
/// links can never dangle and the whole tree is freed in one pass.
struct SharedTree {
    inner: Mutex<TreeInner>,
}

struct TreeInner {
    motions: Vec<Motion>,
    index: Box<dyn NearestNeighbors>,
}

impl SharedTree {
    fn new(index: Box<dyn NearestNeighbors>) -> Self {
        Self {
            inner: Mutex::new(TreeInner {
                motions: Vec::new(),
                index,
            }),
        }
    }

    /// Insert a state whose parent is already in the tree; returns the
    /// arena id of the new node
    fn insert(&self, state: State, parent: Option<usize>) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.motions.len();
        inner.index.add(id, state.clone());
        inner.motions.push(Motion { state, parent });
        id
    }

    /// Nearest node to `query`: its arena id and a copy of its state.
    /// The copy lets callers steer and validate without holding the lock.
    fn nearest(&self, query: &State) -> Option<(usize, State)> {
        let inner = self.inner.lock().unwrap();
        inner
            .index
            .nearest(query)
            .map(|id| (id, inner.motions[id].state.clone()))
    }

    fn size(&self) -> usize {
        self.inner.lock().unwrap().index.size()
    }

    /// Copies of all stored states, in insertion order
    fn states(&self) -> Vec<State> {
        let inner = self.inner.lock().unwrap();
        inner
            .index
            .list()
            .iter()
            .map(|&id| inner.motions[id].state.clone())
            .collect()
    }

    /// States from the tree root to `id`, root first
    fn path_states(&self, id: usize) -> Vec<State> {
        let inner = self.inner.lock().unwrap();
        let mut states = Vec::new();
        let mut current = Some(id);
        while let Some(i) = current {
            states.push(inner.motions[i].state.clone());
            current = inner.motions[i].parent;
        }
        states.reverse();
        states
    }

    fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.motions.clear();
        inner.index.clear();
    }
}

/// Best solution found so far across all worker threads.
///
/// `record_exact` always takes the lock; `try_improve_approx` compares
/// against an atomic mirror of the best distance first so the common
/// non-improving case stays lock-free.
struct SolutionInfo {
    best: Mutex<Incumbent>,
    /// Bit pattern of the best distance, for the unlocked fast path
    best_dist_bits: AtomicU64,
    /// Set once an exact solution is recorded; polled by loop heads
    exact_found: AtomicBool,
}

struct Incumbent {
    exact: Option<usize>,
    approx: Option<usize>,
    difference: f64,
}

impl SolutionInfo {
    fn new() -> Self {
        Self {
            best: Mutex::new(Incumbent {
                exact: None,
                approx: None,
                difference: f64::INFINITY,
            }),
            best_dist_bits: AtomicU64::new(f64::INFINITY.to_bits()),
            exact_found: AtomicBool::new(false),
        }
    }

    fn exact_found(&self) -> bool {
        self.exact_found.load(Ordering::Acquire)
    }

    /// Record an exact solution. Unconditional: any exact solution is
    /// acceptable, so a late second finder simply overwrites the first.
    fn record_exact(&self, id: usize, distance: f64) {
        let mut best = self.best.lock().unwrap();
        best.exact = Some(id);
        best.difference = distance;
        self.best_dist_bits
            .store(distance.to_bits(), Ordering::Release);
        self.exact_found.store(true, Ordering::Release);
    }

    /// Record an approximate solution if it strictly improves on the
    /// best distance seen so far. Double-checked: the unlocked
    /// comparison filters non-improvements, the locked one prevents
    /// lost updates between racing improvers.
    fn try_improve_approx(&self, id: usize, distance: f64) -> bool {
        if distance >= f64::from_bits(self.best_dist_bits.load(Ordering::Acquire)) {
            return false;
        }
        let mut best = self.best.lock().unwrap();
        if distance < best.difference {
            best.approx = Some(id);
            best.difference = distance;
            self.best_dist_bits
                .store(distance.to_bits(), Ordering::Release);
            true
        } else {
            false
        }
    }

    fn into_incumbent(self) -> Incumbent {
        self.best.into_inner().unwrap()
    }
}

/// State shared read-only (or through internal locks) by all workers of
/// one solve call
struct WorkerShared<'a> {
    space: &'a dyn StateSpace,
    goal: &'a GoalHandle,
    tree: &'a SharedTree,
    solution: &'a SolutionInfo,
    deadline: Instant,
    goal_bias: f64,
    rho: f64,
}

/// One worker's extension loop.
///
/// Termination is checked at the loop head only: a worker that is
/// mid-iteration when another thread records an exact solution finishes
/// that iteration before stopping. The bounded overrun is intentional;
/// eager cancellation would buy nothing but timing jitter.
fn extend_loop(shared: &WorkerShared<'_>, sampler: &mut dyn StateSampler) {
    let dim = shared.space.dimension();

    // per-coordinate maximum step
    let range: Vec<f64> = (0..dim)
        .map(|i| {
            let (lo, hi) = shared.space.component_range(i);
            shared.rho * (hi - lo)
        })
        .collect();

    // thread-private scratch states, reused across iterations
    let mut rstate: State = DVector::zeros(dim);
    let mut xstate: State = DVector::zeros(dim);

    while !shared.solution.exact_found() && Instant::now() < shared.deadline {
        // sample a candidate, goal-biased when the goal supports it
        let mut sampled_goal = false;
        if let Some(goal_s) = shared.goal.sampleable() {
            if sampler.uniform01() < shared.goal_bias {
                goal_s.sample_goal(sampler, &mut rstate);
                sampled_goal = true;
            }
        }
        if !sampled_goal {
            sampler.sample(&mut rstate);
        }

        // closest existing node to the candidate
        let (nearest_id, nearest_state) = shared
            .tree
            .nearest(&rstate)
            .expect("tree is seeded before workers launch");

        // steer from the nearest node toward the candidate, clamping
        // the advance per coordinate
        for i in 0..dim {
            let diff = rstate[i] - nearest_state[i];
            xstate[i] = if diff.abs() < range[i] {
                rstate[i]
            } else {
                nearest_state[i] + diff * shared.rho
            };
        }

        if !shared.space.check_motion(&nearest_state, &xstate) {
            continue;
        }

        let id = shared.tree.insert(xstate.clone(), Some(nearest_id));

        let (solved, distance) = shared.goal.region().is_satisfied(&xstate);
        if solved {
            shared.solution.record_exact(id, distance);
            break;
        }
        shared.solution.try_improve_approx(id, distance);
    }
}

/// Planner configuration
#[derive(Debug, Clone)]
pub struct PrrtConfig {
    /// Probability of sampling the goal region directly, in [0, 1]
    pub goal_bias: f64,
    /// Maximum step size as a fraction of each dimension's value range
    pub rho: f64,
    /// Number of worker threads
    pub thread_count: usize,
    /// Base seed for the per-thread samplers; None draws from entropy.
    /// Seeding makes sampling reproducible, but thread scheduling still
    /// makes tree growth nondeterministic run to run.
    pub seed: Option<u64>,
}

impl Default for PrrtConfig {
    fn default() -> Self {
        Self {
            goal_bias: 0.05,
            rho: 0.5,
            thread_count: 2,
            seed: None,
        }
    }
}

/// Parallel RRT planner
pub struct ParallelRrt {
    space: Arc<dyn StateSpace>,
    goal: Option<GoalHandle>,
    start_states: Vec<State>,
    /// How many of `start_states` have been seeded into the tree;
    /// states added after a solve are picked up by the next solve
    added_start_states: usize,
    tree: SharedTree,
    samplers: Vec<Box<dyn StateSampler>>,
    config: PrrtConfig,
}

impl ParallelRrt {
    pub fn new(space: Arc<dyn StateSpace>, config: PrrtConfig) -> PlannerResult<Self> {
        if config.thread_count == 0 {
            return Err(PlannerError::InvalidParameter(
                "thread count must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&config.goal_bias) {
            return Err(PlannerError::InvalidParameter(
                "goal bias must lie in [0, 1]".to_string(),
            ));
        }
        if config.rho <= 0.0 {
            return Err(PlannerError::InvalidParameter(
                "step fraction rho must be positive".to_string(),
            ));
        }
        let tree = SharedTree::new(Box::new(LinearNearestNeighbors::new(space.clone())));
        let mut planner = Self {
            space,
            goal: None,
            start_states: Vec::new(),
            added_start_states: 0,
            tree,
            samplers: Vec::new(),
            config,
        };
        planner.allocate_samplers();
        Ok(planner)
    }

    fn allocate_samplers(&mut self) {
        self.samplers = (0..self.config.thread_count)
            .map(|tid| {
                let sampler: Box<dyn StateSampler> = match self.config.seed {
                    Some(seed) => Box::new(UniformSampler::seeded(
                        self.space.as_ref(),
                        seed.wrapping_add(tid as u64),
                    )),
                    None => Box::new(UniformSampler::new(self.space.as_ref())),
                };
                sampler
            })
            .collect();
    }

    pub fn set_goal(&mut self, goal: GoalHandle) {
        self.goal = Some(goal);
    }

    pub fn add_start_state(&mut self, state: State) {
        self.start_states.push(state);
    }

    /// Set the number of worker threads; resizes the sampler pool.
    /// Must be called before `solve`.
    pub fn set_thread_count(&mut self, thread_count: usize) -> PlannerResult<()> {
        if thread_count == 0 {
            return Err(PlannerError::InvalidParameter(
                "thread count must be positive".to_string(),
            ));
        }
        self.config.thread_count = thread_count;
        self.allocate_samplers();
        Ok(())
    }

    /// Replace the per-thread sampler pool; the pool size becomes the
    /// thread count
    pub fn set_samplers(&mut self, samplers: Vec<Box<dyn StateSampler>>) -> PlannerResult<()> {
        if samplers.is_empty() {
            return Err(PlannerError::InvalidParameter(
                "at least one sampler is required".to_string(),
            ));
        }
        self.config.thread_count = samplers.len();
        self.samplers = samplers;
        Ok(())
    }

    /// Replace the nearest-neighbor index. Discards the current tree, so
    /// call it before adding start states or solving.
    pub fn set_nearest_index(&mut self, index: Box<dyn NearestNeighbors>) {
        self.tree = SharedTree::new(index);
        self.added_start_states = 0;
    }

    /// Discard the search tree; configuration and start states are kept
    /// and the next `solve` reseeds from scratch
    pub fn clear(&mut self) {
        self.tree.clear();
        self.added_start_states = 0;
    }

    /// Search for a path from the start states to the goal region within
    /// `time_budget` of wall-clock time.
    ///
    /// Returns whether the goal was achieved exactly. An approximate
    /// solution (the tree node closest to the goal) is still published
    /// through the goal's feedback surface when no exact one was found.
    pub fn solve(&mut self, time_budget: Duration) -> PlannerResult<bool> {
        let goal = match &self.goal {
            Some(goal) => goal,
            None => {
                error!("goal undefined");
                return Err(PlannerError::GoalUndefined);
            }
        };

        let deadline = Instant::now() + time_budget;

        // seed start states not yet in the tree
        while self.added_start_states < self.start_states.len() {
            let state = &self.start_states[self.added_start_states];
            if self.space.satisfies_bounds(state) && self.space.is_valid(state) {
                self.tree.insert(state.clone(), None);
            } else {
                error!(
                    "start state {} is invalid, skipping it",
                    self.added_start_states
                );
            }
            self.added_start_states += 1;
        }

        if self.tree.size() == 0 {
            error!("there are no valid initial states");
            return Err(PlannerError::NoValidStartStates);
        }

        info!("starting with {} states", self.tree.size());

        let solution = SolutionInfo::new();
        let samplers = &mut self.samplers;
        let shared = WorkerShared {
            space: self.space.as_ref(),
            goal,
            tree: &self.tree,
            solution: &solution,
            deadline,
            goal_bias: self.config.goal_bias,
            rho: self.config.rho,
        };

        // one worker per sampler; scope joins them all before returning
        thread::scope(|scope| {
            let shared = &shared;
            for sampler in samplers.iter_mut() {
                scope.spawn(move || extend_loop(shared, sampler.as_mut()));
            }
        });

        let incumbent = solution.into_incumbent();
        let (solution_id, approximate) = match incumbent.exact {
            Some(id) => (Some(id), false),
            None => (incumbent.approx, true),
        };

        if let Some(id) = solution_id {
            let path = PlannedPath::from_states(self.tree.path_states(id));
            goal.region().set_difference(incumbent.difference);
            goal.region().set_solution_path(path, approximate);
            if approximate {
                warn!(
                    "found approximate solution, distance to goal {:.6}",
                    incumbent.difference
                );
            }
        }

        info!("created {} states", self.tree.size());

        Ok(goal.region().is_achieved())
    }

    /// Snapshot of every state currently stored in the tree
    pub fn get_states(&self) -> Vec<State> {
        self.tree.states()
    }
}
