//! Common types used throughout parallel_rrt

use itertools::Itertools;
use nalgebra::DVector;

/// A configuration-space state of fixed dimension
pub type State = DVector<f64>;

/// Path through configuration space, ordered start -> goal
#[derive(Debug, Clone)]
pub struct PlannedPath {
    pub states: Vec<State>,
}

impl PlannedPath {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    pub fn from_states(states: Vec<State>) -> Self {
        Self { states }
    }

    pub fn push(&mut self, state: State) {
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<&State> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&State> {
        self.states.last()
    }

    /// Sum of Euclidean segment lengths along the path
    pub fn length(&self) -> f64 {
        self.states
            .iter()
            .tuple_windows()
            .map(|(a, b)| (a - b).norm())
            .sum()
    }
}

impl Default for PlannedPath {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_length() {
        let path = PlannedPath::from_states(vec![
            DVector::from_vec(vec![0.0, 0.0]),
            DVector::from_vec(vec![1.0, 0.0]),
            DVector::from_vec(vec![1.0, 1.0]),
        ]);
        assert!((path.length() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_path_length() {
        let path = PlannedPath::new();
        assert!(path.is_empty());
        assert_eq!(path.length(), 0.0);
    }
}
