//! Nearest-neighbor indices over tree nodes

use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::common::traits::{NearestNeighbors, StateSpace};
use crate::common::types::State;

/// Exhaustive-scan nearest-neighbor index.
///
/// O(n) per query, which is adequate for the tree sizes reached within
/// typical time budgets; swap in a spatial structure through the
/// `NearestNeighbors` trait when profiling says otherwise.
pub struct LinearNearestNeighbors {
    space: Arc<dyn StateSpace>,
    entries: Vec<(usize, State)>,
}

impl LinearNearestNeighbors {
    pub fn new(space: Arc<dyn StateSpace>) -> Self {
        Self {
            space,
            entries: Vec::new(),
        }
    }
}

impl NearestNeighbors for LinearNearestNeighbors {
    fn add(&mut self, id: usize, state: State) {
        self.entries.push((id, state));
    }

    fn nearest(&self, query: &State) -> Option<usize> {
        self.entries
            .iter()
            .min_by_key(|(_, state)| OrderedFloat(self.space.distance(state, query)))
            .map(|(id, _)| *id)
    }

    fn size(&self) -> usize {
        self.entries.len()
    }

    fn list(&self) -> Vec<usize> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::RealVectorSpace;
    use nalgebra::DVector;

    fn index() -> LinearNearestNeighbors {
        let space = Arc::new(RealVectorSpace::new(vec![(0.0, 10.0), (0.0, 10.0)]));
        LinearNearestNeighbors::new(space)
    }

    #[test]
    fn test_empty_index_has_no_nearest() {
        let nn = index();
        assert_eq!(nn.size(), 0);
        assert!(nn.nearest(&DVector::from_vec(vec![1.0, 1.0])).is_none());
    }

    #[test]
    fn test_nearest_picks_closest() {
        let mut nn = index();
        nn.add(0, DVector::from_vec(vec![0.0, 0.0]));
        nn.add(1, DVector::from_vec(vec![5.0, 5.0]));
        nn.add(2, DVector::from_vec(vec![9.0, 9.0]));
        assert_eq!(nn.nearest(&DVector::from_vec(vec![4.0, 4.5])), Some(1));
        assert_eq!(nn.nearest(&DVector::from_vec(vec![0.5, 0.0])), Some(0));
        assert_eq!(nn.size(), 3);
        assert_eq!(nn.list(), vec![0, 1, 2]);
    }

    #[test]
    fn test_clear_empties_index() {
        let mut nn = index();
        nn.add(0, DVector::from_vec(vec![1.0, 1.0]));
        nn.clear();
        assert_eq!(nn.size(), 0);
        assert!(nn.list().is_empty());
    }
}
