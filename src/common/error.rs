//! Error types for parallel_rrt

use std::fmt;

/// Main error type for planning operations
#[derive(Debug)]
pub enum PlannerError {
    /// No goal region has been configured
    GoalUndefined,
    /// Every supplied start state failed bounds or validity checks
    NoValidStartStates,
    /// Invalid parameter
    InvalidParameter(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::GoalUndefined => write!(f, "Goal undefined"),
            PlannerError::NoValidStartStates => write!(f, "There are no valid initial states"),
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {}

/// Result type alias for planning operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::InvalidParameter("thread count must be positive".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid parameter: thread count must be positive"
        );
        assert_eq!(format!("{}", PlannerError::GoalUndefined), "Goal undefined");
    }
}
