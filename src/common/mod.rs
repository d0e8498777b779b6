//! Common types, traits, and error definitions for parallel_rrt
//!
//! This module provides the foundational building blocks shared by the
//! planner core and its collaborator implementations.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
