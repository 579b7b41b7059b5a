//! Candidate evaluation
//!
//! This module provides the evaluator abstraction, the budget-tracking wrapper
//! and multi-fidelity benchmark objectives.

pub mod benchmarks;
pub mod tracking;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::*;
    pub use super::tracking::*;
    pub use super::traits::*;
}
