//! Candidate management
//!
//! This module provides the candidate record threaded through every bracket.

#[allow(clippy::module_inception)]
pub mod candidate;

pub mod prelude {
    pub use super::candidate::*;
}
