//! Candidate sampling
//!
//! This module provides the sampler abstraction, per-bracket seed derivation
//! and reference samplers over box-shaped search spaces.

pub mod seed;
pub mod space;
pub mod traits;

pub mod prelude {
    pub use super::seed::*;
    pub use super::space::*;
    pub use super::traits::*;
}
