//! Successive Halving
//!
//! This module provides bracket state and the two promotion policies that
//! drive a bracket rung by rung.

pub mod bracket;
pub mod conservative;
pub mod efficient;
pub mod policy;
pub mod traits;

pub mod prelude {
    pub use super::bracket::*;
    pub use super::conservative::*;
    pub use super::efficient::*;
    pub use super::policy::*;
    pub use super::traits::{Payload, PromotionPolicy, RunContext};
}
