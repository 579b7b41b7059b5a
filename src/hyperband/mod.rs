//! Hyperband
//!
//! This module provides the orchestrator that runs a family of Successive
//! Halving brackets, its configuration and results, and the experiment driver
//! comparing incremental runs against restarts.

pub mod config;
pub mod experiment;
pub mod orchestrator;
pub mod result;

pub mod prelude {
    pub use super::config::*;
    pub use super::experiment::*;
    pub use super::orchestrator::*;
    pub use super::result::*;
}
