//! Error types for incremental-hyperband
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Top-level error type for scheduling operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HyperbandError {
    /// A candidate was queried at a budget it was never evaluated at
    #[error("Candidate has no performance recorded for budget {budget}")]
    BudgetNotEvaluated { budget: f64 },

    /// The external evaluator failed
    #[error("Evaluation failed: {0}")]
    EvaluationFailure(String),

    /// No candidate in a bracket's history holds a score at the maximum budget
    #[error("No candidate of bracket {bracket} reached the maximum budget {max_budget}")]
    NoCandidateReachedMaxBudget { bracket: usize, max_budget: f64 },

    /// The sampler returned the wrong number of payloads
    #[error("Sampler returned {actual} candidates, expected {expected}")]
    SamplerContract { expected: usize, actual: usize },

    /// Sampler-side failure
    #[error("Sampling failed: {0}")]
    Sampling(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Unrecognized algorithm name
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Result type alias for scheduling operations
pub type Result<T> = std::result::Result<T, HyperbandError>;
