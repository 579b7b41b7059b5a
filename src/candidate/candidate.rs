//! Candidate wrapper type
//!
//! This module provides the Candidate type that wraps an opaque payload with the
//! performances it was measured at for each evaluation budget.

use serde::{Deserialize, Serialize};

use crate::error::{HyperbandError, Result};

/// A candidate configuration under evaluation
///
/// The payload is never inspected by the scheduler. Performances are keyed by
/// the exact budget they were evaluated at, and a recorded budget is never
/// overwritten.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate<P> {
    /// The opaque configuration
    pub payload: P,
    /// Recorded (budget, performance) pairs in ascending budget order
    performances: Vec<(f64, f64)>,
    /// Hyperband run during which this candidate was sampled
    pub birth_run: usize,
}

impl<P> Candidate<P> {
    /// Create a new candidate with no recorded performances
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            performances: Vec::new(),
            birth_run: 0,
        }
    }

    /// Create a new candidate tagged with the run that sampled it
    pub fn with_birth_run(payload: P, run: usize) -> Self {
        Self {
            payload,
            performances: Vec::new(),
            birth_run: run,
        }
    }

    /// Record the performance measured at `budget`
    ///
    /// Storing at a budget that already holds a score keeps the first value.
    pub fn store_performance(&mut self, budget: f64, performance: f64) {
        match self
            .performances
            .binary_search_by(|(b, _)| b.total_cmp(&budget))
        {
            Ok(_) => {}
            Err(pos) => self.performances.insert(pos, (budget, performance)),
        }
    }

    /// Get the performance measured at `budget`
    pub fn performance(&self, budget: f64) -> Result<f64> {
        self.get_performance(budget)
            .ok_or(HyperbandError::BudgetNotEvaluated { budget })
    }

    /// Get the performance measured at `budget`, if any
    pub fn get_performance(&self, budget: f64) -> Option<f64> {
        self.performances
            .binary_search_by(|(b, _)| b.total_cmp(&budget))
            .ok()
            .map(|pos| self.performances[pos].1)
    }

    /// Check whether a performance was recorded at `budget`
    pub fn has_performance(&self, budget: f64) -> bool {
        self.get_performance(budget).is_some()
    }

    /// Budgets this candidate has been evaluated at, ascending
    pub fn evaluated_budgets(&self) -> impl Iterator<Item = f64> + '_ {
        self.performances.iter().map(|(b, _)| *b)
    }

    /// All recorded (budget, performance) pairs, ascending by budget
    pub fn performances(&self) -> &[(f64, f64)] {
        &self.performances
    }

    /// Highest budget this candidate has been evaluated at
    pub fn highest_budget(&self) -> Option<f64> {
        self.performances.last().map(|(b, _)| *b)
    }

    /// Get a reference to the payload
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Take the payload out of this candidate
    pub fn into_payload(self) -> P {
        self.payload
    }
}
