//! Run results
//!
//! This module provides the outcome of one `Hyperband::hyperband` call and a
//! per-bracket breakdown of where the budget went.

use serde::{Deserialize, Serialize};

use crate::candidate::candidate::Candidate;

/// What one bracket contributed to a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketReport {
    /// Position in the bracket list
    pub index: usize,
    /// Aggressiveness at the time of the run
    pub s: usize,
    /// Budget of rung 0
    pub min_budget: f64,
    /// Budget of the last rung
    pub max_budget: f64,
    /// Fresh payloads requested from the sampler
    pub sampled: usize,
    /// History size after the run
    pub history_len: usize,
    /// Performance of the bracket's best candidate at `max_budget`
    pub best_performance: f64,
    /// Evaluator invocations made by this bracket
    pub evaluations: usize,
    /// Budget charged by this bracket
    pub budget_spent: f64,
}

/// Result of a Hyperband run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "P: Serialize", deserialize = "P: Deserialize<'de>"))]
pub struct HyperbandResult<P> {
    /// Incumbent: the best candidate across all brackets
    pub best: Candidate<P>,
    /// Performance of the incumbent at the maximum budget
    pub best_performance: f64,
    /// Bracket that produced the incumbent
    pub best_bracket: usize,
    /// Maximum budget of the run
    pub max_budget: f64,
    /// Evaluator invocations since the tracker was created
    pub evaluations: usize,
    /// Budget accumulated since the tracker was created or last reset
    pub accumulated_budget: f64,
    /// Per-bracket breakdown, in bracket order
    pub brackets: Vec<BracketReport>,
    /// Zero-based counter of `hyperband` calls on the orchestrator
    pub run: usize,
    /// Wall-clock duration of the run
    pub runtime_ms: u128,
}

impl<P> HyperbandResult<P> {
    /// Payload of the incumbent
    pub fn best_payload(&self) -> &P {
        &self.best.payload
    }

    /// Total evaluations made during this run alone
    pub fn run_evaluations(&self) -> usize {
        self.brackets.iter().map(|b| b.evaluations).sum()
    }

    /// Total budget spent during this run alone
    pub fn run_budget(&self) -> f64 {
        self.brackets.iter().map(|b| b.budget_spent).sum()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut report = format!(
            "Hyperband Summary:\n\
             - Run: {}\n\
             - Maximum budget: {}\n\
             - Best performance: {:.6}\n\
             - Best bracket: {}\n\
             - Evaluations: {}\n\
             - Accumulated budget: {:.2}\n\
             - Runtime: {}ms\n",
            self.run,
            self.max_budget,
            self.best_performance,
            self.best_bracket,
            self.evaluations,
            self.accumulated_budget,
            self.runtime_ms,
        );
        for b in &self.brackets {
            report.push_str(&format!(
                "   bracket {} (s={}, r={:.4}..{}): sampled {}, history {}, \
                 best {:.6}, {} evals, budget {:.2}\n",
                b.index,
                b.s,
                b.min_budget,
                b.max_budget,
                b.sampled,
                b.history_len,
                b.best_performance,
                b.evaluations,
                b.budget_spent,
            ));
        }
        report
    }
}
