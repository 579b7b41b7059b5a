//! Promotion policy traits
//!
//! This module defines the per-run context handed to a policy and the
//! `PromotionPolicy` trait both Successive Halving variants implement.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::bracket::Bracket;
use crate::candidate::candidate::Candidate;
use crate::error::Result;
use crate::evaluation::traits::Evaluator;

/// Trait bound for candidate payloads
///
/// With the `parallel` feature payloads are shared across rayon workers while
/// a rung is being evaluated.
#[cfg(feature = "parallel")]
pub trait Payload: Send + Sync {}

#[cfg(feature = "parallel")]
impl<T: Send + Sync> Payload for T {}

/// Trait bound for candidate payloads (non-parallel version)
#[cfg(not(feature = "parallel"))]
pub trait Payload {}

#[cfg(not(feature = "parallel"))]
impl<T> Payload for T {}

/// Emit a rung-level event at `info` when verbose, `debug` otherwise
macro_rules! rung_event {
    ($ctx:expr, $($arg:tt)+) => {
        if $ctx.verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}
pub(crate) use rung_event;

/// Collaborators injected into a policy for one bracket run
pub struct RunContext<'a, E> {
    /// Evaluator charged for every evaluation
    pub evaluator: &'a E,
    /// Promote rung summaries to `info` level
    pub verbose: bool,
    /// Evaluate the missing scores of a rung on rayon's pool
    pub parallel: bool,
    /// Hyperband run counter, recorded on newly admitted candidates
    pub run: usize,
}

impl<'a, E> RunContext<'a, E> {
    /// Create a quiet, sequential context for run 0
    pub fn new(evaluator: &'a E) -> Self {
        Self {
            evaluator,
            verbose: false,
            parallel: false,
            run: 0,
        }
    }

    /// Set verbosity
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable or disable parallel evaluation
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the run counter
    pub fn run(mut self, run: usize) -> Self {
        self.run = run;
        self
    }

    /// Score `pending` history entries at `budget`
    ///
    /// Sequential scoring stops at the first failure; the returned vector then
    /// ends with that failure. Parallel scoring always completes the batch.
    pub(crate) fn score_all<P>(
        &self,
        history: &[Candidate<P>],
        pending: &[usize],
        budget: f64,
    ) -> Vec<Result<f64>>
    where
        P: Payload,
        E: Evaluator<P>,
    {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return pending
                    .par_iter()
                    .map(|&c| self.evaluator.evaluate(&history[c].payload, budget))
                    .collect();
            }
        }

        let mut scores = Vec::with_capacity(pending.len());
        for &c in pending {
            let score = self.evaluator.evaluate(&history[c].payload, budget);
            let failed = score.is_err();
            scores.push(score);
            if failed {
                break;
            }
        }
        scores
    }
}

/// Successive Halving promotion policy
///
/// A policy decides, rung by rung, which candidates of a bracket's working set
/// are evaluated and which survive. The shared driver [`run`](Self::run)
/// merges new candidates into the history, walks rungs `0..=s` and reports
/// the best candidate at the bracket's maximum budget.
pub trait PromotionPolicy {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Process rung `i` and return the working set of rung `i + 1`
    fn promote<P, E>(
        &self,
        bracket: &mut Bracket<P>,
        working: Vec<usize>,
        i: usize,
        ctx: &RunContext<'_, E>,
    ) -> Result<Vec<usize>>
    where
        P: Payload,
        E: Evaluator<P>;

    /// Run the bracket with `new_candidates` added to its history
    ///
    /// Returns the history index of the best candidate at the bracket's
    /// maximum budget.
    fn run<P, E>(
        &self,
        bracket: &mut Bracket<P>,
        new_candidates: Vec<P>,
        ctx: &RunContext<'_, E>,
    ) -> Result<usize>
    where
        P: Payload,
        E: Evaluator<P>,
    {
        let mut working = bracket.admit(new_candidates, ctx.run);
        for i in 0..=bracket.s() {
            working = self.promote(bracket, working, i, ctx)?;
        }
        bracket.finish()
    }
}
