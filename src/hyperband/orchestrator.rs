//! Hyperband orchestrator
//!
//! Owns one bracket per aggressiveness level `s = s_max, …, 0` and runs them in
//! order, topping every bracket up with freshly sampled candidates and keeping
//! the best result as the incumbent. Brackets keep their history between runs,
//! so a later run (possibly after `increment_max_budget`) reuses every score
//! recorded so far.

use std::time::Instant;

use tracing::{debug, info, info_span};

use super::config::HyperbandConfig;
use super::result::{BracketReport, HyperbandResult};
use crate::error::{HyperbandError, Result};
use crate::evaluation::tracking::BudgetTrackingEvaluator;
use crate::evaluation::traits::Evaluator;
use crate::halving::bracket::Bracket;
use crate::halving::traits::{rung_event, Payload, PromotionPolicy, RunContext};
use crate::sampling::seed::SeedSchedule;
use crate::sampling::traits::{SampleRequest, Sampler};

/// Number of candidates a bracket with aggressiveness `s` starts with
///
/// `ceil((total_budget / max_budget) * eta^s / (s + 1))`
pub fn bracket_size(total_budget: f64, max_budget: f64, eta: f64, s: usize) -> usize {
    let ratio = total_budget / max_budget;
    let spread = eta.powi(s as i32) / (s + 1) as f64;
    (ratio * spread).ceil() as usize
}

/// Incremental Hyperband scheduler
pub struct Hyperband<P, E> {
    config: HyperbandConfig,
    evaluator: BudgetTrackingEvaluator<E>,
    brackets: Vec<Bracket<P>>,
    seeds: SeedSchedule,
    max_budget: f64,
    s_max: usize,
    total_budget: f64,
    runs: usize,
}

impl<P, E> Hyperband<P, E> {
    /// Create an orchestrator that wraps `evaluator` in a fresh budget tracker
    pub fn new(config: HyperbandConfig, evaluator: E) -> Result<Self> {
        Self::with_tracker(config, BudgetTrackingEvaluator::new(evaluator))
    }

    /// Create an orchestrator around an existing budget tracker
    ///
    /// Counters already held by the tracker are kept, so several orchestrators
    /// can be charged against the same account one after another.
    pub fn with_tracker(
        config: HyperbandConfig,
        evaluator: BudgetTrackingEvaluator<E>,
    ) -> Result<Self> {
        config.validate()?;

        let max_budget = config.max_budget;
        let s_max = config.s_max();
        let brackets = (0..=s_max)
            .rev()
            .enumerate()
            .map(|(index, s)| Bracket::new(index, s, max_budget, config.eta, config.direction))
            .collect();

        info!(
            max_budget,
            eta = config.eta,
            s_max,
            policy = %config.policy,
            "hyperband initialized"
        );

        Ok(Self {
            seeds: SeedSchedule::new(config.seed),
            total_budget: (s_max + 1) as f64 * max_budget,
            config,
            evaluator,
            brackets,
            max_budget,
            s_max,
            runs: 0,
        })
    }

    /// Multiply the maximum budget by eta
    ///
    /// Every existing bracket gains a rung on top and a new bracket with
    /// `s = 0` is appended, so the bracket list stays ordered by decreasing
    /// `s` and histories are preserved.
    pub fn increment_max_budget(&mut self) {
        let eta = self.config.eta;
        self.max_budget *= eta;
        self.s_max += 1;
        self.total_budget = (self.s_max + 1) as f64 * self.max_budget;

        for bracket in &mut self.brackets {
            bracket.increase_maximum_budget();
        }
        let index = self.brackets.len();
        self.brackets
            .push(Bracket::new(index, 0, self.max_budget, eta, self.config.direction));

        info!(
            max_budget = self.max_budget,
            s_max = self.s_max,
            brackets = self.brackets.len(),
            "maximum budget incremented"
        );
    }

    /// Log rung summaries at info level during subsequent runs
    pub fn set_debug(&mut self, debug: bool) {
        self.config.verbose = debug;
    }

    /// Budget charged since creation or the last reset
    pub fn accumulated_budget(&self) -> f64 {
        self.evaluator.accumulated_budget()
    }

    /// Zero the accumulated budget, keeping every recorded score
    pub fn reset_accumulated_budget(&self) {
        self.evaluator.reset_accumulated_budget();
    }

    /// Evaluator invocations since the tracker was created
    pub fn evaluations(&self) -> usize {
        self.evaluator.invocations()
    }

    /// Brackets ordered by decreasing `s`
    pub fn brackets(&self) -> &[Bracket<P>] {
        &self.brackets
    }

    /// Current maximum budget (R)
    pub fn max_budget(&self) -> f64 {
        self.max_budget
    }

    /// Aggressiveness of the first bracket
    pub fn s_max(&self) -> usize {
        self.s_max
    }

    /// Budget of one bracket's worth of evaluations: `(s_max + 1) * R`
    pub fn total_budget(&self) -> f64 {
        self.total_budget
    }

    /// Number of completed runs
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Active configuration
    pub fn config(&self) -> &HyperbandConfig {
        &self.config
    }

    /// The budget tracker
    pub fn evaluator(&self) -> &BudgetTrackingEvaluator<E> {
        &self.evaluator
    }

    /// Give back the budget tracker
    pub fn into_evaluator(self) -> BudgetTrackingEvaluator<E> {
        self.evaluator
    }

    /// Candidates a bracket with aggressiveness `s` starts with at the current budget
    pub fn bracket_size(&self, s: usize) -> usize {
        bracket_size(self.total_budget, self.max_budget, self.config.eta, s)
    }
}

impl<P, E> Hyperband<P, E>
where
    P: Payload + Clone,
    E: Evaluator<P>,
{
    /// Run every bracket once and return the incumbent
    ///
    /// Each bracket is topped up with `n - history_len` fresh candidates
    /// before Successive Halving runs over its whole history. Any evaluation
    /// or sampling error aborts the run.
    pub fn hyperband<S>(&mut self, sampler: &S) -> Result<HyperbandResult<P>>
    where
        S: Sampler<P> + ?Sized,
    {
        let start_time = Instant::now();
        let run = self.runs;
        let span = info_span!("hyperband", run, max_budget = self.max_budget);
        let _enter = span.enter();

        let ctx = RunContext::new(&self.evaluator)
            .verbose(self.config.verbose)
            .parallel(self.config.parallel_evaluation)
            .run(run);

        let policy = self.config.policy;
        let comparison = self.config.incumbent_comparison;
        let direction = self.config.direction;

        let mut reports = Vec::with_capacity(self.brackets.len());
        // (bracket, history index, performance)
        let mut incumbent: Option<(usize, usize, f64)> = None;

        for (pos, bracket) in self.brackets.iter_mut().enumerate() {
            let bracket_span = info_span!("bracket", index = pos, s = bracket.s());
            let _guard = bracket_span.enter();

            let n = bracket_size(self.total_budget, self.max_budget, self.config.eta, bracket.s());
            let assigned = bracket.first_iteration_n();
            let rest_n = n.saturating_sub(assigned);

            rung_event!(
                ctx,
                min_budget = bracket.min_budget(),
                max_budget = bracket.max_budget(),
                n,
                assigned,
                rest_n,
                "sampling new candidates"
            );

            let request = SampleRequest {
                bracket: pos,
                count: rest_n,
                seed: self.seeds.seed_for(pos),
                offset: assigned,
            };
            let fresh = sampler.sample(&request)?;
            if fresh.len() != rest_n {
                return Err(HyperbandError::SamplerContract {
                    expected: rest_n,
                    actual: fresh.len(),
                });
            }

            let evaluations_before = self.evaluator.invocations();
            let budget_before = self.evaluator.accumulated_budget();

            let best = policy.run(bracket, fresh, &ctx)?;
            let performance = bracket.history()[best].performance(bracket.max_budget())?;

            reports.push(BracketReport {
                index: pos,
                s: bracket.s(),
                min_budget: bracket.min_budget(),
                max_budget: bracket.max_budget(),
                sampled: rest_n,
                history_len: bracket.history().len(),
                best_performance: performance,
                evaluations: self.evaluator.invocations() - evaluations_before,
                budget_spent: self.evaluator.accumulated_budget() - budget_before,
            });

            match incumbent {
                Some((_, _, current)) if !comparison.replaces(direction, performance, current) => {
                    debug!(performance, incumbent = current, "bracket kept the incumbent");
                }
                previous => {
                    info!(
                        performance,
                        previous = previous.map(|(_, _, p)| p),
                        "new incumbent"
                    );
                    incumbent = Some((pos, best, performance));
                }
            }
        }

        let (best_bracket, best_index, best_performance) =
            incumbent.ok_or(HyperbandError::NoCandidateReachedMaxBudget {
                bracket: 0,
                max_budget: self.max_budget,
            })?;

        self.runs += 1;
        let result = HyperbandResult {
            best: self.brackets[best_bracket].history()[best_index].clone(),
            best_performance,
            best_bracket,
            max_budget: self.max_budget,
            evaluations: self.evaluator.invocations(),
            accumulated_budget: self.evaluator.accumulated_budget(),
            brackets: reports,
            run,
            runtime_ms: start_time.elapsed().as_millis(),
        };

        info!(
            best_performance,
            best_bracket,
            evaluations = result.run_evaluations(),
            budget = result.run_budget(),
            "hyperband run complete"
        );

        Ok(result)
    }
}
