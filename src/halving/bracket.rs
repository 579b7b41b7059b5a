//! Bracket state
//!
//! A bracket is one Successive Halving configuration: a starting budget, a
//! number of rungs and the history of every candidate it has ever been given.

use serde::{Deserialize, Serialize};

use super::traits::{Payload, RunContext};
use crate::candidate::candidate::Candidate;
use crate::error::{HyperbandError, Result};
use crate::evaluation::traits::{Direction, Evaluator};

/// Arithmetic of one rung
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RungParams {
    /// Size of the working set entering the rung
    pub n_i: usize,
    /// Budget of this rung
    pub r_i: f64,
    /// Budget of the next rung (`r_i * eta`)
    pub r_next: f64,
    /// Survivors carried into the next rung (`floor(n_i / eta)`)
    pub k: usize,
}

/// State of one Successive Halving bracket
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "P: Serialize", deserialize = "P: Deserialize<'de>"))]
pub struct Bracket<P> {
    index: usize,
    s: usize,
    min_budget: f64,
    max_budget: f64,
    eta: f64,
    direction: Direction,
    /// Rung budgets `r_0 < … < r_s`; the last entry is always `max_budget`
    rungs: Vec<f64>,
    history: Vec<Candidate<P>>,
}

impl<P> Bracket<P> {
    /// Create a bracket with `s + 1` rungs ending at `max_budget`
    ///
    /// The starting budget is `max_budget / eta^s`.
    pub fn new(index: usize, s: usize, max_budget: f64, eta: f64, direction: Direction) -> Self {
        let min_budget = max_budget / eta.powi(s as i32);
        // the top rung is pinned to max_budget so lookups at the maximum
        // budget hit the exact key the last rung stored
        let rungs = (0..s)
            .map(|i| min_budget * eta.powi(i as i32))
            .chain(std::iter::once(max_budget))
            .collect();
        Self {
            index,
            s,
            min_budget,
            max_budget,
            eta,
            direction,
            rungs,
            history: Vec::new(),
        }
    }

    /// Position of this bracket in the orchestrator's list
    pub fn index(&self) -> usize {
        self.index
    }

    /// Aggressiveness: the number of rungs is `s + 1`
    pub fn s(&self) -> usize {
        self.s
    }

    /// Budget of rung 0
    pub fn min_budget(&self) -> f64 {
        self.min_budget
    }

    /// Budget every surviving candidate eventually reaches
    pub fn max_budget(&self) -> f64 {
        self.max_budget
    }

    /// Elimination and budget-growth factor
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Comparison direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Every candidate ever assigned to this bracket
    pub fn history(&self) -> &[Candidate<P>] {
        &self.history
    }

    /// Number of candidates already assigned to this bracket
    pub fn first_iteration_n(&self) -> usize {
        self.history.len()
    }

    /// Budget of rung `i`: `min_budget * eta^i`
    ///
    /// Rungs past the last one continue the geometric sequence.
    pub fn rung_budget(&self, i: usize) -> f64 {
        match self.rungs.get(i) {
            Some(&budget) => budget,
            None => self.max_budget * self.eta.powi((i - self.s) as i32),
        }
    }

    /// Budgets of all rungs, `r_0 < r_1 < … < r_s`
    pub fn rung_budgets(&self) -> Vec<f64> {
        self.rungs.clone()
    }

    /// Rung arithmetic for a working set of `n_i` candidates at rung `i`
    pub fn compute_params(&self, n_i: usize, i: usize) -> RungParams {
        RungParams {
            n_i,
            r_i: self.rung_budget(i),
            r_next: self.rung_budget(i + 1),
            k: (n_i as f64 / self.eta).floor() as usize,
        }
    }

    /// Is `challenger` strictly better than `incumbent` at `budget`?
    pub fn is_better(
        &self,
        challenger: &Candidate<P>,
        incumbent: &Candidate<P>,
        budget: f64,
    ) -> Result<bool> {
        Ok(self
            .direction
            .is_better(challenger.performance(budget)?, incumbent.performance(budget)?))
    }

    /// Index of the best history candidate scored at the current maximum budget
    pub fn best_for_max_budget(&self) -> Option<usize> {
        let budget = self.max_budget;
        let mut best: Option<(usize, f64)> = None;
        for (i, c) in self.history.iter().enumerate() {
            if let Some(score) = c.get_performance(budget) {
                match best {
                    Some((_, incumbent)) if !self.direction.is_better(score, incumbent) => {}
                    _ => best = Some((i, score)),
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Best history candidate scored at the current maximum budget
    pub fn best_candidate(&self) -> Option<&Candidate<P>> {
        self.best_for_max_budget().map(|i| &self.history[i])
    }

    /// Extend the bracket by one rung: `max_budget *= eta`, `s += 1`
    ///
    /// The starting budget is unchanged, so every recorded score stays on a
    /// rung of the extended bracket.
    pub fn increase_maximum_budget(&mut self) {
        self.max_budget *= self.eta;
        self.s += 1;
        self.rungs.push(self.max_budget);
    }

    /// Append fresh payloads to the history and return the full working set
    ///
    /// The working set lists history indices, oldest first.
    pub fn admit(&mut self, payloads: Vec<P>, run: usize) -> Vec<usize> {
        self.history.extend(
            payloads
                .into_iter()
                .map(|p| Candidate::with_birth_run(p, run)),
        );
        (0..self.history.len()).collect()
    }

    /// Sort `members` so the worst score at `budget` comes first
    ///
    /// The sort is stable, so ties keep their working-set order.
    pub(crate) fn rank_worst_first(&self, members: Vec<usize>, budget: f64) -> Result<Vec<usize>> {
        let mut keyed = members
            .into_iter()
            .map(|c| self.history[c].performance(budget).map(|p| (c, p)))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by(|a, b| self.direction.worst_first(a.1, b.1));
        Ok(keyed.into_iter().map(|(c, _)| c).collect())
    }

    /// Index of the best candidate, or an error if nobody reached the maximum budget
    pub(crate) fn finish(&self) -> Result<usize> {
        self.best_for_max_budget()
            .ok_or(HyperbandError::NoCandidateReachedMaxBudget {
                bracket: self.index,
                max_budget: self.max_budget,
            })
    }
}

impl<P: Payload> Bracket<P> {
    /// Evaluate every member of `working` that has no score at `budget`
    ///
    /// Returns the number of evaluations performed. All scores are stored
    /// before this returns, so ranking never observes a partial rung.
    pub(crate) fn evaluate_missing<E: Evaluator<P>>(
        &mut self,
        working: &[usize],
        budget: f64,
        ctx: &RunContext<'_, E>,
    ) -> Result<usize> {
        let pending: Vec<usize> = working
            .iter()
            .copied()
            .filter(|&c| !self.history[c].has_performance(budget))
            .collect();

        let scores = ctx.score_all(&self.history, &pending, budget);
        let mut failure = None;
        for (&c, score) in pending.iter().zip(scores) {
            match score {
                Ok(score) => self.history[c].store_performance(budget, score),
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(pending.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(bracket: &mut Bracket<u32>, budget: f64, scores: &[f64]) {
        let n = bracket.history.len();
        bracket.admit((n as u32..(n + scores.len()) as u32).collect(), 0);
        for (c, &s) in bracket.history[n..].iter_mut().zip(scores) {
            c.store_performance(budget, s);
        }
    }

    #[test]
    fn test_min_budget_from_s() {
        let b: Bracket<u32> = Bracket::new(0, 2, 9.0, 3.0, Direction::Minimize);
        assert_eq!(b.min_budget(), 1.0);
        assert_eq!(b.min_budget() * b.eta().powi(b.s() as i32), b.max_budget());
        assert_eq!(b.rung_budgets(), vec![1.0, 3.0, 9.0]);
    }

    #[test]
    fn test_compute_params() {
        let b: Bracket<u32> = Bracket::new(0, 2, 9.0, 3.0, Direction::Minimize);
        let p = b.compute_params(9, 0);
        assert_eq!(p, RungParams { n_i: 9, r_i: 1.0, r_next: 3.0, k: 3 });
        let p = b.compute_params(3, 1);
        assert_eq!(p.k, 1);
        assert_eq!(p.r_i, 3.0);
        assert_eq!(b.compute_params(2, 2).k, 0);
        assert_eq!(b.compute_params(0, 0).k, 0);
    }

    #[test]
    fn test_increase_maximum_budget() {
        let mut b: Bracket<u32> = Bracket::new(1, 1, 9.0, 3.0, Direction::Minimize);
        assert_eq!(b.min_budget(), 3.0);
        b.increase_maximum_budget();
        assert_eq!(b.s(), 2);
        assert_eq!(b.max_budget(), 27.0);
        assert_eq!(b.min_budget(), 3.0);
        assert_eq!(b.rung_budgets(), vec![3.0, 9.0, 27.0]);
        assert_eq!(b.compute_params(1, 2).r_next, 81.0);
    }

    #[test]
    fn test_top_rung_matches_max_budget() {
        let mut b: Bracket<u32> = Bracket::new(0, 2, 10.0, 3.0, Direction::Minimize);
        assert_eq!(b.rung_budget(2), 10.0);
        assert_eq!(b.compute_params(3, 1).r_next, 10.0);
        b.increase_maximum_budget();
        // the old top rung keeps its exact key after the extension
        assert_eq!(b.rung_budget(2), 10.0);
        assert_eq!(b.rung_budget(3), b.max_budget());
    }

    #[test]
    fn test_best_for_max_budget_minimize() {
        let mut b: Bracket<u32> = Bracket::new(0, 0, 9.0, 3.0, Direction::Minimize);
        assert_eq!(b.best_for_max_budget(), None);
        scored(&mut b, 9.0, &[0.4, 0.1, 0.3]);
        scored(&mut b, 3.0, &[0.0]);
        assert_eq!(b.best_for_max_budget(), Some(1));
        assert_eq!(b.best_candidate().map(|c| c.payload), Some(1));
    }

    #[test]
    fn test_best_for_max_budget_maximize() {
        let mut b: Bracket<u32> = Bracket::new(0, 0, 9.0, 3.0, Direction::Maximize);
        scored(&mut b, 9.0, &[0.4, 0.1, 0.3]);
        assert_eq!(b.best_for_max_budget(), Some(0));
    }

    #[test]
    fn test_best_keeps_first_on_ties() {
        let mut b: Bracket<u32> = Bracket::new(0, 0, 9.0, 3.0, Direction::Minimize);
        scored(&mut b, 9.0, &[0.2, 0.2]);
        assert_eq!(b.best_for_max_budget(), Some(0));
    }

    #[test]
    fn test_is_better() {
        let mut b: Bracket<u32> = Bracket::new(0, 0, 9.0, 3.0, Direction::Minimize);
        scored(&mut b, 9.0, &[0.4, 0.1]);
        let (x, y) = (&b.history()[0], &b.history()[1]);
        assert!(b.is_better(y, x, 9.0).unwrap());
        assert!(!b.is_better(x, y, 9.0).unwrap());
        assert_eq!(
            b.is_better(x, y, 1.0),
            Err(HyperbandError::BudgetNotEvaluated { budget: 1.0 })
        );
    }

    #[test]
    fn test_rank_worst_first() {
        let mut b: Bracket<u32> = Bracket::new(0, 1, 9.0, 3.0, Direction::Minimize);
        scored(&mut b, 3.0, &[0.5, 0.9, 0.1, 0.7]);
        let ranked = b.rank_worst_first(vec![0, 1, 2, 3], 3.0).unwrap();
        assert_eq!(ranked, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_finish_without_max_budget_scores() {
        let mut b: Bracket<u32> = Bracket::new(4, 1, 9.0, 3.0, Direction::Minimize);
        scored(&mut b, 3.0, &[0.5]);
        assert_eq!(
            b.finish(),
            Err(HyperbandError::NoCandidateReachedMaxBudget {
                bracket: 4,
                max_budget: 9.0
            })
        );
    }
}
