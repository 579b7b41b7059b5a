//! Conservative Successive Halving
//!
//! Re-evaluates every working candidate at every rung. Unless running in
//! strict mode, the ranking pool of a rung is widened with every history
//! candidate that already holds a score at that rung's budget, so candidates
//! discarded by an earlier run can win their place back.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::bracket::Bracket;
use super::traits::{rung_event, Payload, PromotionPolicy, RunContext};
use crate::error::Result;
use crate::evaluation::traits::Evaluator;

/// Conservative promotion policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConservativePromotion {
    /// Only candidates present in the working set compete
    pub strict: bool,
}

impl ConservativePromotion {
    /// Create a non-strict conservative policy
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Create a strict conservative policy
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl PromotionPolicy for ConservativePromotion {
    fn name(&self) -> &'static str {
        if self.strict {
            "conservative-strict"
        } else {
            "conservative"
        }
    }

    fn promote<P, E>(
        &self,
        bracket: &mut Bracket<P>,
        working: Vec<usize>,
        i: usize,
        ctx: &RunContext<'_, E>,
    ) -> Result<Vec<usize>>
    where
        P: Payload,
        E: Evaluator<P>,
    {
        let params = bracket.compute_params(working.len(), i);
        let evaluated = bracket.evaluate_missing(&working, params.r_i, ctx)?;

        let mut pool = working;
        if !self.strict {
            let present: HashSet<usize> = pool.iter().copied().collect();
            let readmitted: Vec<usize> = bracket
                .history()
                .iter()
                .enumerate()
                .filter(|(c, cand)| !present.contains(c) && cand.has_performance(params.r_i))
                .map(|(c, _)| c)
                .collect();
            pool.extend(readmitted);
        }
        let pool_size = pool.len();

        let mut ranked = bracket.rank_worst_first(pool, params.r_i)?;
        let keep = params.k.min(ranked.len());
        let survivors: Vec<usize> = (0..keep).filter_map(|_| ranked.pop()).collect();

        rung_event!(
            ctx,
            bracket = bracket.index(),
            rung = i,
            budget = params.r_i,
            n_i = params.n_i,
            evaluated,
            pool = pool_size,
            survivors = survivors.len(),
            strict = self.strict,
            "conservative rung complete"
        );

        Ok(survivors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::tracking::BudgetTrackingEvaluator;
    use crate::evaluation::traits::{Direction, FnEvaluator};

    fn identity() -> BudgetTrackingEvaluator<impl Evaluator<u32>> {
        BudgetTrackingEvaluator::new(FnEvaluator::new(|p: &u32, _b: f64| *p as f64))
    }

    #[test]
    fn test_nine_three_one() {
        let eval = identity();
        let ctx = RunContext::new(&eval);
        let mut bracket = Bracket::new(0, 2, 9.0, 3.0, Direction::Minimize);

        let best = ConservativePromotion::new()
            .run(&mut bracket, (0..9).collect(), &ctx)
            .unwrap();

        assert_eq!(bracket.history()[best].payload, 0);
        assert_eq!(eval.invocations(), 13);
        let at_max = bracket
            .history()
            .iter()
            .filter(|c| c.has_performance(9.0))
            .count();
        assert_eq!(at_max, 1);
    }

    #[test]
    fn test_widening_readmits_scored_history() {
        let eval = identity();
        let ctx = RunContext::new(&eval);
        let mut bracket = Bracket::new(0, 2, 9.0, 3.0, Direction::Minimize);
        ConservativePromotion::new()
            .run(&mut bracket, (0..9).collect(), &ctx)
            .unwrap();

        // rung 1 working set holds only the worst of the three rung-1 scored
        // candidates; the two better ones are re-admitted from history
        let next = ConservativePromotion::new()
            .promote(&mut bracket, vec![2, 5, 8], 1, &ctx)
            .unwrap();
        assert_eq!(next, vec![0]);
    }

    #[test]
    fn test_strict_ignores_history() {
        let eval = identity();
        let ctx = RunContext::new(&eval);
        let mut bracket = Bracket::new(0, 2, 9.0, 3.0, Direction::Minimize);
        ConservativePromotion::strict()
            .run(&mut bracket, (0..9).collect(), &ctx)
            .unwrap();

        let before = eval.invocations();
        let next = ConservativePromotion::strict()
            .promote(&mut bracket, vec![2, 5, 8], 1, &ctx)
            .unwrap();
        assert_eq!(next, vec![2]);
        // candidates 5 and 8 had no rung-1 score yet
        assert_eq!(eval.invocations(), before + 2);
    }

    #[test]
    fn test_readmitted_candidates_held_current_rung_score() {
        let eval = identity();
        let ctx = RunContext::new(&eval);
        let mut bracket = Bracket::new(0, 2, 9.0, 3.0, Direction::Minimize);
        bracket.admit((0..9).collect(), 0);

        // nothing in history has a rung-1 score, so nothing is re-admitted
        let next = ConservativePromotion::new()
            .promote(&mut bracket, vec![4, 7, 6], 1, &ctx)
            .unwrap();
        assert_eq!(next, vec![4]);
    }

    #[test]
    fn test_names() {
        assert_eq!(ConservativePromotion::new().name(), "conservative");
        assert_eq!(ConservativePromotion::strict().name(), "conservative-strict");
    }
}
