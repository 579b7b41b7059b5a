//! Efficient Successive Halving
//!
//! Trusts scores recorded by earlier runs of the bracket: a candidate that
//! already holds a score at the next rung's budget is promoted without being
//! looked at again, and only the remaining slots are filled by ranking.

use serde::{Deserialize, Serialize};

use super::bracket::Bracket;
use super::traits::{rung_event, Payload, PromotionPolicy, RunContext};
use crate::error::Result;
use crate::evaluation::traits::Evaluator;

/// Efficient promotion policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficientPromotion;

impl EfficientPromotion {
    /// Create a new efficient promotion policy
    pub fn new() -> Self {
        Self
    }
}

impl PromotionPolicy for EfficientPromotion {
    fn name(&self) -> &'static str {
        "efficient"
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

        let (mut promoted, rest): (Vec<usize>, Vec<usize>) = working
            .into_iter()
            .partition(|&c| bracket.history()[c].has_performance(params.r_next));

        if promoted.len() > params.k {
            let ranked = bracket.rank_worst_first(promoted, params.r_next)?;
            promoted = ranked[ranked.len() - params.k..].to_vec();
        }
        let promoted_ahead = promoted.len();

        let evaluated = bracket.evaluate_missing(&rest, params.r_i, ctx)?;
        let mut ranked = bracket.rank_worst_first(rest, params.r_i)?;

        while promoted.len() < params.k {
            match ranked.pop() {
                Some(c) => promoted.push(c),
                None => break,
            }
        }

        rung_event!(
            ctx,
            bracket = bracket.index(),
            rung = i,
            budget = params.r_i,
            n_i = params.n_i,
            promoted_ahead,
            evaluated,
            survivors = promoted.len(),
            "efficient rung complete"
        );

        Ok(promoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::tracking::BudgetTrackingEvaluator;
    use crate::evaluation::traits::{Direction, FnEvaluator};

    fn identity() -> BudgetTrackingEvaluator<impl Evaluator<u32>> {
        // Payload value is the score, independent of budget
        BudgetTrackingEvaluator::new(FnEvaluator::new(|p: &u32, _b: f64| *p as f64))
    }

    #[test]
    fn test_nine_three_one() {
        let eval = identity();
        let ctx = RunContext::new(&eval);
        let mut bracket = Bracket::new(0, 2, 9.0, 3.0, Direction::Minimize);

        let best = EfficientPromotion
            .run(&mut bracket, (0..9).rev().collect(), &ctx)
            .unwrap();

        // payload 0 was admitted last
        assert_eq!(bracket.history()[best].payload, 0);
        assert_eq!(eval.invocations(), 9 + 3 + 1);
        assert_eq!(eval.accumulated_budget(), 9.0 * 1.0 + 3.0 * 3.0 + 9.0);

        let at_max: Vec<_> = bracket
            .history()
            .iter()
            .filter(|c| c.has_performance(9.0))
            .collect();
        assert_eq!(at_max.len(), 1);
    }

    #[test]
    fn test_rung_keeps_exactly_k() {
        let eval = identity();
        let ctx = RunContext::new(&eval);
        let mut bracket = Bracket::new(0, 2, 9.0, 3.0, Direction::Minimize);
        let working = bracket.admit((0..10).collect(), 0);

        let next = EfficientPromotion
            .promote(&mut bracket, working, 0, &ctx)
            .unwrap();
        assert_eq!(next.len(), 3);
        let mut payloads: Vec<u32> = next.iter().map(|&c| bracket.history()[c].payload).collect();
        payloads.sort();
        assert_eq!(payloads, vec![0, 1, 2]);
    }

    #[test]
    fn test_extended_bracket_promotes_ahead() {
        let eval = identity();
        let ctx = RunContext::new(&eval);
        let mut bracket = Bracket::new(0, 1, 3.0, 3.0, Direction::Minimize);

        EfficientPromotion
            .run(&mut bracket, (0..9).collect(), &ctx)
            .unwrap();
        assert_eq!(eval.invocations(), 9 + 3);

        bracket.increase_maximum_budget();
        let working: Vec<usize> = (0..9).collect();
        let next = EfficientPromotion
            .promote(&mut bracket, working, 0, &ctx)
            .unwrap();

        // the three rung-1 survivors of the first run are carried over as-is
        assert_eq!(next.len(), 3);
        assert!(next.iter().all(|&c| bracket.history()[c].has_performance(3.0)));
        assert_eq!(eval.invocations(), 12);

        let best = EfficientPromotion.run(&mut bracket, Vec::new(), &ctx).unwrap();
        assert_eq!(bracket.history()[best].payload, 0);
        // only the final rung needed a new evaluation
        assert_eq!(eval.invocations(), 13);
        assert_eq!(bracket.history().len(), 9);
    }

    #[test]
    fn test_surplus_promotions_truncated_to_k() {
        let eval = identity();
        let ctx = RunContext::new(&eval);
        let mut bracket = Bracket::new(0, 1, 3.0, 3.0, Direction::Minimize);
        EfficientPromotion
            .run(&mut bracket, (0..9).collect(), &ctx)
            .unwrap();
        bracket.increase_maximum_budget();

        // four candidates shrink k to 1 while three hold a rung-1 score
        let survivors: Vec<usize> = (0..9)
            .filter(|&c| bracket.history()[c].has_performance(3.0))
            .collect();
        let mut working = survivors;
        working.push(8);
        let next = EfficientPromotion
            .promote(&mut bracket, working, 0, &ctx)
            .unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(bracket.history()[next[0]].payload, 0);
    }

    #[test]
    fn test_maximize_keeps_highest() {
        let eval = identity();
        let ctx = RunContext::new(&eval);
        let mut bracket = Bracket::new(0, 2, 9.0, 3.0, Direction::Maximize);
        let best = EfficientPromotion
            .run(&mut bracket, (0..9).collect(), &ctx)
            .unwrap();
        assert_eq!(bracket.history()[best].payload, 8);
    }
}
