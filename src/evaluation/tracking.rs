//! Budget accounting
//!
//! Wraps an evaluator and charges every invocation against a running budget
//! total. Counters are atomic so a rung may be evaluated in parallel.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tracing::trace;

use super::traits::Evaluator;
use crate::error::Result;

/// Evaluator wrapper that counts invocations and accumulates spent budget
#[derive(Debug)]
pub struct BudgetTrackingEvaluator<E> {
    inner: E,
    invocations: AtomicUsize,
    /// Bit pattern of the accumulated `f64` budget
    budget_bits: AtomicU64,
}

impl<E> BudgetTrackingEvaluator<E> {
    /// Wrap an evaluator with zeroed counters
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            invocations: AtomicUsize::new(0),
            budget_bits: AtomicU64::new(0.0f64.to_bits()),
        }
    }

    /// Total budget charged since creation or the last reset
    pub fn accumulated_budget(&self) -> f64 {
        f64::from_bits(self.budget_bits.load(Ordering::Acquire))
    }

    /// Zero the accumulated budget
    ///
    /// The invocation counter is left untouched.
    pub fn reset_accumulated_budget(&self) {
        self.budget_bits.store(0.0f64.to_bits(), Ordering::Release);
    }

    /// Number of evaluations charged since creation
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::Acquire)
    }

    /// Get the wrapped evaluator
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Take the wrapped evaluator out
    pub fn into_inner(self) -> E {
        self.inner
    }

    fn charge(&self, budget: f64) {
        self.invocations.fetch_add(1, Ordering::AcqRel);
        // fetch_update retries until no concurrent writer interleaved
        let _ = self
            .budget_bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + budget).to_bits())
            });
    }
}

impl<P, E: Evaluator<P>> Evaluator<P> for BudgetTrackingEvaluator<E> {
    fn evaluate(&self, payload: &P, budget: f64) -> Result<f64> {
        self.charge(budget);
        let score = self.inner.evaluate(payload, budget)?;
        trace!(budget, score, "evaluated candidate");
        Ok(score)
    }
}
