//! Evaluation traits
//!
//! This module defines the evaluator abstraction and the optimization direction.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{HyperbandError, Result};

/// Direction in which performances are compared
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Lower performance values are better
    #[default]
    Minimize,
    /// Higher performance values are better
    Maximize,
}

impl Direction {
    /// Build a direction from a `minimize` flag
    pub fn from_minimize(minimize: bool) -> Self {
        if minimize {
            Self::Minimize
        } else {
            Self::Maximize
        }
    }

    /// Check whether this direction minimizes
    pub fn is_minimize(self) -> bool {
        self == Self::Minimize
    }

    /// Strict comparison: is `challenger` better than `incumbent`?
    pub fn is_better(self, challenger: f64, incumbent: f64) -> bool {
        match self {
            Self::Minimize => challenger < incumbent,
            Self::Maximize => challenger > incumbent,
        }
    }

    /// Ordering that sorts the worst performance first and the best last
    pub fn worst_first(self, a: f64, b: f64) -> std::cmp::Ordering {
        match self {
            Self::Minimize => b.total_cmp(&a),
            Self::Maximize => a.total_cmp(&b),
        }
    }
}

/// Evaluator trait
///
/// Scores a payload at a given budget. Implementations should be deterministic
/// given their inputs; any error aborts the current bracket run.
#[cfg(feature = "parallel")]
pub trait Evaluator<P>: Send + Sync {
    /// Evaluate `payload` with `budget` units of resource
    fn evaluate(&self, payload: &P, budget: f64) -> Result<f64>;
}

/// Evaluator trait (non-parallel version)
///
/// Scores a payload at a given budget. Implementations should be deterministic
/// given their inputs; any error aborts the current bracket run.
#[cfg(not(feature = "parallel"))]
pub trait Evaluator<P> {
    /// Evaluate `payload` with `budget` units of resource
    fn evaluate(&self, payload: &P, budget: f64) -> Result<f64>;
}

impl<P, E: Evaluator<P> + ?Sized> Evaluator<P> for &E {
    fn evaluate(&self, payload: &P, budget: f64) -> Result<f64> {
        (**self).evaluate(payload, budget)
    }
}

/// A simple function wrapper for infallible evaluation
pub struct FnEvaluator<P, F>
where
    F: Fn(&P, f64) -> f64,
{
    f: F,
    _marker: std::marker::PhantomData<fn(&P)>,
}

impl<P, F> FnEvaluator<P, F>
where
    F: Fn(&P, f64) -> f64,
{
    /// Create a new function-based evaluator
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<P, F> Evaluator<P> for FnEvaluator<P, F>
where
    F: Fn(&P, f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, payload: &P, budget: f64) -> Result<f64> {
        Ok((self.f)(payload, budget))
    }
}

/// A function wrapper for fallible evaluation
///
/// Errors returned by the closure are reported as
/// [`HyperbandError::EvaluationFailure`].
pub struct TryFnEvaluator<P, F, Err>
where
    F: Fn(&P, f64) -> std::result::Result<f64, Err>,
{
    f: F,
    _marker: std::marker::PhantomData<fn(&P) -> Err>,
}

impl<P, F, Err> TryFnEvaluator<P, F, Err>
where
    F: Fn(&P, f64) -> std::result::Result<f64, Err>,
{
    /// Create a new fallible function-based evaluator
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<P, F, Err> Evaluator<P> for TryFnEvaluator<P, F, Err>
where
    F: Fn(&P, f64) -> std::result::Result<f64, Err> + Send + Sync,
    Err: Display,
{
    fn evaluate(&self, payload: &P, budget: f64) -> Result<f64> {
        (self.f)(payload, budget).map_err(|e| HyperbandError::EvaluationFailure(e.to_string()))
    }
}

/// A wrapper to negate an evaluator
///
/// Turns a higher-is-better metric (accuracy, reward) into a lower-is-better
/// one so it can be scheduled under [`Direction::Minimize`].
pub struct NegatedEvaluator<E> {
    inner: E,
}

impl<E> NegatedEvaluator<E> {
    /// Create a negating wrapper around an evaluator
    pub fn new(evaluator: E) -> Self {
        Self { inner: evaluator }
    }

    /// Get the wrapped evaluator
    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<P, E: Evaluator<P>> Evaluator<P> for NegatedEvaluator<E> {
    fn evaluate(&self, payload: &P, budget: f64) -> Result<f64> {
        self.inner.evaluate(payload, budget).map(|v| -v)
    }
}
