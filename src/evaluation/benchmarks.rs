//! Multi-fidelity benchmark objectives
//!
//! This module provides standard benchmark functions wrapped with a
//! budget-dependent error term, so low-budget evaluations are cheap, biased
//! proxies of the full-budget objective. They are used by the demos and tests.

use std::f64::consts::PI;

use super::traits::Evaluator;
use crate::error::{HyperbandError, Result};
use crate::sampling::space::SearchSpace;

/// Trait for benchmark functions
pub trait BenchmarkFunction: Send + Sync {
    /// Name of the benchmark function
    fn name(&self) -> &'static str;

    /// Dimensionality of the problem
    fn dimension(&self) -> usize;

    /// Search space bounds (min, max) for every dimension
    fn bounds(&self) -> (f64, f64);

    /// Optimal (minimum) value
    fn optimal_value(&self) -> f64;

    /// Evaluate the function (returns value to be MINIMIZED)
    fn evaluate_raw(&self, x: &[f64]) -> f64;

    /// Search space as per-dimension bounds
    fn search_space(&self) -> SearchSpace {
        let (min, max) = self.bounds();
        SearchSpace::uniform((min, max).into(), self.dimension())
    }
}

/// Sphere function: f(x) = Σxᵢ²
///
/// Unimodal, convex, separable. Optimum at origin.
#[derive(Clone, Debug)]
pub struct Sphere {
    dimension: usize,
}

impl Sphere {
    /// Create a new Sphere function
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl BenchmarkFunction for Sphere {
    fn name(&self) -> &'static str {
        "Sphere"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> (f64, f64) {
        (-5.12, 5.12)
    }

    fn optimal_value(&self) -> f64 {
        0.0
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        x.iter().map(|xi| xi * xi).sum()
    }
}

/// Rastrigin function: f(x) = 10n + Σ(xᵢ² - 10cos(2πxᵢ))
///
/// Highly multimodal with many local minima. Optimum at origin.
#[derive(Clone, Debug)]
pub struct Rastrigin {
    dimension: usize,
}

impl Rastrigin {
    /// Create a new Rastrigin function
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl BenchmarkFunction for Rastrigin {
    fn name(&self) -> &'static str {
        "Rastrigin"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> (f64, f64) {
        (-5.12, 5.12)
    }

    fn optimal_value(&self) -> f64 {
        0.0
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        let a = 10.0;
        let n = x.len() as f64;
        a * n
            + x.iter()
                .map(|xi| xi * xi - a * (2.0 * PI * xi).cos())
                .sum::<f64>()
    }
}

/// Rosenbrock function: f(x) = Σ[100(xᵢ₊₁-xᵢ²)² + (1-xᵢ)²]
///
/// Valley structure, non-separable. Optimum at (1,1,...,1).
#[derive(Clone, Debug)]
pub struct Rosenbrock {
    dimension: usize,
}

impl Rosenbrock {
    /// Create a new Rosenbrock function
    pub fn new(dimension: usize) -> Self {
        assert!(dimension >= 2, "Rosenbrock requires at least 2 dimensions");
        Self { dimension }
    }
}

impl BenchmarkFunction for Rosenbrock {
    fn name(&self) -> &'static str {
        "Rosenbrock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> (f64, f64) {
        (-5.0, 10.0)
    }

    fn optimal_value(&self) -> f64 {
        0.0
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        x.windows(2)
            .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
            .sum()
    }
}

/// Budget-dependent view of a benchmark function
///
/// `f(x, r) = f(x) + scale * (1 + |sin(3 Σxᵢ)|) / (1 + r)`
///
/// The error term is deterministic in `x` and vanishes as the budget `r`
/// grows, so rankings at small budgets only approximate the final ranking.
#[derive(Clone, Debug)]
pub struct Fidelity<B> {
    benchmark: B,
    scale: f64,
}

impl<B: BenchmarkFunction> Fidelity<B> {
    /// Wrap a benchmark with the default error scale (10.0)
    pub fn new(benchmark: B) -> Self {
        Self {
            benchmark,
            scale: 10.0,
        }
    }

    /// Set the magnitude of the low-budget error term
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Get the underlying benchmark
    pub fn benchmark(&self) -> &B {
        &self.benchmark
    }

    /// Evaluate `x` at `budget`
    pub fn evaluate_at(&self, x: &[f64], budget: f64) -> f64 {
        let wobble = 1.0 + (3.0 * x.iter().sum::<f64>()).sin().abs();
        self.benchmark.evaluate_raw(x) + self.scale * wobble / (1.0 + budget)
    }
}

impl<B: BenchmarkFunction> Evaluator<Vec<f64>> for Fidelity<B> {
    fn evaluate(&self, payload: &Vec<f64>, budget: f64) -> Result<f64> {
        if payload.len() != self.benchmark.dimension() {
            return Err(HyperbandError::EvaluationFailure(format!(
                "{} expects {} dimensions, got {}",
                self.benchmark.name(),
                self.benchmark.dimension(),
                payload.len()
            )));
        }
        Ok(self.evaluate_at(payload, budget))
    }
}
