//! Incremental versus restart experiments
//!
//! An experiment runs Hyperband at an initial maximum budget and then once
//! more at `eta` times that budget. The incremental algorithms extend the
//! orchestrator they already have; the restart baseline throws it away and
//! starts over, charging the same budget tracker. Comparing the final
//! `total_budget` shows what reusing earlier evaluations saves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::HyperbandConfig;
use super::orchestrator::Hyperband;
use crate::error::{HyperbandError, Result};
use crate::evaluation::traits::{Direction, Evaluator};
use crate::halving::policy::PolicyConfig;
use crate::halving::traits::Payload;
use crate::sampling::traits::Sampler;

/// Algorithm variants compared by an experiment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Incremental Hyperband with efficient promotion
    #[default]
    #[serde(rename = "eid-hb")]
    Efficient,
    /// Incremental Hyperband with conservative promotion
    #[serde(rename = "cid-hb")]
    Conservative,
    /// Incremental Hyperband with strict conservative promotion
    #[serde(rename = "dcid-hb")]
    StrictConservative,
    /// Plain Hyperband restarted from scratch at the larger budget
    #[serde(rename = "ih-hb")]
    Restart,
}

impl Algorithm {
    /// Every algorithm, in reporting order
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Efficient,
        Algorithm::Conservative,
        Algorithm::StrictConservative,
        Algorithm::Restart,
    ];

    /// Short identifier
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Efficient => "eid-hb",
            Self::Conservative => "cid-hb",
            Self::StrictConservative => "dcid-hb",
            Self::Restart => "ih-hb",
        }
    }

    /// Promotion policy of the first run
    pub fn policy(self) -> PolicyConfig {
        match self {
            Self::Efficient | Self::Restart => PolicyConfig::Efficient,
            Self::Conservative => PolicyConfig::conservative(),
            Self::StrictConservative => PolicyConfig::strict_conservative(),
        }
    }

    /// Does the second run extend the first one?
    pub fn is_incremental(self) -> bool {
        self != Self::Restart
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = HyperbandError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| HyperbandError::UnknownAlgorithm(s.to_string()))
    }
}

/// Parameters of one experiment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Maximum budget of the first run
    pub initial_max_budget: f64,
    /// Elimination and budget-growth factor
    pub eta: f64,
    /// Global sampling seed
    pub seed: u64,
    /// Algorithm under test
    pub algorithm: Algorithm,
    /// Comparison direction
    pub direction: Direction,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            initial_max_budget: 27.0,
            eta: 3.0,
            seed: 42,
            algorithm: Algorithm::Efficient,
            direction: Direction::Minimize,
        }
    }
}

impl ExperimentConfig {
    /// Create an experiment for `algorithm` with default budgets
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Builder method to set the initial maximum budget
    pub fn with_initial_max_budget(mut self, budget: f64) -> Self {
        self.initial_max_budget = budget;
        self
    }

    /// Builder method to set eta
    pub fn with_eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    /// Builder method to set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Configuration of the first Hyperband run
    pub fn hyperband_config(&self) -> HyperbandConfig {
        HyperbandConfig::new()
            .with_max_budget(self.initial_max_budget)
            .with_eta(self.eta)
            .with_seed(self.seed)
            .with_direction(self.direction)
            .with_policy(self.algorithm.policy())
    }

    /// Maximum budget of the second run
    pub fn final_max_budget(&self) -> f64 {
        self.initial_max_budget * self.eta
    }
}

/// Outcome of an experiment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExperimentResult<P> {
    /// Algorithm that produced this result
    pub algorithm: Algorithm,
    /// Incumbent payload after the second run
    pub final_incumbent: P,
    /// Incumbent performance at the final maximum budget
    pub performance: f64,
    /// Budget charged across both runs
    pub total_budget: f64,
    /// Evaluator invocations across both runs
    pub evaluations: usize,
}

/// Run one experiment
///
/// Every evaluation of both runs is charged to one budget tracker wrapped
/// around `evaluator`.
pub fn run_experiment<P, E, S>(
    config: &ExperimentConfig,
    evaluator: E,
    sampler: &S,
) -> Result<ExperimentResult<P>>
where
    P: Payload + Clone,
    E: Evaluator<P>,
    S: Sampler<P> + ?Sized,
{
    let hb_config = config.hyperband_config();
    let mut hb = Hyperband::new(hb_config.clone(), evaluator)?;
    hb.hyperband(sampler)?;

    let result = if config.algorithm.is_incremental() {
        hb.increment_max_budget();
        hb.hyperband(sampler)?
    } else {
        let tracker = hb.into_evaluator();
        let restart_config = hb_config
            .with_max_budget(config.final_max_budget())
            .with_policy(PolicyConfig::Efficient);
        let mut restarted = Hyperband::with_tracker(restart_config, tracker)?;
        restarted.hyperband(sampler)?
    };

    info!(
        algorithm = %config.algorithm,
        performance = result.best_performance,
        total_budget = result.accumulated_budget,
        evaluations = result.evaluations,
        "experiment complete"
    );

    Ok(ExperimentResult {
        algorithm: config.algorithm,
        final_incumbent: result.best.into_payload(),
        performance: result.best_performance,
        total_budget: result.accumulated_budget,
        evaluations: result.evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::traits::FnEvaluator;
    use crate::sampling::traits::IndexSampler;

    fn by_value() -> FnEvaluator<u64, impl Fn(&u64, f64) -> f64 + Send + Sync> {
        FnEvaluator::new(|p: &u64, _b: f64| *p as f64)
    }

    #[test]
    fn test_algorithm_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!("cid-hb".parse::<Algorithm>().unwrap(), Algorithm::Conservative);
        assert_eq!(
            "hb".parse::<Algorithm>(),
            Err(HyperbandError::UnknownAlgorithm("hb".to_string()))
        );
    }

    #[test]
    fn test_algorithm_serde() {
        let json = serde_json::to_string(&Algorithm::StrictConservative).unwrap();
        assert_eq!(json, "\"dcid-hb\"");
        let parsed: ExperimentConfig = serde_json::from_str(r#"{"algorithm": "ih-hb"}"#).unwrap();
        assert_eq!(parsed.algorithm, Algorithm::Restart);
        assert_eq!(parsed.initial_max_budget, 27.0);
    }

    #[test]
    fn test_policies() {
        assert_eq!(Algorithm::Efficient.policy(), PolicyConfig::Efficient);
        assert_eq!(Algorithm::Restart.policy(), PolicyConfig::Efficient);
        assert_eq!(
            Algorithm::StrictConservative.policy(),
            PolicyConfig::strict_conservative()
        );
        assert!(!Algorithm::Restart.is_incremental());
        assert!(Algorithm::Conservative.is_incremental());
    }

    #[test]
    fn test_every_algorithm_reaches_final_budget() {
        let sampler = IndexSampler::new(10_000);
        for algorithm in Algorithm::ALL {
            let config = ExperimentConfig::new(algorithm).with_initial_max_budget(9.0);
            let result = run_experiment(&config, by_value(), &sampler).unwrap();
            assert_eq!(result.algorithm, algorithm);
            assert_eq!(result.performance, result.final_incumbent as f64);
            assert!(result.total_budget > 0.0);
        }
    }

    #[test]
    fn test_incremental_cheaper_than_restart() {
        let sampler = IndexSampler::new(10_000);
        let config = ExperimentConfig::new(Algorithm::Efficient).with_initial_max_budget(9.0);
        let incremental = run_experiment(&config, by_value(), &sampler).unwrap();
        let restart = run_experiment(
            &ExperimentConfig::new(Algorithm::Restart).with_initial_max_budget(9.0),
            by_value(),
            &sampler,
        )
        .unwrap();
        assert!(incremental.total_budget < restart.total_budget);
    }
}
