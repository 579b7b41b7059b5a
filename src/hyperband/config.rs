//! Hyperband configuration

use serde::{Deserialize, Serialize};

use crate::error::{HyperbandError, Result};
use crate::evaluation::traits::Direction;
use crate::halving::policy::PolicyConfig;

/// How bracket results are compared when updating the incumbent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncumbentComparison {
    /// Honor the configured direction, like the ranking inside a bracket
    #[default]
    Directional,
    /// Always prefer the numerically smaller performance
    Ascending,
}

impl IncumbentComparison {
    /// Does `challenger` replace `incumbent`?
    pub fn replaces(self, direction: Direction, challenger: f64, incumbent: f64) -> bool {
        match self {
            Self::Directional => direction.is_better(challenger, incumbent),
            Self::Ascending => challenger < incumbent,
        }
    }
}

/// Configuration for a Hyperband run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperbandConfig {
    /// Budget every bracket eventually evaluates its survivors at (R)
    pub max_budget: f64,
    /// Elimination and budget-growth factor
    pub eta: f64,
    /// Whether lower or higher performances are better
    pub direction: Direction,
    /// Promotion policy used by every bracket
    pub policy: PolicyConfig,
    /// Global seed bracket seeds are derived from
    pub seed: u64,
    /// Incumbent update rule across brackets
    pub incumbent_comparison: IncumbentComparison,
    /// Evaluate a rung's missing scores in parallel (requires `parallel`)
    pub parallel_evaluation: bool,
    /// Log rung summaries at info level
    pub verbose: bool,
}

impl Default for HyperbandConfig {
    fn default() -> Self {
        Self {
            max_budget: 81.0,
            eta: 3.0,
            direction: Direction::Minimize,
            policy: PolicyConfig::Efficient,
            seed: 42,
            incumbent_comparison: IncumbentComparison::Directional,
            parallel_evaluation: true,
            verbose: false,
        }
    }
}

impl HyperbandConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the maximum budget
    pub fn with_max_budget(mut self, max_budget: f64) -> Self {
        self.max_budget = max_budget;
        self
    }

    /// Builder method to set eta
    pub fn with_eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    /// Builder method to set the direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Builder method to set the promotion policy
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Builder method to set the global seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the incumbent comparison
    pub fn with_incumbent_comparison(mut self, comparison: IncumbentComparison) -> Self {
        self.incumbent_comparison = comparison;
        self
    }

    /// Builder method to enable parallel evaluation
    pub fn with_parallel_evaluation(mut self, enabled: bool) -> Self {
        self.parallel_evaluation = enabled;
        self
    }

    /// Builder method to enable verbose logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.eta.is_finite() || self.eta <= 1.0 {
            return Err(HyperbandError::Configuration(format!(
                "eta must be a finite number greater than 1, got {}",
                self.eta
            )));
        }
        if !self.max_budget.is_finite() || self.max_budget < 1.0 {
            return Err(HyperbandError::Configuration(format!(
                "max_budget must be a finite number of at least 1, got {}",
                self.max_budget
            )));
        }
        Ok(())
    }

    /// Index of the most aggressive bracket: `floor(log_eta(max_budget))`
    ///
    /// A small tolerance keeps exact powers of eta from rounding down.
    pub fn s_max(&self) -> usize {
        (self.max_budget.ln() / self.eta.ln() + 1e-9).floor() as usize
    }

    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| HyperbandError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| HyperbandError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HyperbandConfig::default();
        assert_eq!(config.max_budget, 81.0);
        assert_eq!(config.eta, 3.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.s_max(), 4);
    }

    #[test]
    fn test_builder() {
        let config = HyperbandConfig::new()
            .with_max_budget(27.0)
            .with_eta(3.0)
            .with_direction(Direction::Maximize)
            .with_policy(PolicyConfig::strict_conservative())
            .with_seed(7)
            .with_incumbent_comparison(IncumbentComparison::Ascending)
            .with_parallel_evaluation(false)
            .with_verbose(true);

        assert_eq!(config.max_budget, 27.0);
        assert_eq!(config.direction, Direction::Maximize);
        assert_eq!(config.policy, PolicyConfig::Conservative { strict: true });
        assert_eq!(config.seed, 7);
        assert!(!config.parallel_evaluation);
        assert!(config.verbose);
        assert_eq!(config.s_max(), 3);
    }

    #[test]
    fn test_s_max_exact_powers() {
        for (budget, expected) in [(1.0, 0), (3.0, 1), (9.0, 2), (243.0, 5), (10.0, 2)] {
            let config = HyperbandConfig::new().with_max_budget(budget);
            assert_eq!(config.s_max(), expected, "budget {budget}");
        }
        let config = HyperbandConfig::new().with_max_budget(1000.0).with_eta(10.0);
        assert_eq!(config.s_max(), 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(HyperbandConfig::new().with_eta(1.0).validate().is_err());
        assert!(HyperbandConfig::new().with_eta(f64::NAN).validate().is_err());
        assert!(HyperbandConfig::new().with_max_budget(0.5).validate().is_err());
        assert!(HyperbandConfig::new()
            .with_max_budget(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_json_roundtrip_and_defaults() {
        let config = HyperbandConfig::new().with_policy(PolicyConfig::conservative());
        let json = config.to_json().unwrap();
        assert_eq!(HyperbandConfig::from_json(&json).unwrap(), config);

        let partial = HyperbandConfig::from_json(r#"{"max_budget": 9, "direction": "maximize"}"#)
            .unwrap();
        assert_eq!(partial.max_budget, 9.0);
        assert_eq!(partial.eta, 3.0);
        assert_eq!(partial.direction, Direction::Maximize);
    }

    #[test]
    fn test_json_rejects_invalid() {
        assert!(matches!(
            HyperbandConfig::from_json(r#"{"eta": 0.5}"#),
            Err(HyperbandError::Configuration(_))
        ));
        assert!(HyperbandConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_incumbent_comparison() {
        let directional = IncumbentComparison::Directional;
        let ascending = IncumbentComparison::Ascending;
        assert!(directional.replaces(Direction::Maximize, 2.0, 1.0));
        assert!(!ascending.replaces(Direction::Maximize, 2.0, 1.0));
        assert!(directional.replaces(Direction::Minimize, 1.0, 2.0));
        assert!(ascending.replaces(Direction::Minimize, 1.0, 2.0));
    }
}
