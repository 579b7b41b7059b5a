//! Box-shaped search spaces
//!
//! Per-dimension bounds for real-valued configurations, with optional
//! log-scale sampling for parameters such as learning rates.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bounds for a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
    /// Sample uniformly in log space instead of linear space
    #[serde(default)]
    pub log_scale: bool,
}

impl Bounds {
    /// Create new linear bounds
    ///
    /// # Panics
    /// Panics if min > max
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self {
            min,
            max,
            log_scale: false,
        }
    }

    /// Create log-scale bounds
    ///
    /// # Panics
    /// Panics if min > max or min is not positive
    pub fn log(min: f64, max: f64) -> Self {
        assert!(
            min > 0.0,
            "Invalid log bounds: min ({}) must be positive",
            min
        );
        Self {
            log_scale: true,
            ..Self::new(min, max)
        }
    }

    /// Create symmetric bounds centered at 0
    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width, half_width)
    }

    /// Create unit bounds [0, 1]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Draw a value from these bounds
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.range() == 0.0 {
            return self.min;
        }
        let value = if self.log_scale {
            rng.gen_range(self.min.ln()..=self.max.ln()).exp()
        } else {
            rng.gen_range(self.min..=self.max)
        };
        // exp(ln(x)) may drift by an ulp
        self.clamp(value)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit()
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Multi-dimensional box search space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    /// Bounds for each dimension
    pub bounds: Vec<Bounds>,
}

impl SearchSpace {
    /// Create a new search space
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// Create uniform bounds for all dimensions
    pub fn uniform(bound: Bounds, dimension: usize) -> Self {
        Self {
            bounds: vec![bound; dimension],
        }
    }

    /// Create symmetric bounds for all dimensions
    pub fn symmetric(half_width: f64, dimension: usize) -> Self {
        Self::uniform(Bounds::symmetric(half_width), dimension)
    }

    /// Get number of dimensions
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Get bounds for a specific dimension
    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Check if all values are within bounds
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.bounds.len()
            && values
                .iter()
                .zip(&self.bounds)
                .all(|(&v, b)| b.contains(v))
    }

    /// Draw one point from the space
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.bounds.iter().map(|b| b.sample(rng)).collect()
    }
}

impl FromIterator<Bounds> for SearchSpace {
    fn from_iter<I: IntoIterator<Item = Bounds>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(f64, f64)> for SearchSpace {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().map(Bounds::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    #[should_panic(expected = "Invalid bounds")]
    fn test_bounds_invalid() {
        Bounds::new(5.0, -5.0);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_log_bounds_require_positive_min() {
        Bounds::log(0.0, 1.0);
    }

    #[test]
    fn test_bounds_contains_and_clamp() {
        let b = Bounds::new(-5.0, 5.0);
        assert!(b.contains(-5.0));
        assert!(!b.contains(5.1));
        assert_eq!(b.clamp(10.0), 5.0);
        assert_eq!(b.range(), 10.0);
    }

    #[test]
    fn test_bounds_sample_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let linear = Bounds::new(-2.0, 3.0);
        let log = Bounds::log(1e-4, 1e-1);
        for _ in 0..200 {
            assert!(linear.contains(linear.sample(&mut rng)));
            assert!(log.contains(log.sample(&mut rng)));
        }
    }

    #[test]
    fn test_degenerate_bounds_sample() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(Bounds::new(2.0, 2.0).sample(&mut rng), 2.0);
    }

    #[test]
    fn test_space_sample_dimension() {
        let mut rng = StdRng::seed_from_u64(1);
        let space = SearchSpace::symmetric(5.12, 4);
        let x = space.sample(&mut rng);
        assert_eq!(x.len(), 4);
        assert!(space.contains_vec(&x));
        assert!(!space.contains_vec(&x[..3]));
    }

    #[test]
    fn test_space_from_tuples() {
        let space: SearchSpace = vec![(0.0, 1.0), (-10.0, 10.0)].into_iter().collect();
        assert_eq!(space.dimension(), 2);
        assert_eq!(space.get(1), Some(&Bounds::new(-10.0, 10.0)));
        assert_eq!(space.get(2), None);
    }
}
