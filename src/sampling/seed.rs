//! Per-bracket seed derivation
//!
//! Every bracket draws its candidates from its own reproducible stream. The
//! stream's seed is a pure function of the global seed and the bracket index,
//! computed once and never changed afterwards.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const BRACKET_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Derive the sampling seed of `bracket` from a global seed
pub fn derive_bracket_seed(global_seed: u64, bracket: usize) -> u64 {
    let mixed = global_seed ^ (bracket as u64 + 1).wrapping_mul(BRACKET_STRIDE);
    StdRng::seed_from_u64(mixed).gen()
}

/// Cache of derived bracket seeds
///
/// A bracket's seed is derived on first request and then stays fixed for the
/// rest of the run, including after the maximum budget is extended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedSchedule {
    global_seed: u64,
    seeds: BTreeMap<usize, u64>,
}

impl SeedSchedule {
    /// Create an empty schedule for a global seed
    pub fn new(global_seed: u64) -> Self {
        Self {
            global_seed,
            seeds: BTreeMap::new(),
        }
    }

    /// The global seed all bracket seeds derive from
    pub fn global_seed(&self) -> u64 {
        self.global_seed
    }

    /// Seed of `bracket`, deriving and storing it on first use
    pub fn seed_for(&mut self, bracket: usize) -> u64 {
        let global_seed = self.global_seed;
        *self
            .seeds
            .entry(bracket)
            .or_insert_with(|| derive_bracket_seed(global_seed, bracket))
    }

    /// Seed of `bracket` if it was already derived
    pub fn get(&self, bracket: usize) -> Option<u64> {
        self.seeds.get(&bracket).copied()
    }

    /// Number of brackets with a derived seed
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Check whether no seed was derived yet
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}
