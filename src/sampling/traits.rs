//! Sampler traits
//!
//! This module defines how the scheduler requests fresh candidates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::space::SearchSpace;
use crate::error::Result;

/// A request for fresh candidate payloads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRequest {
    /// Index of the requesting bracket in the orchestrator's bracket list
    pub bracket: usize,
    /// Number of payloads to return
    pub count: usize,
    /// Seed derived for this bracket
    pub seed: u64,
    /// Payloads already drawn for this bracket by earlier runs
    pub offset: usize,
}

/// Sampler trait
///
/// Draws new candidate payloads for a bracket. A sampler must return exactly
/// `request.count` payloads; a request for zero payloads returns an empty
/// vector. Samplers should be deterministic given the request.
pub trait Sampler<P> {
    /// Draw `request.count` payloads
    fn sample(&self, request: &SampleRequest) -> Result<Vec<P>>;
}

impl<P, S: Sampler<P> + ?Sized> Sampler<P> for &S {
    fn sample(&self, request: &SampleRequest) -> Result<Vec<P>> {
        (**self).sample(request)
    }
}

/// Replay a bracket's draw stream and return the requested window
///
/// The stream restarts from the bracket seed on every call; the first
/// `offset` draws are discarded so later runs continue where earlier ones
/// stopped instead of drawing the same payloads again.
pub fn draw_window<P, F>(request: &SampleRequest, mut draw: F) -> Vec<P>
where
    F: FnMut(&mut StdRng) -> P,
{
    let mut rng = StdRng::seed_from_u64(request.seed);
    for _ in 0..request.offset {
        draw(&mut rng);
    }
    (0..request.count).map(|_| draw(&mut rng)).collect()
}

/// A closure-backed sampler
pub struct FnSampler<P, F>
where
    F: Fn(&mut StdRng) -> P,
{
    f: F,
    _marker: std::marker::PhantomData<fn() -> P>,
}

impl<P, F> FnSampler<P, F>
where
    F: Fn(&mut StdRng) -> P,
{
    /// Create a sampler from a function drawing one payload
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<P, F> Sampler<P> for FnSampler<P, F>
where
    F: Fn(&mut StdRng) -> P,
{
    fn sample(&self, request: &SampleRequest) -> Result<Vec<P>> {
        Ok(draw_window(request, &self.f))
    }
}

/// Uniform sampler over a box search space
#[derive(Clone, Debug)]
pub struct UniformSampler {
    space: SearchSpace,
}

impl UniformSampler {
    /// Create a uniform sampler over `space`
    pub fn new(space: SearchSpace) -> Self {
        Self { space }
    }

    /// Get the search space
    pub fn space(&self) -> &SearchSpace {
        &self.space
    }
}

impl Sampler<Vec<f64>> for UniformSampler {
    fn sample(&self, request: &SampleRequest) -> Result<Vec<Vec<f64>>> {
        Ok(draw_window(request, |rng| self.space.sample(rng)))
    }
}

/// Sampler drawing integer identifiers, mostly useful for tests
#[derive(Clone, Debug)]
pub struct IndexSampler {
    upper: u64,
}

impl IndexSampler {
    /// Sample identifiers uniformly from `0..upper`
    pub fn new(upper: u64) -> Self {
        Self {
            upper: upper.max(1),
        }
    }
}

impl Sampler<u64> for IndexSampler {
    fn sample(&self, request: &SampleRequest) -> Result<Vec<u64>> {
        Ok(draw_window(request, |rng| rng.gen_range(0..self.upper)))
    }
}
