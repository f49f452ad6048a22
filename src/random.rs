//! Uniform random helpers
//!
//! Explicitly owned generator instances instead of process-wide hidden
//! state: applications create a [`RandomSource`], pass it where needed,
//! and can seed it for reproducible runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// An owned uniform random source.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// A source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A deterministic source for reproducible runs and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit_f64(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform value in `[min, max)`.
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        self.rng.gen_range(min..max)
    }

    /// Uniform integer in `[0, max)`.
    pub fn below_u32(&mut self, max: u32) -> u32 {
        self.rng.gen_range(0..max)
    }

    /// Uniform integer in `[min, max)`.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        self.rng.gen_range(min..max)
    }
}
