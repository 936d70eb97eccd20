//! Seeded random source
//!
//! Every random decision in a run draws from one `SimRng`, so two runs with
//! the same seed and the same inputs play out identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    seed: u64,
    inner: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in [0, 1)
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Uniform in [min, max); returns `min` for an empty range
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.inner.random_range(min..max)
        } else {
            min
        }
    }

    /// Uniform index in [0, len); 0 for an empty range
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 { 0 } else { self.inner.random_range(0..len) }
    }

    /// True with probability `p` (values outside [0, 1] saturate)
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Uniform angle in [0, 2π)
    pub fn angle(&mut self) -> f32 {
        self.range(0.0, std::f32::consts::TAU)
    }

    /// Offset with each component uniform in [-half, half)
    pub fn jitter(&mut self, half: f32) -> Vec2 {
        Vec2::new(self.range(-half, half), self.range(-half, half))
    }
}
