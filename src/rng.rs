//! Explicit seeded random stream
//!
//! Generators never touch a global RNG. Callers own a [`SeedStream`], reseed it
//! right before a reproducible draw, and pass it down by `&mut`, so two
//! generators can only share an epoch if the caller hands them the same value.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded pseudo-random stream (ChaCha8)
#[derive(Debug, Clone)]
pub struct SeedStream {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeedStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Restart the stream. Draws after this are identical to a fresh `new(seed)`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Seed of the current epoch
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `[low, high)`; `low == high` returns `low`, reversed bounds are fine.
    #[inline]
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.rng.gen::<f64>()
    }

    /// `1.0` or `-1.0` with equal probability
    #[inline]
    pub fn sign(&mut self) -> f64 {
        if self.rng.gen_bool(0.5) {
            1.0
        } else {
            -1.0
        }
    }
}
