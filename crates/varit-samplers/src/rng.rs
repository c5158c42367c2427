use rand::{RngCore, SeedableRng};
/// Simple RNG key system for deterministic random number generation.
///
/// This provides a functional-style RNG key system similar to JAX's key splitting.
/// Keys are represented as u64 seeds, and we use ChaCha8 for deterministic splitting.
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

/// An RNG key for deterministic random number generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RngKey(pub u64);

impl RngKey {
    /// Create a new RNG key from a seed.
    pub fn new(seed: u64) -> Self {
        RngKey(seed)
    }

    /// Split this key into multiple independent keys.
    /// This is similar to JAX's `jax.random.split`.
    pub fn split(self, n: usize) -> Vec<RngKey> {
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![self];
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.0);
        (0..n).map(|_| RngKey(rng.next_u64())).collect()
    }

    /// Split into exactly two keys (common case).
    pub fn split_two(self) -> (RngKey, RngKey) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.0);
        (RngKey(rng.next_u64()), RngKey(rng.next_u64()))
    }

    /// Draw `n` samples from N(0, 1), fully determined by this key.
    ///
    /// Sampling happens on the host; callers upload the result to their device.
    pub fn standard_normal(self, n: usize) -> Vec<f32> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.0);
        (0..n).map(|_| StandardNormal.sample(&mut rng)).collect()
    }

    /// Get the seed value.
    pub fn seed(&self) -> u64 {
        self.0
    }
}
