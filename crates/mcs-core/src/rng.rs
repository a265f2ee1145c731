//! Deterministic RNG wrapper and seed-derivation helpers.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Deterministic RNG handle used by every mcs engine.
///
/// The handle is a thin wrapper around `Pcg64` that documents the seeding
/// policy used throughout the project. A master `seed: u64` must be provided
/// by the caller. Substreams are derived by hashing `(master_seed,
/// substream_id)` with SipHash-1-3 configured with fixed zero keys. This rule
/// is stable across platforms and must be used whenever deterministic
/// branching is required.
///
/// Unlike `StdRng`, the PCG state serializes, so a checkpointed engine
/// resumes with the exact random stream it would have produced uninterrupted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngHandle {
    rng: Pcg64,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Resets the internal generator state from a new master seed.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg64::seed_from_u64(seed);
    }

    /// Draws a uniform double in the half-open interval `[0, 1)`.
    ///
    /// Uses the upper 53 bits of one `next_u64` draw, so 1.0 is unreachable.
    pub fn uniform01(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draws a uniform integer strictly below `n`.
    pub fn uniform_int(&mut self, n: u32) -> u32 {
        self.rng.gen_range(0..n)
    }

    /// Returns a mutable reference to the underlying RNG for advanced usage.
    pub fn inner_mut(&mut self) -> &mut Pcg64 {
        &mut self.rng
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform01_stays_in_half_open_interval() {
        let mut rng = RngHandle::from_seed(17);
        for _ in 0..10_000 {
            let draw = rng.uniform01();
            assert!((0.0..1.0).contains(&draw));
        }
    }

    #[test]
    fn uniform_int_stays_below_bound() {
        let mut rng = RngHandle::from_seed(17);
        for _ in 0..10_000 {
            assert!(rng.uniform_int(7) < 7);
        }
    }

    #[test]
    fn substream_seeds_differ_per_substream() {
        let a = derive_substream_seed(42, 0);
        let b = derive_substream_seed(42, 1);
        assert_ne!(a, b);
    }
}
