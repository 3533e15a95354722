//! # RandomNumberGenerator
//!
//! The generation loop draws every random decision (tournament draws, crossover
//! partners, mutation deltas) from a single [`RandomNumberGenerator`]. It wraps a
//! `StdRng` and implements [`RngCore`], so all of `rand::Rng` is available on it.
//!
//! ## Example
//!
//! ```rust
//! use rand::Rng;
//! use trivolve::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let x: u32 = rng.gen_range(0..10);
//! assert!(x < 10);
//! ```
//!
//! ## Thread-safe RNG
//!
//! Workers that build random individuals in parallel must not share a generator.
//! [`ThreadLocalRng`] hands out the calling thread's own entropy-seeded RNG:
//!
//! ```rust
//! use trivolve::rng::ThreadLocalRng;
//!
//! let coordinate: u32 = ThreadLocalRng::gen_range(0..200);
//! assert!(coordinate < 200);
//! ```

use rand::{
    distributions::uniform::{SampleRange, SampleUniform},
    rngs::{StdRng, ThreadRng},
    thread_rng, Rng, RngCore, SeedableRng,
};

/// A thread-local random number generator that can be used without synchronization.
///
/// It uses the built-in `ThreadRng` from the `rand` crate, which is seeded from
/// system entropy independently on every thread.
pub struct ThreadLocalRng;

impl ThreadLocalRng {
    /// Returns a handle to the calling thread's generator.
    pub fn rng() -> ThreadRng {
        thread_rng()
    }

    /// Generates a random number in the given range.
    pub fn gen_range<T, R>(range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        thread_rng().gen_range(range)
    }
}

/// A wrapper around the `rand` crate's `StdRng`.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible runs, tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeds from `seed` when present, otherwise from entropy.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map(Self::from_seed).unwrap_or_default()
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for RandomNumberGenerator {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
