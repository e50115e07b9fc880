//! Deterministic per-request and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Every routing request gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR mix(person) XOR mix(trip_index) XOR mix(iteration)
//!
//! where `mix(v) = (v + 1) * MIXING_CONSTANT` and the constant is the 64-bit
//! fractional part of the golden ratio, which spreads consecutive values
//! uniformly across the seed space.  This means:
//!
//! - Requests never share RNG state, so they can run on any thread in any
//!   order and still draw the same numbers.
//! - Growing the population does not disturb the seeds of existing persons.
//!
//! Consumers that only need "pick one of `n`" take `&mut dyn RandomSource`,
//! so tests can substitute a [`FixedSequence`] and assert exact choices.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::PersonId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

#[inline]
fn mix(v: u64) -> u64 {
    v.wrapping_add(1).wrapping_mul(MIXING_CONSTANT)
}

// ── RandomSource ──────────────────────────────────────────────────────────────

/// The only randomness the routing core needs: a uniform index.
pub trait RandomSource {
    /// Uniform index in `0..len`.
    ///
    /// # Panics
    /// May panic if `len == 0`; callers guarantee a non-empty range.
    fn next_index(&mut self, len: usize) -> usize;
}

// ── RequestRng ────────────────────────────────────────────────────────────────

/// Per-request deterministic RNG.
///
/// Cheap to construct; build one on the worker thread that handles the
/// request and drop it afterwards.
pub struct RequestRng(SmallRng);

impl RequestRng {
    /// Seed deterministically from the run's global seed and the request's
    /// identity.
    pub fn new(global_seed: u64, person: PersonId, trip_index: u32, iteration: u32) -> Self {
        let seed = global_seed
            ^ mix(u64::from(person.0))
            ^ mix(u64::from(trip_index)).rotate_left(21)
            ^ mix(u64::from(iteration)).rotate_left(42);
        RequestRng(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for RequestRng {
    #[inline]
    fn next_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global, single-threaded operations such as
/// population synthesis.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

impl RandomSource for SimRng {
    #[inline]
    fn next_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

// ── FixedSequence ─────────────────────────────────────────────────────────────

/// A scripted [`RandomSource`] that replays `indices` in order, cycling.
///
/// Each value is reduced modulo the requested `len`, so a script never
/// produces an out-of-range index.  Used to reproduce a specific choice
/// sequence exactly.
#[derive(Clone, Debug)]
pub struct FixedSequence {
    indices: Vec<usize>,
    pos:     usize,
}

impl FixedSequence {
    /// # Panics
    /// Panics if `indices` is empty.
    pub fn new(indices: Vec<usize>) -> Self {
        assert!(!indices.is_empty(), "FixedSequence needs at least one index");
        Self { indices, pos: 0 }
    }

    /// How many indices have been drawn so far.
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for FixedSequence {
    fn next_index(&mut self, len: usize) -> usize {
        let v = self.indices[self.pos % self.indices.len()];
        self.pos += 1;
        v % len
    }
}
