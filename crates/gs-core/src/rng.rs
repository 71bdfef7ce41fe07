//! Deterministic per-component RNG streams.
//!
//! # Determinism strategy
//!
//! Every stochastic component (actuator jitter, fin noise) owns its own
//! `SmallRng` seeded by:
//!
//!   seed = mission_seed XOR (stream_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream ids across the seed space.  Streams never
//! share state, so the order in which components draw numbers cannot change
//! another component's sequence; the same mission seed always reproduces the
//! same run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Identifies which component a stream belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RngStream {
    PumpJitter,
    PitchMotorJitter,
    FinJitter,
    FinNoise,
}

impl RngStream {
    fn id(self) -> u64 {
        match self {
            RngStream::PumpJitter       => 1,
            RngStream::PitchMotorJitter => 2,
            RngStream::FinJitter        => 3,
            RngStream::FinNoise         => 4,
        }
    }
}

// ── StreamRng ─────────────────────────────────────────────────────────────────

/// A component-owned deterministic RNG.
#[derive(Clone, Debug)]
pub struct StreamRng(SmallRng);

impl StreamRng {
    /// Seed deterministically from the mission seed and a stream id.
    pub fn new(mission_seed: u64, stream: RngStream) -> Self {
        let seed = mission_seed ^ stream.id().wrapping_mul(MIXING_CONSTANT);
        StreamRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for `rand` / `rand_distr` distributions
    /// (`rng.inner().sample(normal)`).
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
