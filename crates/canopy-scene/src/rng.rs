//! Deterministic RNG for behavior scheduling.
//!
//! A small linear congruential generator, seeded once per scene. Dwell
//! durations, starting phases, and wander directions all draw from it, so a
//! scene replays identically under a fixed seed and tick size.

use crate::motion::Facing;

/// Seedable LCG used by the behavior scheduler.
#[derive(Debug, Clone)]
pub struct BehaviorRng {
    state: u64,
}

impl BehaviorRng {
    /// Creates a new RNG from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advances the generator and returns the raw state.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }

    /// Draws from the high bits; the low bits of an LCG cycle quickly.
    fn next_bits(&mut self) -> u64 {
        self.next_u64() >> 33
    }

    /// Uniform draw from the half-open range `[min, max)`.
    ///
    /// Returns `min` when the range is empty.
    pub fn range_u64(&mut self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        min + self.next_bits() % (max - min)
    }

    /// Uniform coin flip.
    pub fn coin_flip(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    /// Uniform choice among the four axis-aligned facings.
    pub fn pick_facing(&mut self) -> Facing {
        Facing::ALL[(self.next_bits() % 4) as usize]
    }
}
