//! Logical scene clock.
//!
//! The simulation runs on logical milliseconds, advanced once per tick by
//! the orchestrator. Behavior timers and the dialog cooldown compare against
//! this clock, never against wall time, so a scene is fully deterministic
//! under a fixed tick size.

use serde::{Deserialize, Serialize};

/// Monotonic logical clock, in milliseconds since scene start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneClock {
    /// Current logical time in milliseconds.
    now: u64,
}

impl SceneClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current logical time in milliseconds.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Advances the clock by one tick and returns the new time.
    pub fn advance(&mut self, dt_ms: u64) -> u64 {
        self.now = self.now.saturating_add(dt_ms);
        self.now
    }

    /// Milliseconds elapsed since an earlier instant (zero if in the future).
    #[must_use]
    pub const fn since(&self, instant: u64) -> u64 {
        self.now.saturating_sub(instant)
    }
}
