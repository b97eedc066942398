//! Behavior timer arena.
//!
//! Pending behavior timers live in one table keyed by NPC id rather than as
//! per-NPC callback handles, so cancellation is an immediate, idempotent
//! remove-by-key with no dangling callbacks. Timers fire against the logical
//! scene clock, synchronously inside the tick that observes them due.

use ahash::AHashMap;

use canopy_common::ids::NpcId;

/// Arena of pending behavior timers, at most one per NPC.
#[derive(Debug, Clone, Default)]
pub struct TimerArena {
    /// Absolute fire deadline (logical ms) per NPC
    deadlines: AHashMap<NpcId, u64>,
}

impl TimerArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms (or re-arms) the timer for an NPC at an absolute deadline.
    pub fn schedule(&mut self, id: NpcId, fire_at: u64) {
        self.deadlines.insert(id, fire_at);
    }

    /// Cancels the pending timer for an NPC.
    ///
    /// Returns whether a timer was pending. Cancelling an unarmed NPC is a
    /// no-op, which makes the pause path idempotent.
    pub fn cancel(&mut self, id: NpcId) -> bool {
        self.deadlines.remove(&id).is_some()
    }

    /// Whether the NPC currently has a pending timer.
    #[must_use]
    pub fn is_armed(&self, id: NpcId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// The pending deadline for an NPC, if armed.
    #[must_use]
    pub fn deadline(&self, id: NpcId) -> Option<u64> {
        self.deadlines.get(&id).copied()
    }

    /// Removes and returns every NPC whose timer is due at `now`, in
    /// ascending id order so firing is deterministic.
    pub fn due(&mut self, now: u64) -> Vec<NpcId> {
        let mut fired: Vec<NpcId> = self
            .deadlines
            .iter()
            .filter(|(_, &deadline)| deadline <= now)
            .map(|(&id, _)| id)
            .collect();
        fired.sort_unstable();
        for id in &fired {
            self.deadlines.remove(id);
        }
        fired
    }

    /// Number of pending timers.
    #[must_use]
    pub fn armed_count(&self) -> usize {
        self.deadlines.len()
    }
}
