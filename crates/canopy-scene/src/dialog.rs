//! Dialog session state and the touch/release protocol.
//!
//! One global dialog at a time: CLOSED, then a player-NPC touch opens it,
//! then a close input returns it to CLOSED and starts a cooldown window
//! during which no new dialog can open. A separate "can trigger" latch
//! stops one continuous overlap from reopening the dialog the instant it
//! closes; the proximity arbiter restores the latch once the player has
//! fully separated from every NPC.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use canopy_common::ids::NpcId;

use crate::animation::AnimationCatalog;
use crate::events::{EventBus, SceneEvent};
use crate::npc::NpcTable;
use crate::player::Player;
use crate::proximity::NEAR_THRESHOLD;
use crate::scheduler::BehaviorScheduler;
use crate::timers::TimerArena;

/// Minimum time in milliseconds between a dialog close and the next open.
pub const DIALOG_COOLDOWN_MS: u64 = 500;

/// Global dialog state. Created once per scene and reset, never destroyed,
/// on close.
///
/// Invariant: `is_open` implies `active_npc` is set and that NPC carries
/// `touching_player`; closed implies `active_npc` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSession {
    pub(crate) is_open: bool,
    pub(crate) active_npc: Option<NpcId>,
    pub(crate) last_close_at: Option<u64>,
    pub(crate) can_trigger: bool,
}

impl Default for DialogSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogSession {
    /// Creates a closed session with the trigger latch armed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            is_open: false,
            active_npc: None,
            last_close_at: None,
            can_trigger: true,
        }
    }

    /// Whether a dialog is currently open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// The engaged NPC while open, `None` while closed.
    #[must_use]
    pub const fn active_npc(&self) -> Option<NpcId> {
        self.active_npc
    }

    /// Timestamp of the most recent close, if any.
    #[must_use]
    pub const fn last_close_at(&self) -> Option<u64> {
        self.last_close_at
    }

    /// Whether a fresh touch is currently allowed to open a dialog.
    #[must_use]
    pub const fn can_trigger(&self) -> bool {
        self.can_trigger
    }
}

/// Runs the dialog state machine transitions.
#[derive(Debug, Clone)]
pub struct DialogController {
    cooldown_ms: u64,
    release_threshold: f32,
}

impl Default for DialogController {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogController {
    /// Creates a controller with the standard cooldown and release distance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cooldown_ms: DIALOG_COOLDOWN_MS,
            release_threshold: NEAR_THRESHOLD,
        }
    }

    /// Overrides the reopen cooldown.
    #[must_use]
    pub const fn with_cooldown(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    /// Overrides the distance at which a formerly engaged NPC walks off
    /// immediately after close instead of staying at rest.
    #[must_use]
    pub const fn with_release_threshold(mut self, threshold: f32) -> Self {
        self.release_threshold = threshold;
        self
    }

    /// Handles an edge-triggered player-NPC touch.
    ///
    /// Refused while a dialog is open, while the trigger latch is down, or
    /// within the cooldown window after the last close. On success the touch
    /// engages the NPC: it becomes the sole `touching_player` NPC, its
    /// collider and schedule are suspended, it is pinned immovable, the
    /// player freezes, and the dialog opens.
    ///
    /// Returns whether a dialog opened.
    #[allow(clippy::too_many_arguments)]
    pub fn on_player_touch(
        &self,
        session: &mut DialogSession,
        id: NpcId,
        npcs: &mut NpcTable,
        player: &mut Player,
        scheduler: &BehaviorScheduler,
        timers: &mut TimerArena,
        bus: &EventBus,
        now: u64,
    ) -> bool {
        if session.is_open || !session.can_trigger || self.in_cooldown(session, now) {
            return false;
        }
        let Some(npc) = npcs.get_mut(id) else {
            warn!(npc = id.value(), "touch event for unknown npc");
            return false;
        };

        session.can_trigger = false;
        npc.state.touching_player = true;
        npc.state.collider_active = false;
        scheduler.pause(id, npc, timers);
        npc.actor.set_immovable(true);
        player.set_frozen(true);
        session.is_open = true;
        session.active_npc = Some(id);

        bus.publish(SceneEvent::DialogOpened { npc: id });
        debug!(npc = %npc.definition.name, "dialog opened");
        true
    }

    /// Handles the close input.
    ///
    /// No-op while no dialog is open. Otherwise resets the session, starts
    /// the cooldown, and disengages the formerly active NPC: clears its
    /// touch flag, restores its collider, unpins it, and resumes its
    /// schedule. An NPC left behind at close walks off immediately if the
    /// player has drifted beyond the release distance, and stays at rest
    /// if the player is still close.
    ///
    /// Returns whether a dialog was closed.
    #[allow(clippy::too_many_arguments)]
    pub fn close(
        &self,
        session: &mut DialogSession,
        npcs: &mut NpcTable,
        player: &mut Player,
        scheduler: &mut BehaviorScheduler,
        timers: &mut TimerArena,
        catalog: &AnimationCatalog,
        bus: &EventBus,
        now: u64,
    ) -> bool {
        if !session.is_open {
            return false;
        }
        let Some(id) = session.active_npc else {
            warn!("open dialog with no active npc; resetting session");
            session.is_open = false;
            return false;
        };

        session.is_open = false;
        session.active_npc = None;
        session.last_close_at = Some(now);
        player.set_frozen(false);

        let Some(npc) = npcs.get_mut(id) else {
            warn!(npc = id.value(), "dialog partner missing at close");
            return false;
        };
        npc.state.touching_player = false;
        npc.state.collider_active = true;
        npc.actor.set_immovable(false);

        let distance = player.center().distance(npc.actor.center());
        if distance >= self.release_threshold {
            scheduler.resume_walking(id, npc, timers, catalog, bus, now);
        } else {
            scheduler.resume(id, npc, timers, bus, now);
        }

        bus.publish(SceneEvent::DialogClosed { npc: id });
        debug!(npc = %npc.definition.name, distance, "dialog closed");
        true
    }

    fn in_cooldown(&self, session: &DialogSession, now: u64) -> bool {
        session
            .last_close_at
            .is_some_and(|closed_at| now.saturating_sub(closed_at) < self.cooldown_ms)
    }
}
