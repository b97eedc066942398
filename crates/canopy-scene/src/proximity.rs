//! Per-tick proximity and collision arbitration between player and NPCs.
//!
//! Two separate signals with distinct semantics:
//!
//! - "near" is level-triggered, re-evaluated every tick: body-center
//!   distance below a threshold, or body overlap. A near NPC has its
//!   wandering suspended so it cannot drift away mid-approach.
//! - "touch" is edge-triggered: the first tick of body overlap. Touches are
//!   detected here but handled by the dialog controller, which owns the
//!   engaged state.
//!
//! Arbitration for every NPC runs before any movement decision in the same
//! tick, so an NPC that becomes near is already stopped when movement is
//! evaluated.

use tracing::warn;

use canopy_common::ids::NpcId;

use crate::dialog::DialogSession;
use crate::events::{EventBus, SceneEvent};
use crate::npc::NpcTable;
use crate::player::Player;
use crate::scheduler::BehaviorScheduler;
use crate::timers::TimerArena;

/// Distance between body centers, in world units, below which an NPC counts
/// as near the player.
pub const NEAR_THRESHOLD: f32 = 50.0;

/// Runs the per-tick proximity rules.
#[derive(Debug, Clone)]
pub struct ProximityArbiter {
    near_threshold: f32,
}

impl Default for ProximityArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProximityArbiter {
    /// Creates an arbiter with the standard near threshold.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            near_threshold: NEAR_THRESHOLD,
        }
    }

    /// Overrides the near distance threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f32) -> Self {
        self.near_threshold = threshold;
        self
    }

    /// Evaluates every NPC against the current player position and applies
    /// the freeze/release rules. Returns the ids of NPCs whose bodies
    /// currently overlap the player's, in ascending id order; the caller
    /// derives edge-triggered touch events from consecutive returns.
    ///
    /// Rules, per NPC:
    ///
    /// - near and not engaged: suspend wandering, deactivate the collider,
    ///   pin immovable, hold the idle pose
    /// - no longer near, suspended, not engaged: restore collider and
    ///   mobility, resume the schedule
    /// - engaged but no longer overlapping while no dialog is open: clear
    ///   the stale engagement and release
    ///
    /// The player is frozen for the tick only while an engaged dialog
    /// partner is near; a merely-near NPC never blocks player movement.
    /// Once the player overlaps no NPC at all, the dialog trigger latch is
    /// restored.
    pub fn arbitrate(
        &self,
        player: &mut Player,
        npcs: &mut NpcTable,
        session: &mut DialogSession,
        scheduler: &mut BehaviorScheduler,
        timers: &mut TimerArena,
        bus: &EventBus,
        now: u64,
    ) -> Vec<NpcId> {
        let player_center = player.center();
        let player_body = player.body();
        let mut overlapping = Vec::new();
        let mut engaged_near = false;

        for id in npcs.ids() {
            let Some(npc) = npcs.get_mut(id) else {
                continue;
            };
            let distance = player_center.distance(npc.actor.center());
            let overlap = player_body.overlaps(&npc.actor.body());
            let near = distance < self.near_threshold || overlap;

            if overlap {
                overlapping.push(id);
            }

            if near && !npc.state.touching_player {
                let newly_frozen = !npc.state.movement_interrupted;
                scheduler.pause(id, npc, timers);
                npc.state.collider_active = false;
                npc.actor.set_immovable(true);
                if newly_frozen {
                    bus.publish(SceneEvent::NpcFrozen { npc: id });
                }
            } else if !near && npc.state.movement_interrupted && !npc.state.touching_player {
                npc.state.collider_active = true;
                npc.actor.set_immovable(false);
                scheduler.resume(id, npc, timers, bus, now);
                bus.publish(SceneEvent::NpcReleased { npc: id });
            }

            if !overlap && npc.state.touching_player && !session.is_open() {
                warn!(npc = id.value(), "clearing stale touch engagement");
                npc.state.touching_player = false;
                npc.state.collider_active = true;
                npc.actor.set_immovable(false);
                scheduler.resume(id, npc, timers, bus, now);
                bus.publish(SceneEvent::NpcReleased { npc: id });
            }

            if near && npc.state.touching_player {
                engaged_near = true;
            }
        }

        player.set_frozen(engaged_near);

        if overlapping.is_empty() {
            session.can_trigger = true;
        }

        overlapping
    }
}
