//! Autonomous NPC behavior scheduling.
//!
//! Each NPC alternates between two phases on randomized dwell timers:
//!
//! - `Resting`: stationary, idle pose, for 2 to 4 seconds
//! - `Walking`: moving in one of the four cardinal directions, for 3 to 6
//!   seconds
//!
//! The alternation is strict while the NPC is left alone. Proximity and
//! dialog interrupt it through [`BehaviorScheduler::pause`]; the matching
//! resume operations re-enter the cycle at a phase boundary with a fresh
//! dwell, never partway through a stale one. A timer that fires for an
//! interrupted NPC is stale and is ignored.

use crate::animation::AnimationCatalog;
use crate::events::{EventBus, SceneEvent};
use crate::motion::AnimationCue;
use crate::npc::{Npc, NpcPhase};
use crate::rng::BehaviorRng;
use crate::timers::TimerArena;
use canopy_common::ids::NpcId;

/// Resting dwell range in milliseconds, half-open.
pub const REST_DWELL_MS: (u64, u64) = (2000, 4000);

/// Walking dwell range in milliseconds, half-open.
pub const WALK_DWELL_MS: (u64, u64) = (3000, 6000);

/// Drives the rest/walk alternation for every NPC in a scene.
///
/// The scheduler owns the behavior random stream; given the same seed and
/// the same sequence of operations it reproduces the same phases, directions,
/// and dwells.
#[derive(Debug, Clone)]
pub struct BehaviorScheduler {
    rng: BehaviorRng,
    rest_dwell: (u64, u64),
    walk_dwell: (u64, u64),
}

impl BehaviorScheduler {
    /// Creates a scheduler with the standard dwell ranges.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: BehaviorRng::new(seed),
            rest_dwell: REST_DWELL_MS,
            walk_dwell: WALK_DWELL_MS,
        }
    }

    /// Overrides the dwell ranges. Ranges are half-open `[min, max)`.
    #[must_use]
    pub const fn with_dwells(mut self, rest: (u64, u64), walk: (u64, u64)) -> Self {
        self.rest_dwell = rest;
        self.walk_dwell = walk;
        self
    }

    /// Starts an NPC's behavior cycle in a randomly chosen phase and arms
    /// its first dwell timer.
    pub fn initialize(
        &mut self,
        id: NpcId,
        npc: &mut Npc,
        timers: &mut TimerArena,
        catalog: &AnimationCatalog,
        now: u64,
    ) {
        npc.state.movement_interrupted = false;
        if self.rng.coin_flip() {
            self.enter_walking(id, npc, timers, catalog, now);
        } else {
            self.enter_resting(id, npc, timers, now);
        }
    }

    /// Handles a fired dwell timer by flipping the NPC to the other phase.
    ///
    /// A timer that fires while the NPC is interrupted is stale (the
    /// interruption should have canceled it) and is dropped without effect.
    pub fn on_timer_fire(
        &mut self,
        id: NpcId,
        npc: &mut Npc,
        timers: &mut TimerArena,
        catalog: &AnimationCatalog,
        bus: &EventBus,
        now: u64,
    ) {
        if npc.state.movement_interrupted {
            return;
        }
        match npc.state.phase {
            NpcPhase::Resting => self.enter_walking(id, npc, timers, catalog, now),
            NpcPhase::Walking => self.enter_resting(id, npc, timers, now),
        }
        bus.publish(SceneEvent::NpcPhaseChanged {
            npc: id,
            phase: npc.state.phase,
        });
    }

    /// Suspends the cycle: cancels the pending dwell timer, stops movement,
    /// and holds the idle pose. The current phase is left as-is. Safe to call
    /// on an already paused NPC.
    pub fn pause(&self, id: NpcId, npc: &mut Npc, timers: &mut TimerArena) {
        timers.cancel(id);
        npc.state.movement_interrupted = true;
        npc.actor.stop();
        npc.state.cue = AnimationCue::Idle(npc.actor.facing());
    }

    /// Resumes a paused NPC into a fresh `Resting` phase with a full rest
    /// dwell. Used when the player walks away from a frozen NPC. A no-op
    /// for an NPC that is not interrupted.
    pub fn resume(
        &mut self,
        id: NpcId,
        npc: &mut Npc,
        timers: &mut TimerArena,
        bus: &EventBus,
        now: u64,
    ) {
        if !npc.state.movement_interrupted {
            return;
        }
        let was_walking = npc.state.phase == NpcPhase::Walking;
        npc.state.movement_interrupted = false;
        self.enter_resting(id, npc, timers, now);
        if was_walking {
            bus.publish(SceneEvent::NpcPhaseChanged {
                npc: id,
                phase: NpcPhase::Resting,
            });
        }
    }

    /// Resumes a paused NPC straight into a fresh `Walking` phase with a new
    /// random direction and a full walk dwell. Used when a dialog closes with
    /// the player already out of range.
    pub fn resume_walking(
        &mut self,
        id: NpcId,
        npc: &mut Npc,
        timers: &mut TimerArena,
        catalog: &AnimationCatalog,
        bus: &EventBus,
        now: u64,
    ) {
        let was_resting = npc.state.phase == NpcPhase::Resting;
        npc.state.movement_interrupted = false;
        self.enter_walking(id, npc, timers, catalog, now);
        if was_resting {
            bus.publish(SceneEvent::NpcPhaseChanged {
                npc: id,
                phase: NpcPhase::Walking,
            });
        }
    }

    fn enter_resting(&mut self, id: NpcId, npc: &mut Npc, timers: &mut TimerArena, now: u64) {
        npc.state.phase = NpcPhase::Resting;
        npc.actor.stop();
        npc.state.cue = AnimationCue::Idle(npc.actor.facing());
        let dwell = self.rng.range_u64(self.rest_dwell.0, self.rest_dwell.1);
        timers.schedule(id, now + dwell);
    }

    fn enter_walking(
        &mut self,
        id: NpcId,
        npc: &mut Npc,
        timers: &mut TimerArena,
        catalog: &AnimationCatalog,
        now: u64,
    ) {
        npc.state.phase = NpcPhase::Walking;
        let direction = self.rng.pick_facing();
        npc.actor
            .set_velocity(direction.to_vec2() * npc.definition.speed);
        let raw = AnimationCue::Walk(npc.actor.facing());
        npc.state.cue = catalog.resolve(npc.definition.sheet, raw);
        let dwell = self.rng.range_u64(self.walk_dwell.0, self.walk_dwell.1);
        timers.schedule(id, now + dwell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use crate::animation::SpriteSheet;
    use crate::motion::Facing;
    use crate::npc::{NpcDefinition, NpcState};
    use canopy_common::geom::Vec2;
    use proptest::prelude::*;

    fn create_test_npc() -> Npc {
        Npc {
            definition: NpcDefinition::new("test-gorilla", SpriteSheet::Gorilla),
            actor: Actor::new(Vec2::new(100.0, 100.0)),
            state: NpcState::default(),
        }
    }

    fn create_test_world() -> (TimerArena, AnimationCatalog, EventBus) {
        (TimerArena::new(), AnimationCatalog::standard(), EventBus::new(64))
    }

    #[test]
    fn test_initialize_arms_first_timer() {
        let mut scheduler = BehaviorScheduler::new(7);
        let (mut timers, catalog, _bus) = create_test_world();
        let mut npc = create_test_npc();
        let id = NpcId::new(1);

        scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);

        assert!(timers.is_armed(id));
        assert!(!npc.state.movement_interrupted);
        match npc.state.phase {
            NpcPhase::Resting => assert_eq!(npc.actor.velocity(), Vec2::ZERO),
            NpcPhase::Walking => assert!(!npc.actor.velocity().is_zero()),
        }
    }

    #[test]
    fn test_phase_alternates_only_uninterrupted() {
        let mut scheduler = BehaviorScheduler::new(42);
        let (mut timers, catalog, bus) = create_test_world();
        let mut npc = create_test_npc();
        let id = NpcId::new(1);
        scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);

        let mut previous = npc.state.phase;
        for _ in 0..20 {
            let now = timers.deadline(id).expect("timer armed");
            for fired in timers.due(now) {
                scheduler.on_timer_fire(fired, &mut npc, &mut timers, &catalog, &bus, now);
            }
            assert_ne!(npc.state.phase, previous, "uninterrupted phases must alternate");
            previous = npc.state.phase;
        }
    }

    #[test]
    fn test_walking_sets_cardinal_velocity() {
        let mut scheduler = BehaviorScheduler::new(3);
        let (mut timers, catalog, bus) = create_test_world();
        let mut npc = create_test_npc();
        let id = NpcId::new(1);
        scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);

        // Step until a walking phase comes up
        for _ in 0..4 {
            if npc.state.phase == NpcPhase::Walking {
                break;
            }
            let now = timers.deadline(id).expect("timer armed");
            scheduler.on_timer_fire(id, &mut npc, &mut timers, &catalog, &bus, now);
        }

        assert_eq!(npc.state.phase, NpcPhase::Walking);
        let v = npc.actor.velocity();
        let speed = npc.definition.speed;
        let cardinal = (v.x.abs() == speed && v.y == 0.0) || (v.y.abs() == speed && v.x == 0.0);
        assert!(cardinal, "walk velocity must be axis-aligned at npc speed: {v:?}");
        assert!(npc.state.cue.is_walking());
    }

    #[test]
    fn test_pause_cancels_timer_and_stops() {
        let mut scheduler = BehaviorScheduler::new(11);
        let (mut timers, catalog, _bus) = create_test_world();
        let mut npc = create_test_npc();
        let id = NpcId::new(1);
        scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);

        scheduler.pause(id, &mut npc, &mut timers);

        assert!(npc.state.movement_interrupted);
        assert!(!timers.is_armed(id));
        assert_eq!(npc.actor.velocity(), Vec2::ZERO);
        assert!(!npc.state.cue.is_walking());

        // Pausing again is harmless
        scheduler.pause(id, &mut npc, &mut timers);
        assert!(npc.state.movement_interrupted);
    }

    #[test]
    fn test_stale_timer_ignored_while_interrupted() {
        let mut scheduler = BehaviorScheduler::new(11);
        let (mut timers, catalog, bus) = create_test_world();
        let mut npc = create_test_npc();
        let id = NpcId::new(1);
        scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);
        let phase_before = npc.state.phase;
        scheduler.pause(id, &mut npc, &mut timers);

        // Deliver a fire that raced with the pause
        scheduler.on_timer_fire(id, &mut npc, &mut timers, &catalog, &bus, 10_000);

        assert_eq!(npc.state.phase, phase_before);
        assert!(!timers.is_armed(id), "stale fire must not re-arm");
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_resume_enters_fresh_resting() {
        let mut scheduler = BehaviorScheduler::new(5);
        let (mut timers, catalog, bus) = create_test_world();
        let mut npc = create_test_npc();
        let id = NpcId::new(1);
        scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);
        scheduler.pause(id, &mut npc, &mut timers);

        scheduler.resume(id, &mut npc, &mut timers, &bus, 1000);

        assert!(!npc.state.movement_interrupted);
        assert_eq!(npc.state.phase, NpcPhase::Resting);
        assert_eq!(npc.actor.velocity(), Vec2::ZERO);
        let deadline = timers.deadline(id).expect("rest dwell armed");
        assert!(deadline >= 1000 + REST_DWELL_MS.0 && deadline < 1000 + REST_DWELL_MS.1);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut scheduler = BehaviorScheduler::new(5);
        let (mut timers, catalog, bus) = create_test_world();
        let mut npc = create_test_npc();
        let id = NpcId::new(1);
        scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);
        let phase = npc.state.phase;
        let deadline = timers.deadline(id).expect("timer armed");

        scheduler.resume(id, &mut npc, &mut timers, &bus, 500);

        assert_eq!(npc.state.phase, phase);
        assert_eq!(timers.deadline(id), Some(deadline));
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_resume_walking_picks_new_direction() {
        let mut scheduler = BehaviorScheduler::new(5);
        let (mut timers, catalog, bus) = create_test_world();
        let mut npc = create_test_npc();
        let id = NpcId::new(1);
        scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);
        scheduler.pause(id, &mut npc, &mut timers);

        scheduler.resume_walking(id, &mut npc, &mut timers, &catalog, &bus, 1000);

        assert!(!npc.state.movement_interrupted);
        assert_eq!(npc.state.phase, NpcPhase::Walking);
        assert!(!npc.actor.velocity().is_zero());
        let deadline = timers.deadline(id).expect("walk dwell armed");
        assert!(deadline >= 1000 + WALK_DWELL_MS.0 && deadline < 1000 + WALK_DWELL_MS.1);
    }

    #[test]
    fn test_missing_walk_clip_degrades_npc_cue() {
        let mut scheduler = BehaviorScheduler::new(5);
        let mut timers = TimerArena::new();
        let bus = EventBus::new(64);
        let mut catalog = AnimationCatalog::standard();
        for facing in Facing::ALL {
            catalog.remove_walk(SpriteSheet::Gorilla, facing);
        }
        let mut npc = create_test_npc();
        let id = NpcId::new(1);
        scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);
        scheduler.pause(id, &mut npc, &mut timers);

        scheduler.resume_walking(id, &mut npc, &mut timers, &catalog, &bus, 0);

        // Movement happens even though the walk animation is unavailable
        assert!(!npc.actor.velocity().is_zero());
        assert!(!npc.state.cue.is_walking());
    }

    #[test]
    fn test_same_seed_reproduces_schedule() {
        let run = |seed: u64| {
            let mut scheduler = BehaviorScheduler::new(seed);
            let (mut timers, catalog, bus) = create_test_world();
            let mut npc = create_test_npc();
            let id = NpcId::new(1);
            scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);
            let mut trace = Vec::new();
            for _ in 0..8 {
                let now = timers.deadline(id).expect("timer armed");
                scheduler.on_timer_fire(id, &mut npc, &mut timers, &catalog, &bus, now);
                trace.push((now, npc.state.phase, npc.actor.facing()));
            }
            trace
        };

        assert_eq!(run(99), run(99));
        assert_ne!(run(99), run(100));
    }

    proptest! {
        #[test]
        fn prop_rest_dwell_in_range(seed in 0u64..10_000) {
            let mut scheduler = BehaviorScheduler::new(seed);
            let (mut timers, catalog, bus) = create_test_world();
            let mut npc = create_test_npc();
            let id = NpcId::new(1);
            scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);

            let mut now = 0;
            for _ in 0..6 {
                let deadline = timers.deadline(id).expect("timer armed");
                let dwell = deadline - now;
                match npc.state.phase {
                    NpcPhase::Resting => {
                        prop_assert!(dwell >= REST_DWELL_MS.0 && dwell < REST_DWELL_MS.1);
                    },
                    NpcPhase::Walking => {},
                }
                now = deadline;
                scheduler.on_timer_fire(id, &mut npc, &mut timers, &catalog, &bus, now);
            }
        }

        #[test]
        fn prop_walk_dwell_in_range(seed in 0u64..10_000) {
            let mut scheduler = BehaviorScheduler::new(seed);
            let (mut timers, catalog, bus) = create_test_world();
            let mut npc = create_test_npc();
            let id = NpcId::new(1);
            scheduler.initialize(id, &mut npc, &mut timers, &catalog, 0);

            let mut now = 0;
            for _ in 0..6 {
                let deadline = timers.deadline(id).expect("timer armed");
                let dwell = deadline - now;
                match npc.state.phase {
                    NpcPhase::Walking => {
                        prop_assert!(dwell >= WALK_DWELL_MS.0 && dwell < WALK_DWELL_MS.1);
                    },
                    NpcPhase::Resting => {},
                }
                now = deadline;
                scheduler.on_timer_fire(id, &mut npc, &mut timers, &catalog, &bus, now);
            }
        }
    }
}
