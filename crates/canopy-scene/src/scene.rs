//! Scene orchestration: one logical frame per `tick` call.
//!
//! The scene owns every collaborator (player, NPC table, dwell timers,
//! behavior scheduler, proximity arbiter, dialog controller, event bus,
//! logical clock) and drives them in a fixed order per tick:
//!
//! 1. advance the logical clock
//! 2. proximity arbitration for every NPC, before any movement decision
//! 3. close input, if a dialog is open
//! 4. edge-triggered touches derived from newly started body overlaps
//! 5. due dwell timers, each running to completion
//! 6. player movement from input
//! 7. NPC movement for walking, non-interrupted NPCs
//!
//! Everything is synchronous single-threaded computation; there is no
//! blocking and no re-entrancy.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use canopy_common::clock::SceneClock;
use canopy_common::geom::Vec2;
use canopy_common::ids::NpcId;

use crate::animation::{AnimationCatalog, AnimationError, SpriteSheet};
use crate::dialog::{DialogController, DialogSession, DIALOG_COOLDOWN_MS};
use crate::events::{EventBus, SceneEvent};
use crate::motion::{AnimationCue, Facing};
use crate::npc::{Npc, NpcDefinition, NpcPhase, NpcTable};
use crate::player::{Player, PlayerConfig};
use crate::proximity::{ProximityArbiter, NEAR_THRESHOLD};
use crate::scheduler::{BehaviorScheduler, REST_DWELL_MS, WALK_DWELL_MS};
use crate::terrain::{move_actor, TerrainQuery, TILE_SIZE};
use crate::timers::TimerArena;

/// Errors raised during scene construction.
///
/// All of these are fatal: a scene missing a required subsystem must not
/// start. Runtime invariant violations are absorbed as no-ops instead and
/// never surface here.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The animation catalog failed startup validation.
    #[error("animation catalog invalid: {0}")]
    Animation(#[from] AnimationError),
    /// The scene was given no NPCs to schedule.
    #[error("npc roster is empty")]
    EmptyRoster,
}

/// Result alias for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;

/// Scene tuning, mapped from configuration by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneParams {
    /// Seed for the behavior random stream.
    pub seed: u64,
    /// Player spawn position.
    pub player_start: Vec2,
    /// Player walk speed in world units per second.
    pub player_speed: f32,
    /// Edge length of one terrain tile in world units.
    pub tile_size: f32,
    /// Body-center distance below which an NPC counts as near.
    pub near_threshold: f32,
    /// Minimum time between a dialog close and the next open.
    pub dialog_cooldown_ms: u64,
    /// Resting dwell range in milliseconds, half-open.
    pub rest_dwell_ms: (u64, u64),
    /// Walking dwell range in milliseconds, half-open.
    pub walk_dwell_ms: (u64, u64),
    /// Event bus capacity.
    pub event_capacity: usize,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            seed: 0,
            player_start: Vec2::new(400.0, 300.0),
            player_speed: 120.0,
            tile_size: TILE_SIZE,
            near_threshold: NEAR_THRESHOLD,
            dialog_cooldown_ms: DIALOG_COOLDOWN_MS,
            rest_dwell_ms: REST_DWELL_MS,
            walk_dwell_ms: WALK_DWELL_MS,
            event_capacity: 256,
        }
    }
}

/// Per-tick input from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Raw movement axis vector; normalized before speed is applied.
    pub movement: Vec2,
    /// Edge-triggered close input for an open dialog.
    pub confirm: bool,
}

impl TickInput {
    /// No movement, no close input.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            movement: Vec2::ZERO,
            confirm: false,
        }
    }

    /// Movement along an axis vector.
    #[must_use]
    pub const fn walk(movement: Vec2) -> Self {
        Self {
            movement,
            confirm: false,
        }
    }

    /// Close input with no movement.
    #[must_use]
    pub const fn close() -> Self {
        Self {
            movement: Vec2::ZERO,
            confirm: true,
        }
    }
}

/// Renderable view of the player for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Sprite anchor position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Current facing.
    pub facing: Facing,
    /// Animation selection.
    pub cue: AnimationCue,
    /// Whether dialog engagement is holding the player in place.
    pub frozen: bool,
}

/// Renderable view of one NPC for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcView {
    /// NPC id.
    pub id: NpcId,
    /// Variant name.
    pub name: String,
    /// Sprite anchor position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Animation selection.
    pub cue: AnimationCue,
    /// Behavior phase.
    pub phase: NpcPhase,
    /// Render priority.
    pub depth: i32,
    /// Optional sprite tint.
    pub tint: Option<u32>,
    /// Whether the physical collider applies, for the physics collaborator.
    pub collider_active: bool,
    /// Whether the actor is pinned immovable.
    pub immovable: bool,
    /// Whether this NPC is the engaged dialog partner.
    pub touching_player: bool,
}

/// Full presentation snapshot of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Logical clock reading.
    pub now: u64,
    /// Player view.
    pub player: PlayerView,
    /// NPC views in ascending id order.
    pub npcs: Vec<NpcView>,
    /// Whether a dialog is open.
    pub dialog_open: bool,
    /// The engaged NPC while a dialog is open.
    pub active_npc: Option<NpcId>,
}

/// The scene core. Owns all state and advances it one tick at a time.
#[derive(Debug)]
pub struct Scene<T: TerrainQuery> {
    clock: SceneClock,
    player: Player,
    npcs: NpcTable,
    timers: TimerArena,
    scheduler: BehaviorScheduler,
    arbiter: ProximityArbiter,
    controller: DialogController,
    session: DialogSession,
    catalog: AnimationCatalog,
    terrain: T,
    tile_size: f32,
    bus: EventBus,
    prev_overlaps: Vec<NpcId>,
}

impl<T: TerrainQuery> Scene<T> {
    /// Builds a scene with the standard animation catalog.
    ///
    /// `roster` pairs each NPC definition with its spawn position. Every
    /// NPC gets a randomly chosen starting phase and an armed dwell timer.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster is empty or the catalog lacks idle
    /// frames for any sheet in use. Both are startup failures; a running
    /// scene does not raise errors.
    pub fn new(
        params: SceneParams,
        roster: Vec<(NpcDefinition, Vec2)>,
        terrain: T,
    ) -> SceneResult<Self> {
        Self::with_catalog(params, roster, terrain, AnimationCatalog::standard())
    }

    /// Builds a scene with an explicit animation catalog.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Scene::new`].
    pub fn with_catalog(
        params: SceneParams,
        roster: Vec<(NpcDefinition, Vec2)>,
        terrain: T,
        catalog: AnimationCatalog,
    ) -> SceneResult<Self> {
        if roster.is_empty() {
            return Err(SceneError::EmptyRoster);
        }
        let mut sheets = vec![SpriteSheet::Player];
        for (definition, _) in &roster {
            if !sheets.contains(&definition.sheet) {
                sheets.push(definition.sheet);
            }
        }
        catalog.validate(&sheets)?;

        let mut scene = Self {
            clock: SceneClock::new(),
            player: Player::with_config(
                params.player_start,
                PlayerConfig {
                    walk_speed: params.player_speed,
                },
            ),
            npcs: NpcTable::new(),
            timers: TimerArena::new(),
            scheduler: BehaviorScheduler::new(params.seed)
                .with_dwells(params.rest_dwell_ms, params.walk_dwell_ms),
            arbiter: ProximityArbiter::new().with_threshold(params.near_threshold),
            controller: DialogController::new()
                .with_cooldown(params.dialog_cooldown_ms)
                .with_release_threshold(params.near_threshold),
            session: DialogSession::new(),
            catalog,
            terrain,
            tile_size: params.tile_size,
            bus: EventBus::new(params.event_capacity),
            prev_overlaps: Vec::new(),
        };

        let count = roster.len();
        for (definition, position) in roster {
            let id = scene.npcs.spawn(definition, position);
            if let Some(npc) = scene.npcs.get_mut(id) {
                scene
                    .scheduler
                    .initialize(id, npc, &mut scene.timers, &scene.catalog, 0);
            }
        }
        info!(npcs = count, seed = params.seed, "scene initialized");
        Ok(scene)
    }

    /// Advances the scene by one tick of `dt_ms` logical milliseconds.
    pub fn tick(&mut self, input: TickInput, dt_ms: u64) {
        let now = self.clock.advance(dt_ms);

        // Arbitration for every NPC settles before any movement decision,
        // so an NPC that became near this tick is already stopped below.
        let overlaps = self.arbiter.arbitrate(
            &mut self.player,
            &mut self.npcs,
            &mut self.session,
            &mut self.scheduler,
            &mut self.timers,
            &self.bus,
            now,
        );

        // The close input refers to a dialog that predates this tick's
        // touches, so it runs first. A touch on the same tick then falls
        // into the fresh cooldown window.
        if input.confirm {
            self.controller.close(
                &mut self.session,
                &mut self.npcs,
                &mut self.player,
                &mut self.scheduler,
                &mut self.timers,
                &self.catalog,
                &self.bus,
                now,
            );
        }

        for &id in &overlaps {
            if self.prev_overlaps.contains(&id) {
                continue;
            }
            self.bus.publish(SceneEvent::PlayerTouchedNpc { npc: id });
            self.controller.on_player_touch(
                &mut self.session,
                id,
                &mut self.npcs,
                &mut self.player,
                &self.scheduler,
                &mut self.timers,
                &self.bus,
                now,
            );
        }
        self.prev_overlaps = overlaps;

        for id in self.timers.due(now) {
            if let Some(npc) = self.npcs.get_mut(id) {
                self.scheduler
                    .on_timer_fire(id, npc, &mut self.timers, &self.catalog, &self.bus, now);
            }
        }

        self.player
            .update(input.movement, &self.terrain, self.tile_size, &self.catalog, dt_ms);

        for id in self.npcs.ids() {
            let Some(npc) = self.npcs.get_mut(id) else {
                continue;
            };
            if npc.state.phase == NpcPhase::Walking && !npc.state.movement_interrupted {
                move_actor(&mut npc.actor, &self.terrain, self.tile_size, dt_ms);
            }
        }
    }

    /// Logical clock reading.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.clock.now()
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player access for scripted repositioning.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The NPC table.
    #[must_use]
    pub const fn npcs(&self) -> &NpcTable {
        &self.npcs
    }

    /// One NPC by id.
    #[must_use]
    pub fn npc(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(id)
    }

    /// The dialog session.
    #[must_use]
    pub const fn dialog(&self) -> &DialogSession {
        &self.session
    }

    /// Drains all events published since the last drain.
    #[must_use]
    pub fn drain_events(&self) -> Vec<SceneEvent> {
        self.bus.drain()
    }

    /// Builds the presentation snapshot for the current frame.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        let npcs = self
            .npcs
            .ids()
            .into_iter()
            .filter_map(|id| self.npcs.get(id).map(|npc| (id, npc)))
            .map(|(id, npc)| NpcView {
                id,
                name: npc.definition.name.clone(),
                position: npc.actor.position(),
                velocity: npc.actor.velocity(),
                cue: npc.state.cue,
                phase: npc.state.phase,
                depth: npc.definition.depth,
                tint: npc.definition.tint,
                collider_active: npc.state.collider_active,
                immovable: npc.actor.is_immovable(),
                touching_player: npc.state.touching_player,
            })
            .collect();

        SceneSnapshot {
            now: self.clock.now(),
            player: PlayerView {
                position: self.player.position(),
                velocity: self.player.velocity(),
                facing: self.player.facing(),
                cue: self.player.cue(),
                frozen: self.player.is_frozen(),
            },
            npcs,
            dialog_open: self.session.is_open(),
            active_npc: self.session.active_npc(),
        }
    }
}
