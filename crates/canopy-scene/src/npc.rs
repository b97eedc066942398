//! NPC definitions and runtime state.
//!
//! An NPC is a static `NpcDefinition` (one per variant, immutable after
//! scene setup), an `Actor`, and the `NpcState` record the scheduler,
//! arbiter, and dialog controller operate on. Live NPCs are owned by the
//! `NpcTable`, keyed by sequentially assigned ids.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use canopy_common::geom::Vec2;
use canopy_common::ids::NpcId;

use crate::actor::Actor;
use crate::animation::{FrameGeometry, SpriteSheet};
use crate::motion::AnimationCue;

/// Default NPC walk speed in world units per second.
pub const DEFAULT_NPC_SPEED: f32 = 40.0;

/// Default render depth for NPCs, above the tile layers.
pub const DEFAULT_NPC_DEPTH: i32 = 10;

/// Autonomous behavior phase of an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NpcPhase {
    /// Standing still, idle pose, waiting out a rest dwell.
    #[default]
    Resting,
    /// Moving in a fixed direction until the walk dwell elapses.
    Walking,
}

/// Static definition of an NPC variant.
///
/// Created once at scene setup and treated as immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDefinition {
    /// Variant identifier, e.g. `gorilla-amber`.
    pub name: String,
    /// Sprite sheet the variant draws frames from.
    pub sheet: SpriteSheet,
    /// Walk speed in world units per second.
    pub speed: f32,
    /// Render priority; higher draws above lower.
    pub depth: i32,
    /// Optional RGB tint applied to the sprite.
    pub tint: Option<u32>,
    /// Frame layout of the sheet.
    pub frames: FrameGeometry,
}

impl NpcDefinition {
    /// Creates a definition with default speed, depth, and frame layout.
    #[must_use]
    pub fn new(name: impl Into<String>, sheet: SpriteSheet) -> Self {
        Self {
            name: name.into(),
            sheet,
            speed: DEFAULT_NPC_SPEED,
            depth: DEFAULT_NPC_DEPTH,
            tint: None,
            frames: FrameGeometry::default(),
        }
    }

    /// Sets the walk speed.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the render depth.
    #[must_use]
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the sprite tint.
    #[must_use]
    pub fn with_tint(mut self, tint: u32) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Sets the frame layout.
    #[must_use]
    pub fn with_frames(mut self, frames: FrameGeometry) -> Self {
        self.frames = frames;
        self
    }
}

/// The default roster: the two gorillas of the rescue scene.
#[must_use]
pub fn standard_roster() -> Vec<NpcDefinition> {
    vec![
        NpcDefinition::new("gorilla-amber", SpriteSheet::Gorilla).with_tint(0x00ff_c24b),
        NpcDefinition::new("gorilla-emerald", SpriteSheet::Gorilla).with_tint(0x003d_dc97),
    ]
}

/// Mutable behavior and interaction flags of a live NPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcState {
    /// Current autonomous-behavior phase.
    pub phase: NpcPhase,
    /// True while proximity or dialog has paused the scheduler. Implies no
    /// pending behavior timer is armed for this NPC.
    pub movement_interrupted: bool,
    /// True only while this NPC is the active dialog partner. At most one
    /// NPC in a scene has this set.
    pub touching_player: bool,
    /// Whether the player-NPC physical collider currently applies.
    pub collider_active: bool,
    /// Animation selection for the presentation layer.
    pub cue: AnimationCue,
}

impl Default for NpcState {
    fn default() -> Self {
        Self {
            phase: NpcPhase::Resting,
            movement_interrupted: false,
            touching_player: false,
            collider_active: true,
            cue: AnimationCue::default(),
        }
    }
}

/// A live NPC in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    /// Variant definition; immutable after setup.
    pub definition: NpcDefinition,
    /// Position, velocity, facing, and collision body.
    pub actor: Actor,
    /// Behavior and interaction flags.
    pub state: NpcState,
}

/// Table of live NPCs, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct NpcTable {
    npcs: AHashMap<NpcId, Npc>,
    next_id: u32,
}

impl NpcTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an NPC from a definition at a position, assigning the next id.
    pub fn spawn(&mut self, definition: NpcDefinition, position: Vec2) -> NpcId {
        self.next_id += 1;
        let id = NpcId::new(self.next_id);
        self.npcs.insert(
            id,
            Npc {
                definition,
                actor: Actor::new(position),
                state: NpcState::default(),
            },
        );
        id
    }

    /// Looks up an NPC by id.
    #[must_use]
    pub fn get(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(&id)
    }

    /// Looks up an NPC for mutation.
    pub fn get_mut(&mut self, id: NpcId) -> Option<&mut Npc> {
        self.npcs.get_mut(&id)
    }

    /// All live ids in ascending order; the deterministic iteration order
    /// for arbitration and timer firing.
    #[must_use]
    pub fn ids(&self) -> Vec<NpcId> {
        let mut ids: Vec<NpcId> = self.npcs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Finds the id of the NPC with the given definition name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NpcId> {
        self.npcs
            .iter()
            .find(|(_, npc)| npc.definition.name == name)
            .map(|(&id, _)| id)
    }

    /// Number of NPCs whose `touching_player` flag is set; the mutual
    /// exclusion invariant keeps this at zero or one.
    #[must_use]
    pub fn touching_count(&self) -> usize {
        self.npcs
            .values()
            .filter(|npc| npc.state.touching_player)
            .count()
    }

    /// Number of live NPCs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    /// Iterates over all live NPCs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (NpcId, &Npc)> {
        self.npcs.iter().map(|(&id, npc)| (id, npc))
    }
}
