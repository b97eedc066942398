//! # Canopy Scene
//!
//! Scene core for Project Canopy.
//!
//! This crate provides the tick-driven behavior and interaction layer:
//! - Motion and facing resolution shared by player and NPCs
//! - Animation catalog with per-sheet walk clips and idle frames
//! - Player controller with normalized input movement
//! - NPC definitions, runtime state, and the rest/walk behavior scheduler
//! - Logical dwell timers and a deterministic behavior random stream
//! - Proximity and collision arbitration between player and NPCs
//! - Dialog session, trigger latch, and reopen cooldown
//! - Terrain blocking through a tile query trait
//! - Scene orchestrator and event bus for the presentation layer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod animation;
pub mod dialog;
pub mod events;
pub mod motion;
pub mod npc;
pub mod player;
pub mod proximity;
pub mod rng;
pub mod scene;
pub mod scheduler;
pub mod terrain;
pub mod timers;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::animation::*;
    pub use crate::dialog::*;
    pub use crate::events::*;
    pub use crate::motion::*;
    pub use crate::npc::*;
    pub use crate::player::*;
    pub use crate::proximity::*;
    pub use crate::rng::*;
    pub use crate::scene::*;
    pub use crate::scheduler::*;
    pub use crate::terrain::*;
    pub use crate::timers::*;
}

pub use prelude::*;
