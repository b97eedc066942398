//! # Canopy Common
//!
//! Common types shared across Project Canopy crates:
//! - Geometry primitives (`Vec2`, `Aabb`)
//! - ID types (`NpcId`)
//! - The logical scene clock

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod geom;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::*;
    pub use crate::geom::*;
    pub use crate::ids::*;
}

pub use prelude::*;
