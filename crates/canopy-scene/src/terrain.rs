//! Terrain blocking interface.
//!
//! The tile map itself is loaded elsewhere; the simulation only needs to ask
//! whether a tile is passable. Water and other impassable tiles block actor
//! movement per axis: a blocked axis simply does not advance, the other axis
//! still does.

use std::collections::HashSet;

use canopy_common::geom::Aabb;
use canopy_common::geom::Vec2;

use crate::actor::Actor;

/// Default tile edge length in world units.
pub const TILE_SIZE: f32 = 16.0;

/// Query interface over the static tile layer.
pub trait TerrainQuery {
    /// Whether the tile at the given tile coordinates blocks movement.
    fn is_blocked(&self, tile_x: i32, tile_y: i32) -> bool;
}

/// Terrain with no blocked tiles, for tests and open scenes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTerrain;

impl TerrainQuery for OpenTerrain {
    fn is_blocked(&self, _tile_x: i32, _tile_y: i32) -> bool {
        false
    }
}

/// Concrete tile grid with an explicit set of blocked tiles.
#[derive(Debug, Clone, Default)]
pub struct TileGrid {
    /// Blocked tile coordinates
    blocked: HashSet<(i32, i32)>,
}

impl TileGrid {
    /// Creates an empty grid (nothing blocked).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid of `width` x `height` tiles whose border ring is
    /// blocked, the usual shape of an island map surrounded by water.
    #[must_use]
    pub fn with_border(width: i32, height: i32) -> Self {
        let mut grid = Self::new();
        for x in 0..width {
            grid.block(x, 0);
            grid.block(x, height - 1);
        }
        for y in 0..height {
            grid.block(0, y);
            grid.block(width - 1, y);
        }
        grid
    }

    /// Marks a tile as blocked.
    pub fn block(&mut self, tile_x: i32, tile_y: i32) {
        self.blocked.insert((tile_x, tile_y));
    }

    /// Number of blocked tiles.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }
}

impl TerrainQuery for TileGrid {
    fn is_blocked(&self, tile_x: i32, tile_y: i32) -> bool {
        self.blocked.contains(&(tile_x, tile_y))
    }
}

/// Whether a body rectangle overlaps any blocked tile.
fn body_blocked<T: TerrainQuery>(body: &Aabb, terrain: &T, tile_size: f32) -> bool {
    let min_x = (body.min_x / tile_size).floor() as i32;
    let max_x = (body.max_x / tile_size).floor() as i32;
    let min_y = (body.min_y / tile_size).floor() as i32;
    let max_y = (body.max_y / tile_size).floor() as i32;

    for ty in min_y..=max_y {
        for tx in min_x..=max_x {
            if terrain.is_blocked(tx, ty) {
                return true;
            }
        }
    }
    false
}

/// Integrates an actor's velocity over a tick, per axis, refusing movement
/// that would put the collision body inside a blocked tile.
pub fn move_actor<T: TerrainQuery>(actor: &mut Actor, terrain: &T, tile_size: f32, dt_ms: u64) {
    let dt = dt_ms as f32 / 1000.0;
    let delta = actor.velocity() * dt;
    if delta.is_zero() {
        return;
    }

    let mut position = actor.position();

    if delta.x != 0.0 {
        let test = Vec2::new(position.x + delta.x, position.y);
        if !body_blocked(&actor.body_at(test), terrain, tile_size) {
            position.x = test.x;
        }
    }

    if delta.y != 0.0 {
        let test = Vec2::new(position.x, position.y + delta.y);
        if !body_blocked(&actor.body_at(test), terrain, tile_size) {
            position.y = test.y;
        }
    }

    actor.set_position(position);
}
