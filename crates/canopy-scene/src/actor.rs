//! Actor base shared by the player and NPCs.
//!
//! An actor is a sprite anchor with a velocity, a four-way facing, and an
//! axis-aligned collision body offset from the anchor. The facing tracks the
//! last nonzero movement direction, which selects the idle pose while the
//! actor stands still.

use serde::{Deserialize, Serialize};

use canopy_common::geom::{Aabb, Vec2};

use crate::motion::{resolve_facing, Facing};

/// Default collision body size, sized to the visible feet of a 48x48 frame.
pub const DEFAULT_BODY_SIZE: Vec2 = Vec2 { x: 18.0, y: 20.0 };

/// Default collision body offset from the sprite's top-left corner.
pub const DEFAULT_BODY_OFFSET: Vec2 = Vec2 { x: 15.0, y: 20.0 };

/// A positioned, collidable scene actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Sprite anchor (top-left corner of the frame) in world units.
    position: Vec2,
    /// Current velocity in world units per second.
    velocity: Vec2,
    /// Last nonzero movement direction.
    facing: Facing,
    /// Collision body size in world units.
    body_size: Vec2,
    /// Collision body offset from the sprite anchor.
    body_offset: Vec2,
    /// When true the actor does not respond to being pushed by collisions.
    immovable: bool,
}

impl Actor {
    /// Creates an actor at a position with the default body geometry.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::default(),
            body_size: DEFAULT_BODY_SIZE,
            body_offset: DEFAULT_BODY_OFFSET,
            immovable: false,
        }
    }

    /// Overrides the collision body geometry.
    #[must_use]
    pub fn with_body(mut self, size: Vec2, offset: Vec2) -> Self {
        self.body_size = size;
        self.body_offset = offset;
        self
    }

    /// Current sprite anchor position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the sprite anchor.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Sets the velocity, updating the facing for nonzero velocities.
    ///
    /// A zero velocity leaves the facing untouched so the idle pose keeps
    /// pointing the way the actor last moved.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.facing = resolve_facing(velocity, self.facing);
    }

    /// Zeroes the velocity without changing the facing.
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Current facing (last nonzero movement direction).
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Collision body rectangle at the current position.
    #[must_use]
    pub fn body(&self) -> Aabb {
        Aabb::from_min_size(self.position + self.body_offset, self.body_size)
    }

    /// Collision body rectangle the actor would have at another position.
    #[must_use]
    pub fn body_at(&self, position: Vec2) -> Aabb {
        Aabb::from_min_size(position + self.body_offset, self.body_size)
    }

    /// Center of the collision body; proximity distances measure between
    /// these centers.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body().center()
    }

    /// Whether the actor is pinned against collision pushes.
    #[must_use]
    pub const fn is_immovable(&self) -> bool {
        self.immovable
    }

    /// Pins or unpins the actor against collision pushes.
    pub fn set_immovable(&mut self, immovable: bool) {
        self.immovable = immovable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_defaults() {
        let actor = Actor::new(Vec2::new(100.0, 200.0));
        assert_eq!(actor.position(), Vec2::new(100.0, 200.0));
        assert_eq!(actor.velocity(), Vec2::ZERO);
        assert_eq!(actor.facing(), Facing::Down);
        assert!(!actor.is_immovable());
    }

    #[test]
    fn test_body_rect_offset() {
        let actor = Actor::new(Vec2::new(100.0, 100.0));
        let body = actor.body();
        assert_eq!(body.min_x, 115.0);
        assert_eq!(body.min_y, 120.0);
        assert_eq!(body.width(), 18.0);
        assert_eq!(body.height(), 20.0);
    }

    #[test]
    fn test_set_velocity_updates_facing() {
        let mut actor = Actor::new(Vec2::ZERO);
        actor.set_velocity(Vec2::new(-40.0, 0.0));
        assert_eq!(actor.facing(), Facing::Left);

        actor.set_velocity(Vec2::new(0.0, -40.0));
        assert_eq!(actor.facing(), Facing::Up);
    }

    #[test]
    fn test_stop_keeps_facing() {
        let mut actor = Actor::new(Vec2::ZERO);
        actor.set_velocity(Vec2::new(40.0, 0.0));
        actor.stop();
        assert_eq!(actor.velocity(), Vec2::ZERO);
        assert_eq!(actor.facing(), Facing::Right);
    }

    #[test]
    fn test_zero_velocity_keeps_facing() {
        let mut actor = Actor::new(Vec2::ZERO);
        actor.set_velocity(Vec2::new(0.0, -40.0));
        actor.set_velocity(Vec2::ZERO);
        assert_eq!(actor.facing(), Facing::Up);
    }

    #[test]
    fn test_custom_body_geometry() {
        let actor = Actor::new(Vec2::ZERO).with_body(Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0));
        let body = actor.body();
        assert_eq!(body.min_x, 5.0);
        assert_eq!(body.max_x, 15.0);
        assert_eq!(actor.center(), Vec2::new(10.0, 10.0));
    }
}
