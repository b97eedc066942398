//! Player actor and input-driven movement.
//!
//! The player shares the `Actor` base and the motion resolver with NPCs.
//! Input arrives as a per-tick axis vector; diagonals are normalized so
//! diagonal speed equals axial speed. While an engaged dialog partner holds
//! the player frozen, input is ignored and the idle pose is held.

use serde::{Deserialize, Serialize};

use canopy_common::geom::{Aabb, Vec2};

use crate::actor::Actor;
use crate::animation::{AnimationCatalog, SpriteSheet};
use crate::motion::{resolve_cue, AnimationCue, Facing};
use crate::terrain::{move_actor, TerrainQuery};

/// Player tuning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Walk speed in world units per second.
    pub walk_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { walk_speed: 120.0 }
    }
}

/// The controllable player actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    actor: Actor,
    config: PlayerConfig,
    frozen: bool,
    cue: AnimationCue,
}

impl Player {
    /// Creates a player at a position with default tuning.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self::with_config(position, PlayerConfig::default())
    }

    /// Creates a player with explicit tuning.
    #[must_use]
    pub fn with_config(position: Vec2, config: PlayerConfig) -> Self {
        Self {
            actor: Actor::new(position),
            config,
            frozen: false,
            cue: AnimationCue::default(),
        }
    }

    /// Current sprite anchor position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.actor.position()
    }

    /// Moves the player directly, bypassing terrain checks. Used for scene
    /// setup and scripted repositioning.
    pub fn set_position(&mut self, position: Vec2) {
        self.actor.set_position(position);
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.actor.velocity()
    }

    /// Current facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.actor.facing()
    }

    /// Collision body rectangle.
    #[must_use]
    pub fn body(&self) -> Aabb {
        self.actor.body()
    }

    /// Collision body center; proximity distances measure from here.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.actor.center()
    }

    /// Animation selection for the presentation layer.
    #[must_use]
    pub const fn cue(&self) -> AnimationCue {
        self.cue
    }

    /// Whether an engaged dialog partner is holding the player in place.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes or releases the player. Freezing zeroes the velocity and
    /// holds the idle pose immediately.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
        if frozen {
            self.actor.stop();
            self.cue = AnimationCue::Idle(self.actor.facing());
        }
    }

    /// Applies one tick of input-driven movement.
    ///
    /// `movement` is the raw input axis vector; it is normalized before the
    /// walk speed is applied.
    pub fn update<T: TerrainQuery>(
        &mut self,
        movement: Vec2,
        terrain: &T,
        tile_size: f32,
        catalog: &AnimationCatalog,
        dt_ms: u64,
    ) {
        if self.frozen {
            self.actor.stop();
            self.cue = AnimationCue::Idle(self.actor.facing());
            return;
        }

        let velocity = movement.normalized() * self.config.walk_speed;
        self.actor.set_velocity(velocity);
        move_actor(&mut self.actor, terrain, tile_size, dt_ms);

        let raw = resolve_cue(self.actor.velocity(), self.actor.facing());
        self.cue = catalog.resolve(SpriteSheet::Player, raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{OpenTerrain, TILE_SIZE};

    fn create_test_player() -> Player {
        Player::new(Vec2::new(400.0, 300.0))
    }

    #[test]
    fn test_player_moves_at_walk_speed() {
        let mut player = create_test_player();
        let catalog = AnimationCatalog::standard();

        player.update(Vec2::RIGHT, &OpenTerrain, TILE_SIZE, &catalog, 1000);

        assert!((player.position().x - 520.0).abs() < 1e-3);
        assert_eq!(player.facing(), Facing::Right);
        assert_eq!(player.cue(), AnimationCue::Walk(Facing::Right));
    }

    #[test]
    fn test_diagonal_speed_is_normalized() {
        let mut player = create_test_player();
        let catalog = AnimationCatalog::standard();
        let start = player.position();

        player.update(Vec2::new(1.0, 1.0), &OpenTerrain, TILE_SIZE, &catalog, 1000);

        let moved = player.position().distance(start);
        assert!((moved - 120.0).abs() < 0.1);
    }

    #[test]
    fn test_idle_when_no_input() {
        let mut player = create_test_player();
        let catalog = AnimationCatalog::standard();

        player.update(Vec2::UP, &OpenTerrain, TILE_SIZE, &catalog, 16);
        player.update(Vec2::ZERO, &OpenTerrain, TILE_SIZE, &catalog, 16);

        assert_eq!(player.velocity(), Vec2::ZERO);
        // Idle pose keeps the last facing
        assert_eq!(player.cue(), AnimationCue::Idle(Facing::Up));
    }

    #[test]
    fn test_frozen_player_ignores_input() {
        let mut player = create_test_player();
        let catalog = AnimationCatalog::standard();
        let start = player.position();

        player.set_frozen(true);
        player.update(Vec2::RIGHT, &OpenTerrain, TILE_SIZE, &catalog, 1000);

        assert_eq!(player.position(), start);
        assert_eq!(player.velocity(), Vec2::ZERO);
        assert!(!player.cue().is_walking());
    }

    #[test]
    fn test_unfreeze_restores_movement() {
        let mut player = create_test_player();
        let catalog = AnimationCatalog::standard();

        player.set_frozen(true);
        player.update(Vec2::RIGHT, &OpenTerrain, TILE_SIZE, &catalog, 100);
        player.set_frozen(false);
        player.update(Vec2::RIGHT, &OpenTerrain, TILE_SIZE, &catalog, 100);

        assert!(player.position().x > 400.0);
    }

    #[test]
    fn test_missing_walk_clip_degrades_player_cue() {
        let mut catalog = AnimationCatalog::standard();
        catalog.remove_walk(SpriteSheet::Player, Facing::Left);
        let mut player = create_test_player();

        player.update(Vec2::LEFT, &OpenTerrain, TILE_SIZE, &catalog, 16);

        assert_eq!(player.cue(), AnimationCue::Idle(Facing::Left));
        // Movement itself is unaffected by the missing clip
        assert!(player.position().x < 400.0);
    }
}
