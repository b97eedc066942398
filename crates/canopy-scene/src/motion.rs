//! Motion and facing resolution.
//!
//! Pure mapping from a velocity vector to a facing direction and an
//! animation cue, shared by the player and every NPC:
//! - Nonzero velocity faces the dominant axis; on a tie the horizontal
//!   component wins.
//! - Zero velocity leaves the facing unchanged and selects the idle pose
//!   for the last facing.

use serde::{Deserialize, Serialize};

use canopy_common::geom::Vec2;

/// Four-way facing direction of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Facing up (negative Y)
    Up,
    /// Facing down (positive Y, default spawn facing)
    #[default]
    Down,
    /// Facing left
    Left,
    /// Facing right
    Right,
}

impl Facing {
    /// All four facings, in sprite-row order.
    pub const ALL: [Facing; 4] = [Facing::Down, Facing::Up, Facing::Left, Facing::Right];

    /// Converts the facing to a unit direction vector.
    #[must_use]
    pub const fn to_vec2(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::UP,
            Facing::Down => Vec2::DOWN,
            Facing::Left => Vec2::LEFT,
            Facing::Right => Vec2::RIGHT,
        }
    }

    /// Derives a facing from a velocity vector, or `None` for zero velocity.
    ///
    /// The dominant component decides the axis; equal magnitudes resolve to
    /// the horizontal facing.
    #[must_use]
    pub fn from_velocity(v: Vec2) -> Option<Self> {
        if v.is_zero() {
            return None;
        }
        if v.x.abs() >= v.y.abs() {
            if v.x > 0.0 {
                Some(Facing::Right)
            } else {
                Some(Facing::Left)
            }
        } else if v.y > 0.0 {
            Some(Facing::Down)
        } else {
            Some(Facing::Up)
        }
    }
}

/// Animation selection for an actor this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationCue {
    /// Play the walk clip for the given facing.
    Walk(Facing),
    /// Hold the idle frame for the given facing.
    Idle(Facing),
}

impl AnimationCue {
    /// The facing this cue points at.
    #[must_use]
    pub const fn facing(self) -> Facing {
        match self {
            AnimationCue::Walk(f) | AnimationCue::Idle(f) => f,
        }
    }

    /// True for walk cues.
    #[must_use]
    pub const fn is_walking(self) -> bool {
        matches!(self, AnimationCue::Walk(_))
    }
}

impl Default for AnimationCue {
    fn default() -> Self {
        AnimationCue::Idle(Facing::default())
    }
}

/// Resolves the facing after applying a velocity: the dominant-axis facing
/// for nonzero velocity, the current facing otherwise.
#[must_use]
pub fn resolve_facing(velocity: Vec2, current: Facing) -> Facing {
    Facing::from_velocity(velocity).unwrap_or(current)
}

/// Resolves the animation cue for a velocity and a (already resolved)
/// facing: walking along the facing for nonzero velocity, idle otherwise.
#[must_use]
pub fn resolve_cue(velocity: Vec2, facing: Facing) -> AnimationCue {
    if velocity.is_zero() {
        AnimationCue::Idle(facing)
    } else {
        AnimationCue::Walk(facing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_facing_from_dominant_axis() {
        assert_eq!(
            Facing::from_velocity(Vec2::new(40.0, 10.0)),
            Some(Facing::Right)
        );
        assert_eq!(
            Facing::from_velocity(Vec2::new(-40.0, 10.0)),
            Some(Facing::Left)
        );
        assert_eq!(
            Facing::from_velocity(Vec2::new(10.0, 40.0)),
            Some(Facing::Down)
        );
        assert_eq!(
            Facing::from_velocity(Vec2::new(10.0, -40.0)),
            Some(Facing::Up)
        );
    }

    #[test]
    fn test_facing_tie_prefers_horizontal() {
        assert_eq!(
            Facing::from_velocity(Vec2::new(30.0, 30.0)),
            Some(Facing::Right)
        );
        assert_eq!(
            Facing::from_velocity(Vec2::new(-30.0, -30.0)),
            Some(Facing::Left)
        );
    }

    #[test]
    fn test_facing_zero_velocity_is_none() {
        assert_eq!(Facing::from_velocity(Vec2::ZERO), None);
    }

    #[test]
    fn test_resolve_facing_keeps_current_when_stopped() {
        assert_eq!(resolve_facing(Vec2::ZERO, Facing::Left), Facing::Left);
        assert_eq!(
            resolve_facing(Vec2::new(0.0, -5.0), Facing::Left),
            Facing::Up
        );
    }

    #[test]
    fn test_resolve_cue() {
        assert_eq!(
            resolve_cue(Vec2::new(40.0, 0.0), Facing::Right),
            AnimationCue::Walk(Facing::Right)
        );
        assert_eq!(
            resolve_cue(Vec2::ZERO, Facing::Up),
            AnimationCue::Idle(Facing::Up)
        );
    }

    #[test]
    fn test_facing_to_vec2_roundtrip() {
        for facing in Facing::ALL {
            assert_eq!(Facing::from_velocity(facing.to_vec2()), Some(facing));
        }
    }

    proptest! {
        #[test]
        fn prop_horizontal_dominates_ties(x in -200.0f32..200.0, y in -200.0f32..200.0) {
            let v = Vec2::new(x, y);
            prop_assume!(!v.is_zero());
            let facing = Facing::from_velocity(v).expect("nonzero velocity resolves");
            if x.abs() >= y.abs() {
                prop_assert!(matches!(facing, Facing::Left | Facing::Right));
            } else {
                prop_assert!(matches!(facing, Facing::Up | Facing::Down));
            }
        }

        #[test]
        fn prop_resolver_never_changes_facing_on_zero(facing_idx in 0usize..4) {
            let current = Facing::ALL[facing_idx];
            prop_assert_eq!(resolve_facing(Vec2::ZERO, current), current);
        }
    }
}
