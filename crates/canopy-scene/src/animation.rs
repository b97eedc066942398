//! Animation catalog for scene actors.
//!
//! Sprite sheets are laid out as four rows of walk frames (down, up, left,
//! right). The idle frame for a facing is the first frame of its row. The
//! catalog maps `(sheet, facing)` to a walk clip; a registered sheet must at
//! minimum have all four idle frames or scene construction fails. A missing
//! walk clip is non-fatal: cue resolution degrades to the idle pose for that
//! facing.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::motion::{AnimationCue, Facing};

/// Frames per second for walk clips.
pub const WALK_FRAME_RATE: f32 = 8.0;

/// Errors raised while validating the animation catalog at scene setup.
#[derive(Debug, Clone, Error)]
pub enum AnimationError {
    /// A registered sheet lacks the idle frame for a facing.
    #[error("sprite sheet {sheet:?} has no idle frame for facing {facing:?}")]
    MissingIdleFrame {
        /// Sheet missing the frame
        sheet: SpriteSheet,
        /// Facing without an idle frame
        facing: Facing,
    },
}

/// Sprite sheet family an actor draws frames from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteSheet {
    /// The player explorer sheet.
    Player,
    /// The gorilla sheet shared by all gorilla variants (tinted per NPC).
    Gorilla,
}

/// Frame layout of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    /// Frame width in pixels
    pub frame_width: u32,
    /// Frame height in pixels
    pub frame_height: u32,
    /// Frames per sheet row
    pub frames_per_row: u32,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            frame_width: 48,
            frame_height: 48,
            frames_per_row: 4,
        }
    }
}

impl FrameGeometry {
    /// Row index a facing's frames live on.
    #[must_use]
    pub const fn row(facing: Facing) -> u32 {
        match facing {
            Facing::Down => 0,
            Facing::Up => 1,
            Facing::Left => 2,
            Facing::Right => 3,
        }
    }

    /// First frame index of a facing's row.
    #[must_use]
    pub const fn row_start(&self, facing: Facing) -> u32 {
        Self::row(facing) * self.frames_per_row
    }
}

/// A walk animation clip: a contiguous frame range at a frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkClip {
    /// First frame index
    pub start: u32,
    /// Number of frames in the clip
    pub frame_count: u32,
    /// Playback rate in frames per second
    pub frame_rate: f32,
}

/// Catalog of walk clips and idle frames, keyed by sheet and facing.
#[derive(Debug, Clone, Default)]
pub struct AnimationCatalog {
    /// Walk clips per sheet and facing
    walks: AHashMap<(SpriteSheet, Facing), WalkClip>,
    /// Idle frame per sheet and facing
    idles: AHashMap<(SpriteSheet, Facing), u32>,
}

impl AnimationCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard catalog with the player and gorilla sheets
    /// registered under the default frame geometry.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        catalog.register_sheet(SpriteSheet::Player, FrameGeometry::default());
        catalog.register_sheet(SpriteSheet::Gorilla, FrameGeometry::default());
        catalog
    }

    /// Registers a full sheet: one walk clip and one idle frame per facing,
    /// derived from the row layout.
    pub fn register_sheet(&mut self, sheet: SpriteSheet, geometry: FrameGeometry) {
        for facing in Facing::ALL {
            let start = geometry.row_start(facing);
            self.register_walk(
                sheet,
                facing,
                WalkClip {
                    start,
                    frame_count: geometry.frames_per_row,
                    frame_rate: WALK_FRAME_RATE,
                },
            );
            self.register_idle(sheet, facing, start);
        }
    }

    /// Registers a single walk clip.
    pub fn register_walk(&mut self, sheet: SpriteSheet, facing: Facing, clip: WalkClip) {
        self.walks.insert((sheet, facing), clip);
    }

    /// Registers a single idle frame.
    pub fn register_idle(&mut self, sheet: SpriteSheet, facing: Facing, frame: u32) {
        self.idles.insert((sheet, facing), frame);
    }

    /// Removes a walk clip. Actors degrade to the idle pose for that facing.
    pub fn remove_walk(&mut self, sheet: SpriteSheet, facing: Facing) {
        self.walks.remove(&(sheet, facing));
    }

    /// Looks up the walk clip for a sheet and facing.
    #[must_use]
    pub fn walk_clip(&self, sheet: SpriteSheet, facing: Facing) -> Option<&WalkClip> {
        self.walks.get(&(sheet, facing))
    }

    /// Looks up the idle frame for a sheet and facing.
    #[must_use]
    pub fn idle_frame(&self, sheet: SpriteSheet, facing: Facing) -> Option<u32> {
        self.idles.get(&(sheet, facing)).copied()
    }

    /// Resolves a cue against the catalog: a walk cue whose clip is missing
    /// degrades to the idle pose for the same facing.
    #[must_use]
    pub fn resolve(&self, sheet: SpriteSheet, cue: AnimationCue) -> AnimationCue {
        match cue {
            AnimationCue::Walk(facing) if self.walk_clip(sheet, facing).is_none() => {
                AnimationCue::Idle(facing)
            },
            other => other,
        }
    }

    /// Validates that every listed sheet has idle frames for all four facings.
    ///
    /// Walk clips are not required here; their absence is the documented
    /// degrade path, not a setup failure.
    pub fn validate(&self, sheets: &[SpriteSheet]) -> Result<(), AnimationError> {
        for &sheet in sheets {
            for facing in Facing::ALL {
                if self.idle_frame(sheet, facing).is_none() {
                    return Err(AnimationError::MissingIdleFrame { sheet, facing });
                }
            }
        }
        Ok(())
    }
}
