//! ID types for scene actors.

use serde::{Deserialize, Serialize};

/// Unique identifier for a live NPC within a scene.
///
/// Assigned sequentially by the scene's NPC table at spawn time; also the
/// key for the behavior timer arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NpcId(pub u32);

impl NpcId {
    /// Creates an NPC ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}
