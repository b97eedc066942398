//! Runner configuration.
//!
//! Provides configurable parameters for the demo run, player and NPC tuning,
//! and world dimensions. Configuration can be loaded from and saved to a
//! TOML file; a missing or invalid file falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

use canopy_common::geom::Vec2;
use canopy_scene::scene::SceneParams;

/// Configuration file name.
const CONFIG_FILE: &str = "canopy.toml";

/// Runner configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyConfig {
    // === Run Settings ===
    /// Number of ticks the demo runs for
    pub run_ticks: u64,
    /// Logical milliseconds per tick
    pub tick_ms: u64,
    /// Behavior seed (None = derived from wall clock)
    pub seed: Option<u64>,
    /// Log a scene snapshot every N ticks (0 = disabled)
    pub snapshot_every_ticks: u64,

    // === Player Settings ===
    /// Player walk speed in world units per second
    pub player_speed: f32,
    /// Player spawn X in world units
    pub player_start_x: f32,
    /// Player spawn Y in world units
    pub player_start_y: f32,

    // === Behavior Settings ===
    /// NPC walk speed in world units per second
    pub npc_speed: f32,
    /// Body-center distance below which an NPC counts as near
    pub near_threshold: f32,
    /// Minimum time between a dialog close and the next open
    pub dialog_cooldown_ms: u64,
    /// Lower bound of the resting dwell, inclusive
    pub rest_dwell_min_ms: u64,
    /// Upper bound of the resting dwell, exclusive
    pub rest_dwell_max_ms: u64,
    /// Lower bound of the walking dwell, inclusive
    pub walk_dwell_min_ms: u64,
    /// Upper bound of the walking dwell, exclusive
    pub walk_dwell_max_ms: u64,

    // === World Settings ===
    /// World width in tiles
    pub world_width_tiles: i32,
    /// World height in tiles
    pub world_height_tiles: i32,
    /// Edge length of one tile in world units
    pub tile_size: f32,

    // === Event Settings ===
    /// Scene event bus capacity
    pub event_capacity: usize,
}

impl Default for CanopyConfig {
    fn default() -> Self {
        Self {
            // Run
            run_ticks: 3000,
            tick_ms: 16,
            seed: None,
            snapshot_every_ticks: 0,

            // Player
            player_speed: 120.0,
            player_start_x: 400.0,
            player_start_y: 300.0,

            // Behavior
            npc_speed: 40.0,
            near_threshold: 50.0,
            dialog_cooldown_ms: 500,
            rest_dwell_min_ms: 2000,
            rest_dwell_max_ms: 4000,
            walk_dwell_min_ms: 3000,
            walk_dwell_max_ms: 6000,

            // World
            world_width_tiles: 64,
            world_height_tiles: 48,
            tile_size: 16.0,

            // Events
            event_capacity: 256,
        }
    }
}

impl CanopyConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Run
        self.run_ticks = self.run_ticks.clamp(1, 1_000_000);
        self.tick_ms = self.tick_ms.clamp(1, 1000);

        // Player
        self.player_speed = self.player_speed.clamp(10.0, 1000.0);

        // Behavior
        self.npc_speed = self.npc_speed.clamp(5.0, 500.0);
        self.near_threshold = self.near_threshold.clamp(1.0, 500.0);
        self.dialog_cooldown_ms = self.dialog_cooldown_ms.min(60_000);
        if self.rest_dwell_max_ms <= self.rest_dwell_min_ms {
            self.rest_dwell_max_ms = self.rest_dwell_min_ms + 1;
        }
        if self.walk_dwell_max_ms <= self.walk_dwell_min_ms {
            self.walk_dwell_max_ms = self.walk_dwell_min_ms + 1;
        }

        // World
        self.world_width_tiles = self.world_width_tiles.clamp(8, 1024);
        self.world_height_tiles = self.world_height_tiles.clamp(8, 1024);
        self.tile_size = self.tile_size.clamp(4.0, 64.0);

        // Events
        self.event_capacity = self.event_capacity.clamp(16, 65_536);
    }

    /// Map this configuration onto scene tuning, with a resolved seed.
    #[must_use]
    pub fn scene_params(&self, seed: u64) -> SceneParams {
        SceneParams {
            seed,
            player_start: Vec2::new(self.player_start_x, self.player_start_y),
            player_speed: self.player_speed,
            tile_size: self.tile_size,
            near_threshold: self.near_threshold,
            dialog_cooldown_ms: self.dialog_cooldown_ms,
            rest_dwell_ms: (self.rest_dwell_min_ms, self.rest_dwell_max_ms),
            walk_dwell_ms: (self.walk_dwell_min_ms, self.walk_dwell_max_ms),
            event_capacity: self.event_capacity,
        }
    }

    /// World width in world units.
    #[must_use]
    pub fn world_width(&self) -> f32 {
        self.world_width_tiles as f32 * self.tile_size
    }

    /// World height in world units.
    #[must_use]
    pub fn world_height(&self) -> f32 {
        self.world_height_tiles as f32 * self.tile_size
    }
}
