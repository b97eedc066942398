//! Scripted headless demo.
//!
//! Stands in for the presentation layer: drives the scene through repeated
//! approach / talk / close / retreat cycles against the first NPC and logs
//! every drained scene event.

use anyhow::{Context, Result};
use tracing::{debug, info};

use canopy_common::geom::Vec2;
use canopy_common::ids::NpcId;
use canopy_scene::events::SceneEvent;
use canopy_scene::npc::standard_roster;
use canopy_scene::scene::{Scene, TickInput};
use canopy_scene::terrain::TileGrid;

use crate::config::CanopyConfig;

/// How long the scripted player "reads" an open dialog before closing it.
const READ_MS: u64 = 800;

/// How long the scripted player retreats after closing a dialog.
const RETREAT_MS: u64 = 1500;

/// Counters collected over one demo run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSummary {
    /// Ticks executed.
    pub ticks: u64,
    /// Dialogs opened.
    pub dialogs_opened: u32,
    /// Dialogs closed.
    pub dialogs_closed: u32,
    /// NPC phase flips observed.
    pub phase_changes: u32,
}

/// Scripted player input: walk at the target NPC, read the dialog once it
/// opens, close it, walk away, repeat.
struct DemoDriver {
    target: NpcId,
    read_until: Option<u64>,
    retreat_until: Option<u64>,
}

impl DemoDriver {
    fn new(target: NpcId) -> Self {
        Self {
            target,
            read_until: None,
            retreat_until: None,
        }
    }

    fn next_input(&mut self, scene: &Scene<TileGrid>, now: u64) -> TickInput {
        if scene.dialog().is_open() {
            let read_until = *self.read_until.get_or_insert(now + READ_MS);
            if now >= read_until {
                self.read_until = None;
                self.retreat_until = Some(now + RETREAT_MS);
                return TickInput::close();
            }
            return TickInput::idle();
        }

        let Some(npc) = scene.npc(self.target) else {
            return TickInput::idle();
        };
        let to_npc = npc.actor.center() - scene.player().center();

        if let Some(until) = self.retreat_until {
            if now < until {
                let away = to_npc * -1.0;
                if away.is_zero() {
                    return TickInput::walk(Vec2::RIGHT);
                }
                return TickInput::walk(away);
            }
            self.retreat_until = None;
        }

        if to_npc.is_zero() {
            return TickInput::idle();
        }
        TickInput::walk(to_npc)
    }
}

/// Runs the scripted demo for the configured number of ticks.
///
/// # Errors
///
/// Fails if the scene cannot be constructed, e.g. an empty roster or an
/// animation catalog missing idle frames.
pub fn run(config: &CanopyConfig) -> Result<DemoSummary> {
    let seed = config.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos() as u64)
    });
    info!(seed, run_ticks = config.run_ticks, "starting demo");

    let spawns = [
        Vec2::new(config.world_width() * 0.3, config.world_height() * 0.3),
        Vec2::new(config.world_width() * 0.7, config.world_height() * 0.6),
    ];
    let roster = standard_roster()
        .into_iter()
        .map(|definition| definition.with_speed(config.npc_speed))
        .zip(spawns)
        .collect();

    let terrain = TileGrid::with_border(config.world_width_tiles, config.world_height_tiles);
    let mut scene = Scene::new(config.scene_params(seed), roster, terrain)
        .context("scene construction failed")?;

    let target = scene
        .npcs()
        .find_by_name("gorilla-amber")
        .or_else(|| scene.npcs().ids().first().copied())
        .context("roster has no target npc")?;
    let mut driver = DemoDriver::new(target);

    let mut summary = DemoSummary::default();
    for tick in 0..config.run_ticks {
        let input = driver.next_input(&scene, scene.now());
        scene.tick(input, config.tick_ms);

        for event in scene.drain_events() {
            match event {
                SceneEvent::DialogOpened { .. } => summary.dialogs_opened += 1,
                SceneEvent::DialogClosed { .. } => summary.dialogs_closed += 1,
                SceneEvent::NpcPhaseChanged { .. } => summary.phase_changes += 1,
                _ => {},
            }
            info!(?event, tick, "scene event");
        }

        if config.snapshot_every_ticks > 0 && tick % config.snapshot_every_ticks == 0 {
            let snapshot = scene.snapshot();
            debug!(
                now = snapshot.now,
                player = ?snapshot.player.position,
                dialog_open = snapshot.dialog_open,
                "snapshot"
            );
        }
        summary.ticks += 1;
    }

    info!(
        ticks = summary.ticks,
        dialogs_opened = summary.dialogs_opened,
        dialogs_closed = summary.dialogs_closed,
        phase_changes = summary.phase_changes,
        "demo finished"
    );
    Ok(summary)
}
