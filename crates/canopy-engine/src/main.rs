//! # Canopy
//!
//! Headless runner for Project Canopy - a small island scene where the
//! player wanders among rescued gorillas and talks to them.
//!
//! This crate ties together the scene core and its host-side plumbing:
//! - Config: TOML-backed tuning for the run, player, NPCs, and world
//! - Demo: a scripted approach/talk/close/retreat loop standing in for
//!   the presentation layer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod demo;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("canopy=info".parse()?)
                .add_directive("canopy_scene=info".parse()?),
        )
        .init();

    info!("Project Canopy starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args().nth(1) {
        Some(path) => config::CanopyConfig::load_from(path),
        None => config::CanopyConfig::load(),
    };
    config.validate();

    demo::run(&config)?;

    info!("Project Canopy shutdown complete");
    Ok(())
}
