#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Labyrinth session.
//!
//! The session drives the world the way an interactive front end would:
//! agent ticks at the level's interval, effect decay on a fixed cadence
//! and player input from a scripted autopilot. Time is simulated, so a
//! minute-long session finishes instantly and replays identically for a
//! given seed.

mod config;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use labyrinth_core::Difficulty;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::SessionConfig;

/// Runs a seeded Labyrinth session without a window and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "labyrinth", version, about)]
struct Cli {
    /// TOML session file; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Difficulty preset: easy, medium or hard.
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Seed for maze generation, placement and agent movement.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated session length in milliseconds.
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u64>,
    /// Milliseconds between autopilot moves.
    #[arg(long, value_name = "MS")]
    player_step_ms: Option<u64>,
    /// Milliseconds between effect decay calls.
    #[arg(long, value_name = "MS")]
    decay_step_ms: Option<u64>,
}

impl Cli {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };

        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(duration_ms) = self.duration_ms {
            config.duration_ms = duration_ms;
        }
        if let Some(player_step_ms) = self.player_step_ms {
            config.player_step_ms = player_step_ms;
        }
        if let Some(decay_step_ms) = self.decay_step_ms {
            config.decay_step_ms = decay_step_ms;
        }
        Ok(config)
    }
}

/// Entry point for the Labyrinth command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let cli = Cli::parse();
    let config = cli.session_config()?;
    info!(
        difficulty = %config.difficulty,
        seed = config.seed,
        duration_ms = config.duration_ms,
        "starting session"
    );

    let summary = session::run(&config)?;
    println!("{summary}");
    Ok(())
}
