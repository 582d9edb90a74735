use std::{cell::Cell, fmt, rc::Rc, time::Duration};

use anyhow::{Context, Result};
use labyrinth_core::{CellCoord, Difficulty, Direction, Event};
use labyrinth_world::{query, World, WorldConfig};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;

/// Salt separating the autopilot's generator from the world's.
const AUTOPILOT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Outcome of a headless session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionSummary {
    difficulty: Difficulty,
    simulated: Duration,
    final_level: u32,
    levels_completed: u32,
    health: u32,
    game_overs: u32,
    player_moves: u32,
    agent_ticks: u32,
    notifications: u64,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "difficulty: {}", self.difficulty)?;
        writeln!(f, "simulated: {} ms", self.simulated.as_millis())?;
        writeln!(f, "final level: {}", self.final_level)?;
        writeln!(f, "levels completed: {}", self.levels_completed)?;
        writeln!(f, "health: {}", self.health)?;
        writeln!(f, "game overs: {}", self.game_overs)?;
        writeln!(f, "player moves: {}", self.player_moves)?;
        writeln!(f, "agent ticks: {}", self.agent_ticks)?;
        write!(f, "observer notifications: {}", self.notifications)
    }
}

/// Steers the player along the shortest route to the exit, with an
/// occasional random step.
#[derive(Debug)]
struct Autopilot {
    rng: ChaCha8Rng,
    wander_chance: f64,
}

impl Autopilot {
    fn new(seed: u64, wander_chance: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed ^ AUTOPILOT_SEED_SALT),
            wander_chance,
        }
    }

    fn next_direction(&mut self, world: &World) -> Direction {
        if self.rng.gen_bool(self.wander_chance) {
            return Direction::CARDINALS
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(Direction::None);
        }

        let player = query::player(world);
        query::grid(world)
            .shortest_path(player, query::exit(world))
            .and_then(|path| path.first().copied())
            .map_or(Direction::None, |next| direction_between(player, next))
    }
}

fn direction_between(from: CellCoord, to: CellCoord) -> Direction {
    Direction::CARDINALS
        .into_iter()
        .find(|direction| from.step(*direction) == Some(to))
        .unwrap_or(Direction::None)
}

/// Runs a session on a simulated clock.
///
/// Agent ticks follow the current level's interval, effect decay and
/// player input run at the configured fixed cadences. Events due at the
/// same instant run decay first, then agents, then the player.
pub(crate) fn run(config: &SessionConfig) -> Result<SessionSummary> {
    config.validate()?;

    let world_config = WorldConfig::new(config.difficulty).with_seed(config.seed);
    let mut world = World::new(world_config).context("failed to build the first level")?;

    let notifications = Rc::new(Cell::new(0_u64));
    let counter = Rc::clone(&notifications);
    let _ = world.register_observer(move |_: &World| counter.set(counter.get() + 1));

    let mut autopilot = Autopilot::new(config.seed, config.wander_chance);
    let mut events = Vec::new();
    let mut summary = SessionSummary {
        difficulty: config.difficulty,
        simulated: Duration::ZERO,
        final_level: query::level(&world),
        levels_completed: 0,
        health: query::health(&world),
        game_overs: 0,
        player_moves: 0,
        agent_ticks: 0,
        notifications: 0,
    };

    let duration = config.duration();
    let mut next_decay = config.decay_step();
    let mut next_agents = query::agent_interval(&world);
    let mut next_player = config.player_step();

    loop {
        let now = next_decay.min(next_agents).min(next_player);
        if now > duration {
            break;
        }

        if now == next_decay {
            world.decay_effects(config.decay_step(), &mut events);
            next_decay += config.decay_step();
        }
        if now == next_agents {
            world.move_agents(&mut events);
            summary.agent_ticks += 1;
        }
        if now == next_player {
            let direction = autopilot.next_direction(&world);
            world
                .move_player(direction, &mut events)
                .context("failed to build the next level")?;
            summary.player_moves += 1;
            next_player += config.player_step();
        }

        let mut level_changed = false;
        for event in events.drain(..) {
            match event {
                Event::LevelStarted {
                    level,
                    width,
                    height,
                    ..
                } => {
                    level_changed = true;
                    if level > summary.final_level {
                        summary.levels_completed += 1;
                    }
                    summary.final_level = level;
                    info!(level, width, height, at_ms = now.as_millis() as u64, "level started");
                }
                Event::GameOver => {
                    summary.game_overs += 1;
                    warn!(level = query::level(&world), at_ms = now.as_millis() as u64, "game over");
                }
                Event::PickupCollected { pickup } => {
                    debug!(kind = ?pickup.kind(), "pickup collected");
                }
                _ => {}
            }
        }

        if query::is_game_over(&world) {
            if !config.restart_on_game_over {
                summary.simulated = now;
                break;
            }
            world
                .restart(query::difficulty(&world), true, &mut events)
                .context("failed to rebuild the level after game over")?;
            events.clear();
            level_changed = true;
        }

        if level_changed || now == next_agents {
            next_agents = now + query::agent_interval(&world);
        }
        summary.simulated = now;
    }

    summary.health = query::health(&world);
    summary.final_level = query::level(&world);
    summary.notifications = notifications.get();
    Ok(summary)
}
