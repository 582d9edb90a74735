#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Labyrinth.
//!
//! The [`World`] owns the grid, every entity, the player's health, active
//! timed effects and the level counter. All mutation goes through a small
//! set of operations, each of which records what happened as [`Event`]
//! values and then notifies registered observers with a shared snapshot.
//! Mutating calls are expected to arrive serialized from one driver.

mod layout;
mod observers;

use std::{mem, time::Duration};

use labyrinth_core::{
    CellCoord, Command, Difficulty, Direction, Event, GameState, MazeGrid, Pickup, PickupKind,
    TimedEffect, FREEZE_DURATION, INVINCIBILITY_DURATION, MAX_HEALTH,
};
use labyrinth_system_maze_generation::{self as maze_generation, GenerationError};
use labyrinth_system_placement::{self as placement, PlacementError};
use labyrinth_system_progression::{scaled_agent_interval, LevelPlan};
use labyrinth_system_pursuit::chase_step;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

pub use layout::{Layout, LayoutError};
use observers::ObserverRegistry;
pub use observers::{ObserverId, WorldObserver};

/// Seed used when a configuration does not pick one.
pub const DEFAULT_SEED: u64 = 0x6c61_6279_7269_6e74;

/// Parameters for creating a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    difficulty: Difficulty,
    seed: u64,
}

impl WorldConfig {
    /// Creates a configuration for `difficulty` with [`DEFAULT_SEED`].
    #[must_use]
    pub const fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            seed: DEFAULT_SEED,
        }
    }

    /// Replaces the seed driving generation, placement and pursuit.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Difficulty of the first level.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Seed of the world's random generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(Difficulty::Medium)
    }
}

/// Failures that prevent a level from being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The maze could not be carved.
    #[error("maze generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Entities could not be placed on the carved maze.
    #[error("entity placement failed: {0}")]
    Placement(#[from] PlacementError),
    /// A hand-authored layout was rejected.
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Everything that is replaced wholesale when a level starts.
#[derive(Clone, Debug)]
struct Level {
    number: u32,
    difficulty: Difficulty,
    grid: MazeGrid,
    player: CellCoord,
    exit: CellCoord,
    agents: Vec<CellCoord>,
    pickups: Vec<Pickup>,
    agent_interval: Duration,
}

impl Level {
    fn generate(difficulty: Difficulty, number: u32, rng: &mut ChaCha8Rng) -> Result<Self, WorldError> {
        let plan = LevelPlan::roll(difficulty, number, rng);
        let start = random_junction(plan.width(), plan.height(), rng);
        let grid = maze_generation::generate(
            plan.width(),
            plan.height(),
            start,
            plan.open_fraction(),
            rng,
        )?;
        let placed = placement::place(&grid, plan.agent_count(), rng)?;

        debug!(
            level = plan.level(),
            %difficulty,
            width = plan.width(),
            height = plan.height(),
            agents = placed.agents.len(),
            "level generated"
        );

        Ok(Self {
            number: plan.level(),
            difficulty,
            grid,
            player: placed.player,
            exit: placed.exit,
            agents: placed.agents,
            pickups: placed.pickups,
            agent_interval: plan.agent_interval(),
        })
    }

    fn from_layout(difficulty: Difficulty, layout: Layout) -> Self {
        Self {
            number: layout.level,
            difficulty,
            agent_interval: scaled_agent_interval(&difficulty.profile(), layout.level),
            grid: layout.grid,
            player: layout.player,
            exit: layout.exit,
            agents: layout.agents,
            pickups: layout.pickups,
        }
    }
}

fn random_junction<R>(width: u32, height: u32, rng: &mut R) -> CellCoord
where
    R: Rng + ?Sized,
{
    let column = rng.gen_range(0..=width.saturating_sub(1) / 2) * 2;
    let row = rng.gen_range(0..=height.saturating_sub(1) / 2) * 2;
    CellCoord::new(column, row)
}

/// Represents the authoritative Labyrinth world state.
#[derive(Debug)]
pub struct World {
    level: Level,
    health: u32,
    paused: bool,
    game_over: bool,
    invincibility_remaining: Duration,
    freeze_remaining: Duration,
    rng: ChaCha8Rng,
    observers: ObserverRegistry,
    /// Tracked apart from the registry, which is swapped out while notifying.
    observer_count: usize,
}

impl World {
    /// Creates a world on level one with full health.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
        let level = Level::generate(config.difficulty(), 1, &mut rng)?;
        Ok(Self::assemble(level, MAX_HEALTH, rng))
    }

    /// Creates a world from a hand-authored layout.
    ///
    /// The configuration seed drives agent movement and any levels
    /// generated after the layout's exit is reached.
    pub fn from_layout(config: WorldConfig, layout: Layout) -> Result<Self, WorldError> {
        layout.validate()?;
        let health = layout.health;
        let level = Level::from_layout(config.difficulty(), layout);
        let rng = ChaCha8Rng::seed_from_u64(config.seed());
        Ok(Self::assemble(level, health, rng))
    }

    fn assemble(level: Level, health: u32, rng: ChaCha8Rng) -> Self {
        Self {
            level,
            health,
            paused: false,
            game_over: false,
            invincibility_remaining: Duration::ZERO,
            freeze_remaining: Duration::ZERO,
            rng,
            observers: ObserverRegistry::default(),
            observer_count: 0,
        }
    }

    /// Coarse lifecycle state. Game over takes precedence over pause.
    #[must_use]
    pub fn state(&self) -> GameState {
        if self.game_over {
            GameState::GameOver
        } else if self.paused {
            GameState::Paused
        } else {
            GameState::Active
        }
    }

    /// Registers an observer and immediately delivers the current state to it.
    pub fn register_observer<O>(&mut self, observer: O) -> ObserverId
    where
        O: WorldObserver + 'static,
    {
        let mut observers = mem::take(&mut self.observers);
        let id = observers.register(Box::new(observer));
        self.observer_count = observers.len();
        observers.notify_one(id, self);
        self.observers = observers;
        id
    }

    /// Removes an observer. Returns `false` when the id is unknown.
    pub fn unregister_observer(&mut self, id: ObserverId) -> bool {
        let removed = self.observers.unregister(id);
        self.observer_count = self.observers.len();
        removed
    }

    /// Attempts to move the player one cell in `direction`.
    ///
    /// Ignored while paused or after game over, and for [`Direction::None`].
    /// Stepping onto the exit generates the next level before the move is
    /// applied; if that fails the error is returned and the world, its
    /// events and its observers are left untouched.
    pub fn move_player(&mut self, direction: Direction, out: &mut Vec<Event>) -> Result<(), WorldError> {
        if self.game_over || self.paused || direction == Direction::None {
            return Ok(());
        }

        let from = self.level.player;
        let Some(to) = from
            .step(direction)
            .filter(|cell| self.level.grid.is_open(*cell))
        else {
            out.push(Event::PlayerBlocked { direction });
            self.notify();
            return Ok(());
        };

        let next_level = if to == self.level.exit {
            let next = self.level.number.saturating_add(1);
            info!(level = self.level.number, "exit reached");
            Some(Level::generate(self.level.difficulty, next, &mut self.rng)?)
        } else {
            None
        };

        self.level.player = to;
        out.push(Event::PlayerMoved { from, to });

        if let Some(index) = self.level.pickups.iter().position(|pickup| pickup.cell() == to) {
            let pickup = self.level.pickups.remove(index);
            self.collect(pickup.kind());
            out.push(Event::PickupCollected { pickup });
        }

        if let Some(level) = next_level {
            self.install(level, out);
            return Ok(());
        }

        if self.level.agents.contains(&to) {
            self.hit_player(out);
        }
        self.notify();
        Ok(())
    }

    /// Advances every agent one pursuit step toward the player.
    ///
    /// Ignored while paused, frozen or after game over. Agents move in
    /// spawn order; once a hit ends the game, the remaining agents keep
    /// their cells for this tick.
    pub fn move_agents(&mut self, out: &mut Vec<Event>) {
        if self.game_over || self.paused || self.agents_frozen() {
            return;
        }

        let target = self.level.player;
        let mut moved = 0_usize;
        for index in 0..self.level.agents.len() {
            let Some(&from) = self.level.agents.get(index) else {
                break;
            };
            let grid = &self.level.grid;
            let to = chase_step(from, target, |cell| grid.is_wall(cell), &mut self.rng);

            if to != from {
                if let Some(slot) = self.level.agents.get_mut(index) {
                    *slot = to;
                }
                moved += 1;
                out.push(Event::AgentMoved { from, to });
            }

            if to == target {
                self.hit_player(out);
                if self.game_over {
                    break;
                }
            }
        }

        trace!(moved, agents = self.level.agents.len(), "agents ticked");
        self.notify();
    }

    /// Counts active effect timers down by `dt`.
    ///
    /// Timers clamp at zero, and an effect ends exactly when its timer does.
    /// Ignored while paused or after game over.
    pub fn decay_effects(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.game_over || self.paused || dt.is_zero() {
            return;
        }

        let invincibility = decay_timer(
            &mut self.invincibility_remaining,
            dt,
            TimedEffect::Invincibility,
            out,
        );
        let freeze = decay_timer(&mut self.freeze_remaining, dt, TimedEffect::FreezeAgents, out);

        if invincibility || freeze {
            self.notify();
        }
    }

    /// Sets the paused flag and notifies observers.
    pub fn set_paused(&mut self, paused: bool, out: &mut Vec<Event>) {
        if self.paused != paused {
            self.paused = paused;
            out.push(Event::PauseChanged { paused });
        }
        self.notify();
    }

    /// Rebuilds the current level with `difficulty`.
    ///
    /// Clears effects, pause and game over. Health returns to
    /// [`MAX_HEALTH`] when `reset_health` is set or the player had none
    /// left. On error the world is left exactly as it was.
    pub fn restart(
        &mut self,
        difficulty: Difficulty,
        reset_health: bool,
        out: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        let level = Level::generate(difficulty, self.level.number, &mut self.rng)?;
        if reset_health || self.health == 0 {
            self.health = MAX_HEALTH;
        }
        self.install(level, out);
        Ok(())
    }

    /// Starts over from level one with full health.
    pub fn new_game(&mut self, difficulty: Difficulty, out: &mut Vec<Event>) -> Result<(), WorldError> {
        let level = Level::generate(difficulty, 1, &mut self.rng)?;
        self.health = MAX_HEALTH;
        self.install(level, out);
        Ok(())
    }

    fn install(&mut self, level: Level, out: &mut Vec<Event>) {
        out.push(Event::LevelStarted {
            level: level.number,
            difficulty: level.difficulty,
            width: level.grid.width(),
            height: level.grid.height(),
        });
        info!(
            level = level.number,
            difficulty = %level.difficulty,
            health = self.health,
            "level started"
        );

        self.level = level;
        self.paused = false;
        self.game_over = false;
        self.invincibility_remaining = Duration::ZERO;
        self.freeze_remaining = Duration::ZERO;
        self.notify();
    }

    fn collect(&mut self, kind: PickupKind) {
        match kind {
            PickupKind::Health => self.health = (self.health + 1).min(MAX_HEALTH),
            PickupKind::Invincibility => self.invincibility_remaining = INVINCIBILITY_DURATION,
            PickupKind::FreezeAgents => self.freeze_remaining = FREEZE_DURATION,
        }
    }

    fn hit_player(&mut self, out: &mut Vec<Event>) {
        if self.is_invincible() {
            return;
        }
        self.health = self.health.saturating_sub(1);
        out.push(Event::PlayerDamaged {
            health: self.health,
        });
        if self.health == 0 {
            self.game_over = true;
            out.push(Event::GameOver);
            info!(level = self.level.number, "game over");
        }
    }

    fn is_invincible(&self) -> bool {
        !self.invincibility_remaining.is_zero()
    }

    fn agents_frozen(&self) -> bool {
        !self.freeze_remaining.is_zero()
    }

    fn notify(&mut self) {
        let mut observers = mem::take(&mut self.observers);
        observers.notify_all(self);
        self.observers = observers;
    }
}

fn decay_timer(
    remaining: &mut Duration,
    dt: Duration,
    effect: TimedEffect,
    out: &mut Vec<Event>,
) -> bool {
    if remaining.is_zero() {
        return false;
    }
    *remaining = remaining.saturating_sub(dt);
    if remaining.is_zero() {
        out.push(Event::EffectExpired { effect });
    }
    true
}

/// Applies the provided command to the world.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
    match command {
        Command::MovePlayer { direction } => world.move_player(direction, out_events)?,
        Command::MoveAgents => world.move_agents(out_events),
        Command::DecayEffects { dt } => world.decay_effects(dt, out_events),
        Command::SetPaused { paused } => world.set_paused(paused, out_events),
        Command::Restart {
            difficulty,
            reset_health,
        } => world.restart(difficulty, reset_health, out_events)?,
        Command::NewGame { difficulty } => world.new_game(difficulty, out_events)?,
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use labyrinth_core::{CellCoord, Difficulty, ExitBearing, GameState, MazeGrid, Pickup};

    use super::World;

    /// Grid of the current level.
    #[must_use]
    pub fn grid(world: &World) -> &MazeGrid {
        &world.level.grid
    }

    /// Width of the current grid in cells.
    #[must_use]
    pub fn width(world: &World) -> u32 {
        world.level.grid.width()
    }

    /// Height of the current grid in cells.
    #[must_use]
    pub fn height(world: &World) -> u32 {
        world.level.grid.height()
    }

    /// Reports whether the cell blocks movement. Cells outside the grid do.
    #[must_use]
    pub fn is_wall(world: &World, cell: CellCoord) -> bool {
        world.level.grid.is_wall(cell)
    }

    /// Cell occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> CellCoord {
        world.level.player
    }

    /// Cell of the exit.
    #[must_use]
    pub fn exit(world: &World) -> CellCoord {
        world.level.exit
    }

    /// Cells occupied by agents, in spawn order.
    #[must_use]
    pub fn agents(world: &World) -> &[CellCoord] {
        &world.level.agents
    }

    /// Reports whether any agent occupies `cell`.
    #[must_use]
    pub fn is_agent_at(world: &World, cell: CellCoord) -> bool {
        world.level.agents.contains(&cell)
    }

    /// Pickups that have not been collected yet.
    #[must_use]
    pub fn pickups(world: &World) -> &[Pickup] {
        &world.level.pickups
    }

    /// Pickup lying on `cell`, if any.
    #[must_use]
    pub fn pickup_at(world: &World, cell: CellCoord) -> Option<Pickup> {
        world
            .level
            .pickups
            .iter()
            .find(|pickup| pickup.cell() == cell)
            .copied()
    }

    /// Player health in `0..=MAX_HEALTH`.
    #[must_use]
    pub fn health(world: &World) -> u32 {
        world.health
    }

    /// Current level number, starting at one.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level.number
    }

    /// Difficulty of the current level.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.level.difficulty
    }

    /// Reports whether the simulation is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Reports whether the player ran out of health.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Coarse lifecycle state.
    #[must_use]
    pub fn state(world: &World) -> GameState {
        world.state()
    }

    /// Reports whether agent contact is currently ignored.
    #[must_use]
    pub fn is_invincible(world: &World) -> bool {
        world.is_invincible()
    }

    /// Reports whether agent ticks are currently skipped.
    #[must_use]
    pub fn agents_frozen(world: &World) -> bool {
        world.agents_frozen()
    }

    /// Time left on the invincibility effect.
    #[must_use]
    pub fn invincibility_remaining(world: &World) -> Duration {
        world.invincibility_remaining
    }

    /// Time left on the agent freeze.
    #[must_use]
    pub fn freeze_remaining(world: &World) -> Duration {
        world.freeze_remaining
    }

    /// Interval at which the driver should tick agents on this level.
    #[must_use]
    pub fn agent_interval(world: &World) -> Duration {
        world.level.agent_interval
    }

    /// Compass hint from the player toward the exit.
    #[must_use]
    pub fn exit_bearing(world: &World) -> ExitBearing {
        ExitBearing::between(world.level.player, world.level.exit)
    }

    /// Number of registered observers, also while a callback is running.
    #[must_use]
    pub fn observer_count(world: &World) -> usize {
        world.observer_count
    }
}
