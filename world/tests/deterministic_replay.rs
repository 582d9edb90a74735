use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use labyrinth_core::{CellCoord, Command, Difficulty, Direction, Event};
use labyrinth_world::{self as world, query, World, WorldConfig};

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let first = replay(0x5eed, scripted_commands());
    let second = replay(0x5eed, scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(!first.events.is_empty());
}

#[test]
fn different_seeds_produce_different_sessions() {
    let first = replay(1, scripted_commands());
    let second = replay(2, scripted_commands());
    assert_ne!(first.fingerprint(), second.fingerprint());
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let config = WorldConfig::new(Difficulty::Hard).with_seed(seed);
    let mut world = World::new(config).expect("first level builds");
    let mut events = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events).expect("levels build");
    }

    ReplayOutcome {
        player: query::player(&world),
        agents: query::agents(&world).to_vec(),
        health: query::health(&world),
        level: query::level(&world),
        grid_fingerprint: hash_of(query::grid(&world)),
        events,
    }
}

fn scripted_commands() -> Vec<Command> {
    let walk = [
        Direction::Right,
        Direction::Right,
        Direction::Down,
        Direction::Down,
        Direction::Left,
        Direction::Up,
        Direction::None,
    ];

    let mut commands = Vec::new();
    for round in 0..60 {
        let direction = walk[round % walk.len()];
        commands.push(Command::MovePlayer { direction });
        commands.push(Command::DecayEffects {
            dt: Duration::from_millis(50),
        });
        if round % 3 == 0 {
            commands.push(Command::MoveAgents);
        }
        if round == 30 {
            commands.push(Command::SetPaused { paused: true });
            commands.push(Command::MoveAgents);
            commands.push(Command::SetPaused { paused: false });
        }
        if round == 45 {
            commands.push(Command::Restart {
                difficulty: Difficulty::Medium,
                reset_health: true,
            });
        }
    }
    commands
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    player: CellCoord,
    agents: Vec<CellCoord>,
    health: u32,
    level: u32,
    grid_fingerprint: u64,
    events: Vec<Event>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.player.hash(&mut hasher);
        self.agents.hash(&mut hasher);
        self.health.hash(&mut hasher);
        self.level.hash(&mut hasher);
        self.grid_fingerprint.hash(&mut hasher);
        self.events.hash(&mut hasher);
        hasher.finish()
    }
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
