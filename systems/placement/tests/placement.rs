use std::collections::HashSet;

use labyrinth_core::{CellCoord, MazeGrid, PickupKind, PICKUP_KINDS};
use labyrinth_system_maze_generation::generate;
use labyrinth_system_placement::{agent_capacity, place, Placement};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn generated(seed: u64, width: u32, height: u32, open_fraction: f32) -> (MazeGrid, ChaCha8Rng) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = generate(width, height, CellCoord::new(0, 0), open_fraction, &mut rng)
        .expect("valid generation parameters");
    (grid, rng)
}

fn occupied(placement: &Placement) -> Vec<CellCoord> {
    let mut cells = vec![placement.player, placement.exit];
    cells.extend(placement.agents.iter().copied());
    cells.extend(placement.pickups.iter().map(|pickup| pickup.cell()));
    cells
}

#[test]
fn every_entity_lands_on_its_own_passable_cell() {
    for seed in 0..50 {
        let (grid, mut rng) = generated(seed, 25, 27, 0.5);
        let placement = place(&grid, 20, &mut rng).expect("roomy grid");

        let cells = occupied(&placement);
        let unique: HashSet<_> = cells.iter().copied().collect();
        assert_eq!(unique.len(), cells.len(), "seed {seed}: entities overlap");
        assert!(cells.iter().all(|cell| grid.is_open(*cell)), "seed {seed}");
    }
}

#[test]
fn player_and_exit_use_distinct_junctions() {
    for seed in 0..50 {
        let (grid, mut rng) = generated(seed, 11, 9, 0.0);
        let placement = place(&grid, 0, &mut rng).expect("carved grid has junctions");
        assert!(placement.player.is_junction());
        assert!(placement.exit.is_junction());
        assert_ne!(placement.player, placement.exit);
    }
}

#[test]
fn pickups_cover_each_kind_once() {
    let (grid, mut rng) = generated(7, 15, 15, 0.3);
    let placement = place(&grid, 5, &mut rng).expect("roomy grid");
    let kinds: Vec<PickupKind> = placement.pickups.iter().map(|pickup| pickup.kind()).collect();
    assert_eq!(kinds, PICKUP_KINDS.to_vec());
}

#[test]
fn agent_request_is_capped_by_capacity() {
    let (grid, mut rng) = generated(3, 5, 5, 0.0);
    let capacity = agent_capacity(&grid);
    let placement = place(&grid, 1_000, &mut rng).expect("capacity respected");
    assert_eq!(placement.agents.len(), capacity);
    assert_eq!(occupied(&placement).len(), grid.open_cell_count());
}

#[test]
fn large_open_grid_fills_to_capacity() {
    let rows: Vec<String> = (0..61).map(|_| ".".repeat(61)).collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let grid = MazeGrid::from_rows(&rows).expect("grid parses");
    let capacity = agent_capacity(&grid);
    assert_eq!(capacity, 61 * 61 - 5);

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let placement = place(&grid, capacity, &mut rng)
            .unwrap_or_else(|error| panic!("seed {seed}: {error}"));
        assert_eq!(placement.agents.len(), capacity, "seed {seed}");

        let unique: HashSet<_> = occupied(&placement).into_iter().collect();
        assert_eq!(unique.len(), grid.open_cell_count(), "seed {seed}");
    }
}

#[test]
fn same_seed_places_identically() {
    let (grid, mut first) = generated(21, 21, 21, 0.4);
    let mut second = first.clone();
    let a = place(&grid, 12, &mut first).expect("roomy grid");
    let b = place(&grid, 12, &mut second).expect("roomy grid");
    assert_eq!(a, b);
}
