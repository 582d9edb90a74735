use labyrinth_core::{round_up_to_odd, CellCoord, MazeGrid};
use labyrinth_system_maze_generation::{carve, generate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_junction(width: u32, height: u32, rng: &mut ChaCha8Rng) -> CellCoord {
    let column = rng.gen_range(0..=(width - 1) / 2) * 2;
    let row = rng.gen_range(0..=(height - 1) / 2) * 2;
    CellCoord::new(column, row)
}

fn assert_fully_connected(grid: &MazeGrid, start: CellCoord) {
    let reached = grid.reachable_from(start).len();
    assert_eq!(
        reached,
        grid.open_cell_count(),
        "{}x{} grid has open cells unreachable from {start:?}",
        grid.width(),
        grid.height(),
    );
}

#[test]
fn carved_mazes_are_fully_connected() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x00c0_ffee);
    for _ in 0..200 {
        let width = round_up_to_odd(rng.gen_range(3..40));
        let height = round_up_to_odd(rng.gen_range(3..40));
        let start = random_junction(width, height, &mut rng);

        let grid = carve(width, height, start, &mut rng).expect("valid parameters");
        assert_fully_connected(&grid, start);
        assert!(
            grid.junctions().all(|junction| grid.is_open(junction)),
            "carving must reach every junction",
        );
    }
}

#[test]
fn carved_maze_is_a_tree() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let grid = carve(21, 15, CellCoord::new(10, 6), &mut rng).expect("valid parameters");

    let junctions = grid.junctions().count();
    let open = grid.open_cell_count();
    // a spanning tree over n junctions opens n - 1 connecting walls
    assert_eq!(open, junctions + (junctions - 1));
    assert!(grid
        .cells()
        .filter(|cell| cell.column() % 2 == 1 && cell.row() % 2 == 1)
        .all(|cell| grid.is_wall(cell)));
}

#[test]
fn opened_mazes_stay_connected() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for fraction in [0.0, 0.2, 0.4, 0.6, 0.95] {
        for _ in 0..25 {
            let start = random_junction(25, 31, &mut rng);
            let grid = generate(25, 31, start, fraction, &mut rng).expect("valid parameters");
            assert_fully_connected(&grid, start);
        }
    }
}

#[test]
fn open_up_only_adds_passages() {
    let start = CellCoord::new(0, 0);
    let carved = carve(11, 11, start, &mut ChaCha8Rng::seed_from_u64(8)).expect("valid parameters");
    let opened = generate(11, 11, start, 0.5, &mut ChaCha8Rng::seed_from_u64(8))
        .expect("valid parameters");

    assert!(carved
        .open_cells()
        .all(|cell| opened.is_open(cell)));
    assert!(opened.open_cell_count() >= carved.open_cell_count());
}

#[test]
fn same_seed_produces_same_maze() {
    let start = CellCoord::new(4, 4);
    let first = generate(35, 35, start, 0.5, &mut ChaCha8Rng::seed_from_u64(7)).expect("valid");
    let second = generate(35, 35, start, 0.5, &mut ChaCha8Rng::seed_from_u64(7)).expect("valid");
    assert_eq!(first, second);
}
