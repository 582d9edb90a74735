#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy pursuit heuristic for maze agents.
//!
//! Agents do not plan paths. Each tick an agent looks at the sign of the
//! offset to its target on both axes and tries to close it by one cell,
//! picking the axis order at random when both offsets are non-zero. A
//! blocked preferred axis falls back to the other one; if both are
//! blocked the agent stays put.

use labyrinth_core::{CellCoord, Direction};
use rand::Rng;

/// Horizontal step that reduces the column offset to `target`, if any.
#[must_use]
pub fn horizontal_toward(from: CellCoord, target: CellCoord) -> Option<Direction> {
    match target.column().cmp(&from.column()) {
        std::cmp::Ordering::Greater => Some(Direction::Right),
        std::cmp::Ordering::Less => Some(Direction::Left),
        std::cmp::Ordering::Equal => None,
    }
}

/// Vertical step that reduces the row offset to `target`, if any.
#[must_use]
pub fn vertical_toward(from: CellCoord, target: CellCoord) -> Option<Direction> {
    match target.row().cmp(&from.row()) {
        std::cmp::Ordering::Greater => Some(Direction::Down),
        std::cmp::Ordering::Less => Some(Direction::Up),
        std::cmp::Ordering::Equal => None,
    }
}

/// Directions to try, in order, when chasing `target` from `from`.
///
/// Holds zero, one or two entries. The generator is consulted only when
/// both axes need closing.
pub fn chase_order<R>(from: CellCoord, target: CellCoord, rng: &mut R) -> Vec<Direction>
where
    R: Rng + ?Sized,
{
    match (horizontal_toward(from, target), vertical_toward(from, target)) {
        (Some(horizontal), Some(vertical)) => {
            if rng.gen_bool(0.5) {
                vec![horizontal, vertical]
            } else {
                vec![vertical, horizontal]
            }
        }
        (Some(only), None) | (None, Some(only)) => vec![only],
        (None, None) => Vec::new(),
    }
}

/// Cell an agent at `from` occupies after one pursuit step toward `target`.
///
/// `is_blocked` must report walls, including cells outside the grid.
pub fn chase_step<F, R>(from: CellCoord, target: CellCoord, is_blocked: F, rng: &mut R) -> CellCoord
where
    F: Fn(CellCoord) -> bool,
    R: Rng + ?Sized,
{
    chase_order(from, target, rng)
        .into_iter()
        .filter_map(|direction| from.step(direction))
        .find(|candidate| !is_blocked(*candidate))
        .unwrap_or(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn aligned_target_uses_single_axis() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let from = CellCoord::new(4, 4);
        assert_eq!(
            chase_order(from, CellCoord::new(4, 1), &mut rng),
            vec![Direction::Up]
        );
        assert_eq!(
            chase_order(from, CellCoord::new(9, 4), &mut rng),
            vec![Direction::Right]
        );
        assert!(chase_order(from, from, &mut rng).is_empty());
    }

    #[test]
    fn diagonal_target_tries_both_axes() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let order = chase_order(CellCoord::new(4, 4), CellCoord::new(0, 8), &mut rng);
        assert_eq!(order.len(), 2);
        assert!(order.contains(&Direction::Left));
        assert!(order.contains(&Direction::Down));
    }

    #[test]
    fn blocked_preferred_axis_falls_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let from = CellCoord::new(2, 2);
        let wall = CellCoord::new(3, 2);
        for _ in 0..32 {
            let next = chase_step(from, CellCoord::new(4, 4), |cell| cell == wall, &mut rng);
            assert_eq!(next, CellCoord::new(2, 3));
        }
    }

    #[test]
    fn fully_blocked_agent_stays() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let from = CellCoord::new(2, 2);
        let next = chase_step(from, CellCoord::new(0, 0), |_| true, &mut rng);
        assert_eq!(next, from);
    }
}
