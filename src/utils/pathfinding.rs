//! # Pathfinding
//!
//! Weighted A* over a deck. Orthogonal steps cost 2 and diagonal steps 3,
//! multiplied by the cost of the entered cell: 1 for an open cell, 11 when a
//! blocking entity stands there. Routing around a crowd is preferred, but a
//! crowd never makes a path impossible.

use crate::game::{Direction, Level, Position};
use ::pathfinding::prelude::astar;
use std::collections::HashSet;

/// Extra cell cost for cells holding a blocking entity.
pub const BLOCKED_CELL_PENALTY: u32 = 10;

const ORTHOGONAL_STEP: u32 = 2;
const DIAGONAL_STEP: u32 = 3;

/// Cheapest path from `start` to `goal`, excluding `start`.
///
/// Neighbours are explored in [`Direction::all`] order, which makes the result
/// deterministic when several paths share the lowest cost. Returns None when
/// the goal cannot be reached over walkable tiles.
pub fn find_path(
    level: &Level,
    blocked: &HashSet<Position>,
    start: Position,
    goal: Position,
) -> Option<Vec<Position>> {
    if !level.is_walkable(goal) {
        return None;
    }

    let cell_cost = |pos: Position| {
        if blocked.contains(&pos) {
            1 + BLOCKED_CELL_PENALTY
        } else {
            1
        }
    };

    let (path, _cost) = astar(
        &start,
        |&pos| {
            Direction::all()
                .into_iter()
                .filter_map(|dir| {
                    let next = pos.step(dir);
                    if !level.is_walkable(next) {
                        return None;
                    }
                    let step = if dir.is_diagonal() {
                        DIAGONAL_STEP
                    } else {
                        ORTHOGONAL_STEP
                    };
                    Some((next, step * cell_cost(next)))
                })
                .collect::<Vec<_>>()
        },
        |&pos| octile_estimate(pos, goal),
        |&pos| pos == goal,
    )?;

    Some(path.into_iter().skip(1).collect())
}

/// Lower bound on the cost between two cells.
fn octile_estimate(from: Position, to: Position) -> u32 {
    let dx = (from.x - to.x).unsigned_abs();
    let dy = (from.y - to.y).unsigned_abs();
    let diagonal = dx.min(dy);
    let straight = dx.max(dy) - diagonal;
    diagonal * DIAGONAL_STEP + straight * ORTHOGONAL_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TileType;

    fn open_level(width: u32, height: u32) -> Level {
        let mut level = Level::new(1, width, height);
        for y in 1..height as i32 - 1 {
            for x in 1..width as i32 - 1 {
                level.set_tile(Position::new(x, y), TileType::Floor).unwrap();
            }
        }
        level
    }

    #[test]
    fn test_straight_path() {
        let level = open_level(10, 5);
        let path = find_path(&level, &HashSet::new(), Position::new(1, 2), Position::new(5, 2)).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&Position::new(5, 2)));
        assert!(!path.contains(&Position::new(1, 2)));
    }

    #[test]
    fn test_diagonal_shortcut() {
        let level = open_level(10, 10);
        let path = find_path(&level, &HashSet::new(), Position::new(1, 1), Position::new(4, 4)).unwrap();
        assert_eq!(path, vec![Position::new(2, 2), Position::new(3, 3), Position::new(4, 4)]);
    }

    #[test]
    fn test_routes_around_blocking_entity() {
        let level = open_level(10, 5);
        let mut blocked = HashSet::new();
        blocked.insert(Position::new(3, 2));
        let path = find_path(&level, &blocked, Position::new(1, 2), Position::new(5, 2)).unwrap();
        assert!(!path.contains(&Position::new(3, 2)));
        assert_eq!(path.last(), Some(&Position::new(5, 2)));
    }

    #[test]
    fn test_unreachable_goal() {
        let mut level = open_level(10, 5);
        for y in 0..5 {
            level.set_tile(Position::new(4, y), TileType::Wall).unwrap();
        }
        assert!(find_path(&level, &HashSet::new(), Position::new(1, 2), Position::new(6, 2)).is_none());
        assert!(find_path(&level, &HashSet::new(), Position::new(1, 2), Position::new(4, 2)).is_none());
    }

    #[test]
    fn test_deterministic() {
        let level = open_level(12, 12);
        let a = find_path(&level, &HashSet::new(), Position::new(1, 1), Position::new(9, 6));
        let b = find_path(&level, &HashSet::new(), Position::new(1, 1), Position::new(9, 6));
        assert_eq!(a, b);
    }
}
