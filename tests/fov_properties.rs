//! Property tests for field of view and exploration memory.

use derelict::{compute_fov, compute_level_fov, Level, Position, TileType};
use proptest::prelude::*;

const SIZE: usize = 12;

fn grid() -> impl Strategy<Value = Vec<Vec<bool>>> {
    prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.75), SIZE), SIZE)
}

fn cell() -> impl Strategy<Value = Position> {
    (0..SIZE as i32, 0..SIZE as i32).prop_map(|(x, y)| Position::new(x, y))
}

fn level_from(grid: &[Vec<bool>]) -> Level {
    let mut level = Level::new(1, SIZE as u32, SIZE as u32);
    for (y, row) in grid.iter().enumerate() {
        for (x, open) in row.iter().enumerate() {
            if *open {
                level
                    .set_tile(Position::new(x as i32, y as i32), TileType::Floor)
                    .unwrap();
            }
        }
    }
    level
}

proptest! {
    #[test]
    fn sight_between_open_cells_is_mutual(mut transparent in grid(), origin in cell(), radius in 1i32..10) {
        transparent[origin.y as usize][origin.x as usize] = true;
        let from_origin = compute_fov(&transparent, origin, radius);

        for y in 0..SIZE {
            for x in 0..SIZE {
                if !transparent[y][x] || !from_origin[y][x] {
                    continue;
                }
                let other = Position::new(x as i32, y as i32);
                let back = compute_fov(&transparent, other, radius);
                prop_assert!(
                    back[origin.y as usize][origin.x as usize],
                    "{} sees {} but not the other way round",
                    origin,
                    other
                );
            }
        }
    }

    #[test]
    fn fov_is_deterministic(transparent in grid(), origin in cell(), radius in 0i32..10) {
        let first = compute_fov(&transparent, origin, radius);
        let second = compute_fov(&transparent, origin, radius);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn origin_always_visible_and_radius_respected(transparent in grid(), origin in cell(), radius in 0i32..10) {
        let visible = compute_fov(&transparent, origin, radius);
        prop_assert!(visible[origin.y as usize][origin.x as usize]);

        for y in 0..SIZE as i32 {
            for x in 0..SIZE as i32 {
                let (dx, dy) = (x - origin.x, y - origin.y);
                if dx * dx + dy * dy > radius.max(0) * radius.max(0) {
                    prop_assert!(!visible[y as usize][x as usize]);
                }
            }
        }
    }

    #[test]
    fn explored_only_grows(open in grid(), first in cell(), second in cell()) {
        let mut level = level_from(&open);

        let seen_first = compute_level_fov(&level, first, 8);
        level.update_visibility(seen_first.clone()).unwrap();
        let seen_second = compute_level_fov(&level, second, 8);
        level.update_visibility(seen_second.clone()).unwrap();

        for y in 0..SIZE {
            for x in 0..SIZE {
                prop_assert_eq!(level.visible[y][x], seen_second[y][x]);
                prop_assert_eq!(level.explored[y][x], seen_first[y][x] || seen_second[y][x]);
            }
        }
    }
}

#[test]
fn non_positive_radius_reveals_only_the_origin() {
    let open = vec![vec![true; SIZE]; SIZE];
    let origin = Position::new(6, 6);
    for radius in [0, -3] {
        let visible = compute_fov(&open, origin, radius);
        let count = visible.iter().flatten().filter(|v| **v).count();
        assert_eq!(count, 1);
    }
}
