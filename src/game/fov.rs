//! # Field of View
//!
//! Symmetric shadowcasting. Each of the four quadrants around the origin is
//! scanned row by row; slopes are kept as exact fractions so the result does
//! not depend on floating point rounding. Between two transparent cells the
//! result is symmetric: if `a` sees `b` then `b` sees `a`.

use crate::game::{Level, Position};

/// Cells visible from `origin` within `radius`.
///
/// `transparent` is indexed `[y][x]`; cells outside it are opaque. The output
/// has the same dimensions. Opaque cells are visible themselves but hide what
/// lies behind them. A radius of zero or less only reveals the origin; a
/// radius larger than the grid behaves like an unlimited one.
///
/// # Examples
///
/// ```
/// use derelict::{compute_fov, Position};
///
/// let open = vec![vec![true; 9]; 9];
/// let visible = compute_fov(&open, Position::new(4, 4), 3);
/// assert!(visible[4][7]);
/// assert!(!visible[4][8]);
/// ```
pub fn compute_fov(transparent: &[Vec<bool>], origin: Position, radius: i32) -> Vec<Vec<bool>> {
    let height = transparent.len();
    let width = transparent.first().map(|row| row.len()).unwrap_or(0);
    let mut visible = vec![vec![false; width]; height];

    let in_bounds = |pos: Position| {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height
    };
    if !in_bounds(origin) {
        return visible;
    }
    visible[origin.y as usize][origin.x as usize] = true;
    if radius <= 0 {
        return visible;
    }
    // No cell lies farther than width + height away; keeps the squares in range
    let reach = i32::try_from(width + height).unwrap_or(i32::MAX / 2);
    let radius = radius.min(reach);

    let is_wall = |pos: Position| !in_bounds(pos) || !transparent[pos.y as usize][pos.x as usize];

    for quadrant in Quadrant::ALL {
        let mut rows = vec![Row {
            depth: 1,
            start: Slope::new(-1, 1),
            end: Slope::new(1, 1),
        }];

        while let Some(row) = rows.pop() {
            let mut start = row.start;
            let mut previous_wall: Option<bool> = None;

            for col in row.min_col()..=row.max_col() {
                let pos = quadrant.transform(origin, row.depth, col);
                let wall = is_wall(pos);

                let within_radius = col * col + row.depth * row.depth <= radius * radius;
                if (wall || row.is_symmetric(col, start)) && within_radius && in_bounds(pos) {
                    visible[pos.y as usize][pos.x as usize] = true;
                }

                match previous_wall {
                    Some(true) if !wall => start = Slope::of_cell(row.depth, col),
                    Some(false) if wall && row.depth < radius => rows.push(Row {
                        depth: row.depth + 1,
                        start,
                        end: Slope::of_cell(row.depth, col),
                    }),
                    _ => {}
                }
                previous_wall = Some(wall);
            }

            if previous_wall == Some(false) && row.depth < radius {
                rows.push(Row {
                    depth: row.depth + 1,
                    start,
                    end: row.end,
                });
            }
        }
    }

    visible
}

/// Field of view over a deck's tiles.
pub fn compute_level_fov(level: &Level, origin: Position, radius: i32) -> Vec<Vec<bool>> {
    compute_fov(&level.transparency_mask(), origin, radius)
}

#[derive(Debug, Clone, Copy)]
enum Quadrant {
    North,
    East,
    South,
    West,
}

impl Quadrant {
    const ALL: [Quadrant; 4] = [Quadrant::North, Quadrant::East, Quadrant::South, Quadrant::West];

    fn transform(self, origin: Position, depth: i32, col: i32) -> Position {
        match self {
            Quadrant::North => Position::new(origin.x + col, origin.y - depth),
            Quadrant::South => Position::new(origin.x + col, origin.y + depth),
            Quadrant::East => Position::new(origin.x + depth, origin.y + col),
            Quadrant::West => Position::new(origin.x - depth, origin.y + col),
        }
    }
}

/// `num / den` with a positive denominator.
#[derive(Debug, Clone, Copy)]
struct Slope {
    num: i32,
    den: i32,
}

impl Slope {
    fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Slope through the left edge of a cell.
    fn of_cell(depth: i32, col: i32) -> Self {
        Self::new(2 * col - 1, 2 * depth)
    }
}

#[derive(Debug, Clone, Copy)]
struct Row {
    depth: i32,
    start: Slope,
    end: Slope,
}

impl Row {
    /// `floor(depth * start + 1/2)`
    fn min_col(&self) -> i32 {
        (2 * self.depth * self.start.num + self.start.den).div_euclid(2 * self.start.den)
    }

    /// `ceil(depth * end - 1/2)`
    fn max_col(&self) -> i32 {
        let num = 2 * self.depth * self.end.num - self.end.den;
        -(-num).div_euclid(2 * self.end.den)
    }

    fn is_symmetric(&self, col: i32, start: Slope) -> bool {
        col * start.den >= self.depth * start.num && col * self.end.den <= self.depth * self.end.num
    }
}
