//! # Grid Mathematics
//!
//! Discrete geometry helpers.

use crate::game::Position;

/// Cells on the Bresenham line from `start` to `end`, both ends included.
///
/// # Examples
///
/// ```
/// use derelict::{bresenham_line, Position};
///
/// let line = bresenham_line(Position::new(0, 0), Position::new(3, 0));
/// assert_eq!(line.len(), 4);
/// assert_eq!(line[3], Position::new(3, 0));
/// ```
pub fn bresenham_line(start: Position, end: Position) -> Vec<Position> {
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };

    let mut err = dx + dy;
    let mut current = start;
    let mut cells = Vec::with_capacity((dx - dy) as usize + 1);

    loop {
        cells.push(current);
        if current == end {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            current.x += sx;
        }
        if e2 <= dx {
            err += dx;
            current.y += sy;
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point() {
        let p = Position::new(4, 4);
        assert_eq!(bresenham_line(p, p), vec![p]);
    }

    #[test]
    fn test_vertical_line_upwards() {
        let line = bresenham_line(Position::new(2, 5), Position::new(2, 1));
        assert_eq!(line.len(), 5);
        assert!(line.iter().all(|p| p.x == 2));
        assert_eq!(line.first(), Some(&Position::new(2, 5)));
        assert_eq!(line.last(), Some(&Position::new(2, 1)));
    }

    #[test]
    fn test_diagonal_line_is_contiguous() {
        let line = bresenham_line(Position::new(0, 0), Position::new(7, 3));
        assert_eq!(line.len(), 8);
        for pair in line.windows(2) {
            assert_eq!(pair[0].chebyshev_distance(pair[1]), 1);
        }
    }
}
