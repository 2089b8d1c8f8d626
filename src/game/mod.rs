//! # Game Module
//!
//! Core game state, deck representation, entities and the turn engine.
//!
//! - Deck (grid) and tile archetypes
//! - Actors and items with capability components
//! - Field-of-view computation
//! - Actions, AI decisions and turn resolution

pub mod actions;
pub mod ai;
pub mod autoexplore;
pub mod entities;
pub mod fov;
pub mod messages;
pub mod state;
pub mod world;

pub use actions::*;
pub use ai::*;
pub use autoexplore::*;
pub use entities::*;
pub use fov::*;
pub use messages::*;
pub use state::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cell coordinate on a deck.
///
/// # Examples
///
/// ```
/// use derelict::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// assert_eq!(pos.chebyshev_distance(Position::new(12, 4)), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Chebyshev distance, the number of king moves between two cells.
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        (self.x - other.x).abs().max((self.y - other.y).abs()) as u32
    }

    /// Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the neighbouring cell in the given direction.
    pub fn step(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }

    /// Returns all 8 adjacent positions in [`Direction::all`] order.
    pub fn adjacent_positions(self) -> Vec<Position> {
        Direction::all().into_iter().map(|dir| self.step(dir)).collect()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Directions for movement and bumping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use derelict::{Direction, Position};
    ///
    /// assert_eq!(Direction::North.to_delta(), Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
            Direction::Northeast => Position::new(1, -1),
            Direction::Northwest => Position::new(-1, -1),
            Direction::Southeast => Position::new(1, 1),
            Direction::Southwest => Position::new(-1, 1),
        }
    }

    /// Converts a position delta to a direction.
    ///
    /// Returns None if the delta is not a single king move.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            (1, -1) => Some(Direction::Northeast),
            (-1, -1) => Some(Direction::Northwest),
            (1, 1) => Some(Direction::Southeast),
            (-1, 1) => Some(Direction::Southwest),
            _ => None,
        }
    }

    /// Returns true for the four diagonal directions.
    pub fn is_diagonal(self) -> bool {
        let delta = self.to_delta();
        delta.x != 0 && delta.y != 0
    }

    /// All 8 directions. This order is the tie-breaking preference for paths.
    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::Northeast,
            Direction::Northwest,
            Direction::Southeast,
            Direction::Southwest,
        ]
    }
}

/// Unique identifier for game entities.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}
