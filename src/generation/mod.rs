//! # Generation Module
//!
//! Procedural content for each deck: room layout, tunnels, stairs, aliens,
//! items and the key.
//!
//! Every generator takes its randomness from an explicitly passed [`StdRng`],
//! so a seed fully determines the generated deck.

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::config::GameConfig;
use crate::game::Position;
use crate::DerelictResult;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parameters for generating a single deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of room placement attempts; overlapping attempts are dropped
    pub max_rooms: u32,
    pub room_min_size: u32,
    pub room_max_size: u32,
    pub map_width: u32,
    pub map_height: u32,
    /// Floor being generated, starting at 1
    pub floor_index: u32,
    /// Final floor; it gets the key instead of stairs
    pub target_floor: u32,
    /// `(floor_threshold, max_count)` steps for monsters per room
    pub max_monsters_by_floor: Vec<(u32, u32)>,
    /// `(floor_threshold, max_count)` steps for items per room
    pub max_items_by_floor: Vec<(u32, u32)>,
}

impl GenerationConfig {
    /// Builds the generation parameters of one floor from the session config.
    ///
    /// # Examples
    ///
    /// ```
    /// use derelict::{GameConfig, GenerationConfig};
    ///
    /// let config = GenerationConfig::for_floor(&GameConfig::default(), 4);
    /// assert_eq!(config.floor_index, 4);
    /// assert_eq!(config.max_monsters_per_room(), 3);
    /// assert!(!config.is_final_floor());
    /// ```
    pub fn for_floor(game: &GameConfig, floor_index: u32) -> Self {
        Self {
            max_rooms: game.max_rooms,
            room_min_size: game.room_min_size,
            room_max_size: game.room_max_size,
            map_width: game.map_width,
            map_height: game.map_height,
            floor_index,
            target_floor: game.target_floor,
            max_monsters_by_floor: game.max_monsters_by_floor.clone(),
            max_items_by_floor: game.max_items_by_floor.clone(),
        }
    }

    /// Creates a configuration for small test decks.
    pub fn for_testing(floor_index: u32) -> Self {
        Self::for_floor(&GameConfig::for_testing(), floor_index)
    }

    pub fn is_final_floor(&self) -> bool {
        self.floor_index >= self.target_floor
    }

    pub fn max_monsters_per_room(&self) -> u32 {
        utils::max_value_for_floor(&self.max_monsters_by_floor, self.floor_index)
    }

    pub fn max_items_per_room(&self) -> u32 {
        utils::max_value_for_floor(&self.max_items_by_floor, self.floor_index)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::for_floor(&GameConfig::default(), 1)
    }
}

/// A rectangular room.
///
/// The rectangle spans `x1..=x2` by `y1..=y2` where `x2 = x1 + width` and
/// `y2 = y1 + height`. Its outer ring stays wall; only the interior is carved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Acceptance order on the deck
    pub id: u32,
    pub top_left: Position,
    pub width: u32,
    pub height: u32,
}

impl Room {
    /// Creates a new room.
    ///
    /// # Examples
    ///
    /// ```
    /// use derelict::{Position, Room};
    ///
    /// let room = Room::new(0, Position::new(5, 5), 10, 8);
    /// assert_eq!(room.bottom_right(), Position::new(15, 13));
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// ```
    pub fn new(id: u32, top_left: Position, width: u32, height: u32) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
        }
    }

    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32,
            self.top_left.y + self.height as i32,
        )
    }

    /// Center of the room, rounded toward the top-left.
    pub fn center(&self) -> Position {
        let br = self.bottom_right();
        Position::new((self.top_left.x + br.x) / 2, (self.top_left.y + br.y) / 2)
    }

    /// Overlap test with inclusive bounds, so rooms never share a wall.
    pub fn intersects(&self, other: &Room) -> bool {
        let (a1, a2) = (self.top_left, self.bottom_right());
        let (b1, b2) = (other.top_left, other.bottom_right());
        a1.x <= b2.x && a2.x >= b1.x && a1.y <= b2.y && a2.y >= b1.y
    }

    /// Returns true if the position lies in the carved interior.
    pub fn interior_contains(&self, pos: Position) -> bool {
        let br = self.bottom_right();
        pos.x > self.top_left.x && pos.x < br.x && pos.y > self.top_left.y && pos.y < br.y
    }

    /// All interior cells, row by row.
    pub fn interior_positions(&self) -> Vec<Position> {
        let br = self.bottom_right();
        let mut positions = Vec::new();
        for y in (self.top_left.y + 1)..br.y {
            for x in (self.top_left.x + 1)..br.x {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// A uniformly chosen interior cell, or None for a room narrower than 2
    /// in either direction, which has no interior.
    pub fn random_interior(&self, rng: &mut StdRng) -> Option<Position> {
        if self.width < 2 || self.height < 2 {
            return None;
        }
        let br = self.bottom_right();
        let x = rng.gen_range((self.top_left.x + 1)..br.x);
        let y = rng.gen_range((self.top_left.y + 1)..br.y);
        Some(Position::new(x, y))
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DerelictResult<T>;

    /// Checks that generated content meets the requirements of playable content.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DerelictResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator.
    pub fn create_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Looks up a step table of `(floor_threshold, value)` pairs sorted by
    /// threshold: the value of the last threshold not above `floor`, or 0
    /// below the first threshold.
    ///
    /// # Examples
    ///
    /// ```
    /// use derelict::generation::utils::max_value_for_floor;
    ///
    /// let table = [(1, 2), (4, 3), (6, 5)];
    /// assert_eq!(max_value_for_floor(&table, 0), 0);
    /// assert_eq!(max_value_for_floor(&table, 3), 2);
    /// assert_eq!(max_value_for_floor(&table, 4), 3);
    /// assert_eq!(max_value_for_floor(&table, 9), 5);
    /// ```
    pub fn max_value_for_floor(table: &[(u32, u32)], floor: u32) -> u32 {
        let mut current = 0;
        for &(threshold, value) in table {
            if threshold > floor {
                break;
            }
            current = value;
        }
        current
    }
}
