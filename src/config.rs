//! # Game Configuration
//!
//! Session-wide settings: deck dimensions, room bounds, the target floor and
//! the per-floor difficulty tables. Values can be overridden from a JSON file;
//! any missing field keeps its default.

use crate::DerelictResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default deck width in tiles
pub const DEFAULT_MAP_WIDTH: u32 = 100;

/// Default deck height in tiles
pub const DEFAULT_MAP_HEIGHT: u32 = 46;

/// Number of room placement attempts per deck
pub const DEFAULT_MAX_ROOMS: u32 = 60;

/// Smallest room edge, walls included
pub const DEFAULT_ROOM_MIN_SIZE: u32 = 9;

/// Largest room edge, walls included
pub const DEFAULT_ROOM_MAX_SIZE: u32 = 16;

/// Deck holding the key on normal difficulty
pub const DEFAULT_TARGET_FLOOR: u32 = 5;

/// Player sight radius
pub const DEFAULT_FOV_RADIUS: i32 = 8;

/// One inventory slot per letter of the alphabet
pub const DEFAULT_INVENTORY_CAPACITY: usize = 26;

/// `(floor_threshold, max_count)` pairs for monsters per room.
pub const DEFAULT_MAX_MONSTERS_BY_FLOOR: [(u32, u32); 3] = [(1, 2), (4, 3), (6, 5)];

/// `(floor_threshold, max_count)` pairs for items per room.
pub const DEFAULT_MAX_ITEMS_BY_FLOOR: [(u32, u32); 2] = [(1, 1), (4, 2)];

/// How deep the player has to go to find the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// The deck on which the key is hidden.
    pub fn target_floor(self) -> u32 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Normal => 5,
            Difficulty::Hard => 8,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Normal
    }
}

/// Settings for a whole game session.
///
/// # Examples
///
/// ```
/// use derelict::{Difficulty, GameConfig};
///
/// let config = GameConfig::default().with_difficulty(Difficulty::Hard);
/// assert_eq!(config.target_floor, 8);
/// assert!(config.room_min_size <= config.room_max_size);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map_width: u32,
    pub map_height: u32,
    pub max_rooms: u32,
    pub room_min_size: u32,
    pub room_max_size: u32,
    /// Final deck; the key lies here and no stairs lead further down
    pub target_floor: u32,
    pub fov_radius: i32,
    pub player_inventory_capacity: usize,
    pub max_monsters_by_floor: Vec<(u32, u32)>,
    pub max_items_by_floor: Vec<(u32, u32)>,
}

impl GameConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            max_rooms: DEFAULT_MAX_ROOMS,
            room_min_size: DEFAULT_ROOM_MIN_SIZE,
            room_max_size: DEFAULT_ROOM_MAX_SIZE,
            target_floor: DEFAULT_TARGET_FLOOR,
            fov_radius: DEFAULT_FOV_RADIUS,
            player_inventory_capacity: DEFAULT_INVENTORY_CAPACITY,
            max_monsters_by_floor: DEFAULT_MAX_MONSTERS_BY_FLOOR.to_vec(),
            max_items_by_floor: DEFAULT_MAX_ITEMS_BY_FLOOR.to_vec(),
        }
    }

    /// Creates a configuration with small decks, handy for tests.
    pub fn for_testing() -> Self {
        Self {
            map_width: 50,
            map_height: 30,
            max_rooms: 15,
            room_min_size: 5,
            room_max_size: 9,
            target_floor: 2,
            ..Self::new()
        }
    }

    /// Returns a copy with the target floor taken from the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.target_floor = difficulty.target_floor();
        self
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> DerelictResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DerelictResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
