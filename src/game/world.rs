//! # World Representation
//!
//! Tile archetypes, the per-deck grid ([`Level`]) and the session-wide
//! [`World`] that produces a new deck each time the player descends.

use crate::config::GameConfig;
use crate::game::{EntityId, Position};
use crate::generation::{GeneratedFloor, GenerationConfig, Generator, RoomCorridorGenerator};
use crate::{DerelictError, DerelictResult};
use log::{info, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// What a single cell looks like: a character plus its colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Glyph {
    pub const fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self { ch, fg, bg }
    }
}

/// Drawn for cells that are neither visible nor explored.
pub const SHROUD: Glyph = Glyph::new(' ', Rgb(255, 255, 255), Rgb(26, 1, 52));

/// Static tile archetypes. A deck stores one archetype per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Floor,
    Wall,
    DownStairs,
}

impl TileType {
    /// Whether actors can stand on this tile.
    pub fn walkable(self) -> bool {
        match self {
            TileType::Floor | TileType::DownStairs => true,
            TileType::Wall => false,
        }
    }

    /// Whether this tile lets light through.
    pub fn transparent(self) -> bool {
        match self {
            TileType::Floor | TileType::DownStairs => true,
            TileType::Wall => false,
        }
    }

    /// Glyph for explored cells outside the field of view.
    pub fn dark(self) -> Glyph {
        match self {
            TileType::Floor => Glyph::new(' ', Rgb::WHITE, Rgb(110, 4, 161)),
            TileType::Wall => Glyph::new(' ', Rgb::WHITE, Rgb(87, 3, 128)),
            TileType::DownStairs => Glyph::new('>', Rgb(0, 0, 100), Rgb(50, 50, 150)),
        }
    }

    /// Glyph for cells inside the field of view.
    pub fn light(self) -> Glyph {
        match self {
            TileType::Floor => Glyph::new(' ', Rgb::WHITE, Rgb(219, 149, 5)),
            TileType::Wall => Glyph::new(' ', Rgb::WHITE, Rgb(161, 110, 4)),
            TileType::DownStairs => Glyph::new('>', Rgb::WHITE, Rgb(200, 180, 50)),
        }
    }
}

/// A single deck of the ship.
///
/// All grids are indexed `[y][x]`. Every cell starts as [`TileType::Wall`],
/// not visible and not explored.
///
/// # Examples
///
/// ```
/// use derelict::{Level, Position, TileType};
///
/// let mut level = Level::new(1, 10, 8);
/// assert_eq!(level.get_tile(Position::new(3, 3)), Some(TileType::Wall));
/// level.set_tile(Position::new(3, 3), TileType::Floor).unwrap();
/// assert!(level.is_walkable(Position::new(3, 3)));
/// assert!(level.set_tile(Position::new(10, 0), TileType::Floor).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Floor index this deck was generated for
    pub floor: u32,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Vec<TileType>>,
    /// Cells in the player's current field of view
    pub visible: Vec<Vec<bool>>,
    /// Cells the player has ever seen
    pub explored: Vec<Vec<bool>>,
    /// Entities on this deck, in insertion order, without duplicates
    pub entities: Vec<EntityId>,
    /// None on the final floor
    pub downstairs_location: Option<Position>,
}

impl Level {
    /// Creates a deck filled with walls.
    pub fn new(floor: u32, width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self {
            floor,
            width,
            height,
            tiles: vec![vec![TileType::Wall; w]; h],
            visible: vec![vec![false; w]; h],
            explored: vec![vec![false; w]; h],
            entities: Vec::new(),
            downstairs_location: None,
        }
    }

    /// Returns true if the position lies on the deck.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    pub fn get_tile(&self, pos: Position) -> Option<TileType> {
        if self.in_bounds(pos) {
            Some(self.tiles[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Writes a tile, failing for out-of-bounds positions.
    pub fn set_tile(&mut self, pos: Position, tile: TileType) -> DerelictResult<()> {
        if !self.in_bounds(pos) {
            return Err(DerelictError::InvalidState(format!(
                "Position {} is outside the {}x{} deck",
                pos, self.width, self.height
            )));
        }
        self.tiles[pos.y as usize][pos.x as usize] = tile;
        Ok(())
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get_tile(pos).map(TileType::walkable).unwrap_or(false)
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.visible[pos.y as usize][pos.x as usize]
    }

    pub fn is_explored(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.explored[pos.y as usize][pos.x as usize]
    }

    /// Per-cell transparency, the input of the field-of-view computation.
    pub fn transparency_mask(&self) -> Vec<Vec<bool>> {
        self.tiles
            .iter()
            .map(|row| row.iter().map(|tile| tile.transparent()).collect())
            .collect()
    }

    /// Replaces the visible set and merges it into the explored set.
    pub fn update_visibility(&mut self, visible: Vec<Vec<bool>>) -> DerelictResult<()> {
        let matches = visible.len() == self.height as usize
            && visible.iter().all(|row| row.len() == self.width as usize);
        if !matches {
            return Err(DerelictError::InvalidState(
                "Visibility grid does not match deck dimensions".to_string(),
            ));
        }

        for (explored_row, visible_row) in self.explored.iter_mut().zip(&visible) {
            for (explored, &seen) in explored_row.iter_mut().zip(visible_row) {
                *explored |= seen;
            }
        }
        self.visible = visible;
        Ok(())
    }

    /// Adds an entity to this deck. Returns false if it was already present.
    pub fn add_entity(&mut self, entity_id: EntityId) -> bool {
        if self.entities.contains(&entity_id) {
            return false;
        }
        self.entities.push(entity_id);
        true
    }

    /// Removes an entity from this deck. Returns false if it was not present.
    pub fn remove_entity(&mut self, entity_id: &EntityId) -> bool {
        let before = self.entities.len();
        self.entities.retain(|id| id != entity_id);
        self.entities.len() != before
    }

    pub fn contains_entity(&self, entity_id: &EntityId) -> bool {
        self.entities.contains(entity_id)
    }

    /// Counts cells holding the given archetype.
    pub fn count_tiles(&self, tile: TileType) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == tile)
            .count()
    }
}

/// Session-wide generation parameters and the floor counter.
///
/// The counter only ever grows; a fresh [`World`] means a fresh session.
#[derive(Debug, Clone)]
pub struct World {
    pub config: GameConfig,
    /// Floor of the current deck, 0 before the first deck is generated
    pub current_floor: u32,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            current_floor: 0,
        }
    }

    /// The deck holding the key.
    pub fn target_floor(&self) -> u32 {
        self.config.target_floor
    }

    pub fn is_final_floor(&self) -> bool {
        self.current_floor >= self.config.target_floor
    }

    /// Advances the floor counter and generates the next deck.
    pub fn generate_floor(&mut self, rng: &mut StdRng) -> DerelictResult<GeneratedFloor> {
        self.current_floor += 1;

        let config = GenerationConfig::for_floor(&self.config, self.current_floor);
        let generator = RoomCorridorGenerator::new();
        let floor = generator.generate(&config, rng)?;

        if let Err(e) = generator.validate(&floor, &config) {
            warn!("Deck {} is degenerate: {}", self.current_floor, e);
        }

        info!(
            "Generated deck {}/{} with {} rooms and {} entities",
            self.current_floor,
            self.config.target_floor,
            floor.rooms.len(),
            floor.entities.len()
        );

        Ok(floor)
    }
}
