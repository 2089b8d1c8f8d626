//! # Deck Generation
//!
//! Room-and-corridor layout for a single deck.
//!
//! The generator makes `max_rooms` placement attempts. Each attempt samples a
//! room size and offset; a candidate overlapping any accepted room is dropped
//! rather than retried. Every accepted room is carved, joined to the previous
//! room with an L-shaped tunnel and stocked with aliens and items. The last
//! room receives the stairs, or the key on the final deck.

use crate::game::{Entity, Level, Owner, Position, TileType};
use crate::generation::{
    ship_key, EncounterGenerator, GenerationConfig, Generator, ItemGenerator, Room,
};
use crate::utils::bresenham_line;
use crate::{DerelictError, DerelictResult};
use log::{debug, trace, warn};
use rand::{rngs::StdRng, Rng};
use std::collections::{HashSet, VecDeque};

/// A carved and populated deck, ready to be handed to the game state.
#[derive(Debug, Clone)]
pub struct GeneratedFloor {
    pub level: Level,
    /// Aliens and items, already registered on `level` in placement order
    pub entities: Vec<Entity>,
    /// Center of the first accepted room; `None` on a degenerate deck
    pub player_start: Option<Position>,
    /// Accepted rooms in acceptance order
    pub rooms: Vec<Room>,
}

impl GeneratedFloor {
    /// Returns true if the player start or any placed entity is at `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.player_start == Some(pos) || self.entities.iter().any(|e| e.position == pos)
    }

    /// Position of the key, if this deck holds it.
    pub fn key_position(&self) -> Option<Position> {
        self.entities
            .iter()
            .find(|e| e.consumable() == Some(crate::game::Consumable::Key))
            .map(|e| e.position)
    }
}

/// Primary deck generator.
#[derive(Debug, Clone, Default)]
pub struct RoomCorridorGenerator {
    encounters: EncounterGenerator,
    items: ItemGenerator,
}

impl RoomCorridorGenerator {
    /// Creates a new deck generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use derelict::generation::utils::create_rng;
    /// use derelict::{GenerationConfig, Generator, RoomCorridorGenerator};
    ///
    /// let generator = RoomCorridorGenerator::new();
    /// let config = GenerationConfig::for_testing(1);
    /// let floor = generator.generate(&config, &mut create_rng(42)).unwrap();
    /// assert!(!floor.rooms.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            encounters: EncounterGenerator::new(),
            items: ItemGenerator::new(),
        }
    }

    /// Samples a room candidate, or `None` if a room of the sampled size
    /// cannot fit on the map at all.
    fn sample_room(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
        room_id: u32,
    ) -> Option<Room> {
        let width = rng.gen_range(config.room_min_size..=config.room_max_size);
        let height = rng.gen_range(config.room_min_size..=config.room_max_size);

        if width >= config.map_width || height >= config.map_height {
            return None;
        }

        let x = rng.gen_range(0..=(config.map_width - width - 1)) as i32;
        let y = rng.gen_range(0..=(config.map_height - height - 1)) as i32;
        Some(Room::new(room_id, Position::new(x, y), width, height))
    }

    fn carve_room(&self, level: &mut Level, room: &Room) -> DerelictResult<()> {
        for pos in room.interior_positions() {
            level.set_tile(pos, TileType::Floor)?;
        }
        Ok(())
    }

    /// Carves two straight segments from `start` through an elbow to `end`.
    fn carve_tunnel(
        &self,
        level: &mut Level,
        start: Position,
        end: Position,
        rng: &mut StdRng,
    ) -> DerelictResult<()> {
        let corner = if rng.gen::<f64>() < 0.5 {
            // Horizontal first
            Position::new(end.x, start.y)
        } else {
            Position::new(start.x, end.y)
        };

        for pos in bresenham_line(start, corner)
            .into_iter()
            .chain(bresenham_line(corner, end))
        {
            level.set_tile(pos, TileType::Floor)?;
        }
        Ok(())
    }

    /// Stocks a freshly carved room. Every placement picks one interior cell
    /// and is skipped if that cell is already taken.
    fn place_entities(
        &self,
        room: &Room,
        floor: &mut GeneratedFloor,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DerelictResult<()> {
        let monster_count = rng.gen_range(0..=config.max_monsters_per_room());
        let item_count = rng.gen_range(0..=config.max_items_per_room());

        for _ in 0..monster_count {
            let Some(pos) = room.random_interior(rng) else {
                return Ok(());
            };
            if floor.is_occupied(pos) {
                trace!("Monster placement at {} skipped, cell taken", pos);
                continue;
            }
            let monster = self.encounters.generate(config, rng)?;
            self.spawn(floor, monster, pos, config.floor_index);
        }

        for _ in 0..item_count {
            let Some(pos) = room.random_interior(rng) else {
                return Ok(());
            };
            if floor.is_occupied(pos) {
                trace!("Item placement at {} skipped, cell taken", pos);
                continue;
            }
            let item = self.items.generate(config, rng)?;
            self.spawn(floor, item, pos, config.floor_index);
        }

        Ok(())
    }

    fn spawn(&self, floor: &mut GeneratedFloor, entity: Entity, pos: Position, floor_index: u32) {
        let mut entity = entity.at(pos);
        entity.owner = Owner::OnGrid(floor_index);
        floor.level.add_entity(entity.id);
        floor.entities.push(entity);
    }

    fn add_stairs(&self, floor: &mut GeneratedFloor) -> DerelictResult<()> {
        if let Some(last) = floor.rooms.last() {
            let center = last.center();
            floor.level.set_tile(center, TileType::DownStairs)?;
            floor.level.downstairs_location = Some(center);
        }
        Ok(())
    }

    /// Hides the key in the last room. When the sampled cell is taken the
    /// coordinates are re-rolled in the second-to-last room, and as a last
    /// resort the first free interior cell is used.
    fn place_key(
        &self,
        floor: &mut GeneratedFloor,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) {
        let Some(last) = floor.rooms.last().cloned() else {
            return;
        };
        let fallback = if floor.rooms.len() >= 2 {
            floor.rooms[floor.rooms.len() - 2].clone()
        } else {
            last.clone()
        };

        let first_try = last.random_interior(rng).filter(|pos| !floor.is_occupied(*pos));
        let pos = first_try
            .or_else(|| {
                debug!("Key cell in room {} taken, re-rolling in room {}", last.id, fallback.id);
                fallback.random_interior(rng).filter(|pos| !floor.is_occupied(*pos))
            })
            .or_else(|| {
                fallback
                    .interior_positions()
                    .into_iter()
                    .chain(last.interior_positions())
                    .find(|candidate| !floor.is_occupied(*candidate))
            });
        let Some(pos) = pos else {
            warn!("No free cell for the key on deck {}", config.floor_index);
            return;
        };

        self.spawn(floor, ship_key(), pos, config.floor_index);
    }

    /// Flood fill over walkable cells from the player start.
    fn validate_connectivity(&self, floor: &GeneratedFloor) -> DerelictResult<()> {
        let Some(start) = floor.player_start else {
            return Ok(());
        };

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            for delta in [(0, -1), (0, 1), (1, 0), (-1, 0)] {
                let next = Position::new(pos.x + delta.0, pos.y + delta.1);
                if !visited.contains(&next) && floor.level.is_walkable(next) {
                    visited.insert(next);
                    queue.push_back(next);
                }
            }
        }

        for room in &floor.rooms {
            if !visited.contains(&room.center()) {
                return Err(DerelictError::GenerationFailed(format!(
                    "Room {} is not connected to the start",
                    room.id
                )));
            }
        }
        Ok(())
    }
}

impl Generator<GeneratedFloor> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DerelictResult<GeneratedFloor> {
        let mut floor = GeneratedFloor {
            level: Level::new(config.floor_index, config.map_width, config.map_height),
            entities: Vec::new(),
            player_start: None,
            rooms: Vec::new(),
        };

        if config.room_min_size > config.room_max_size {
            warn!(
                "Room size bounds are inverted ({} > {}), deck {} stays walled",
                config.room_min_size, config.room_max_size, config.floor_index
            );
            return Ok(floor);
        }

        for _ in 0..config.max_rooms {
            let room_id = floor.rooms.len() as u32;
            let Some(room) = self.sample_room(config, rng, room_id) else {
                trace!("Room candidate does not fit a {}x{} map", config.map_width, config.map_height);
                continue;
            };

            if floor.rooms.iter().any(|other| room.intersects(other)) {
                trace!("Room candidate at {} overlaps, dropped", room.top_left);
                continue;
            }

            self.carve_room(&mut floor.level, &room)?;
            match floor.rooms.last() {
                None => floor.player_start = Some(room.center()),
                Some(previous) => {
                    let from = previous.center();
                    self.carve_tunnel(&mut floor.level, from, room.center(), rng)?;
                }
            }

            self.place_entities(&room, &mut floor, config, rng)?;
            floor.rooms.push(room);
        }

        if floor.rooms.is_empty() {
            warn!("No room could be placed on deck {}", config.floor_index);
            return Ok(floor);
        }

        if config.is_final_floor() {
            self.place_key(&mut floor, config, rng);
        } else {
            self.add_stairs(&mut floor)?;
        }

        debug!(
            "Deck {}: {} of {} room attempts accepted",
            config.floor_index,
            floor.rooms.len(),
            config.max_rooms
        );
        Ok(floor)
    }

    fn validate(&self, floor: &GeneratedFloor, config: &GenerationConfig) -> DerelictResult<()> {
        let first = floor
            .rooms
            .first()
            .ok_or_else(|| DerelictError::GenerationFailed("No rooms were placed".to_string()))?;

        match floor.player_start {
            Some(start) if first.interior_contains(start) => {}
            _ => {
                return Err(DerelictError::GenerationFailed(
                    "Player start is outside the first room".to_string(),
                ))
            }
        }

        if config.is_final_floor() {
            if floor.key_position().is_none() {
                return Err(DerelictError::GenerationFailed(
                    "Final deck has no key".to_string(),
                ));
            }
        } else {
            let stairs = floor.level.downstairs_location.ok_or_else(|| {
                DerelictError::GenerationFailed("Deck has no stairs".to_string())
            })?;
            if floor.level.get_tile(stairs) != Some(TileType::DownStairs) {
                return Err(DerelictError::GenerationFailed(format!(
                    "Stairs location {} is not a stairs tile",
                    stairs
                )));
            }
        }

        if let Some(entity) = floor
            .entities
            .iter()
            .find(|e| !floor.level.is_walkable(e.position))
        {
            return Err(DerelictError::GenerationFailed(format!(
                "{} was placed inside a wall at {}",
                entity.name, entity.position
            )));
        }

        self.validate_connectivity(floor)
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;

    fn generate(config: &GenerationConfig, seed: u64) -> GeneratedFloor {
        RoomCorridorGenerator::new()
            .generate(config, &mut create_rng(seed))
            .unwrap()
    }

    #[test]
    fn test_generation_with_small_level() {
        let config = GenerationConfig::for_testing(1);
        let floor = generate(&config, 12345);

        assert_eq!(floor.level.width, config.map_width);
        assert_eq!(floor.level.height, config.map_height);
        assert!(!floor.rooms.is_empty());
        assert!(floor.rooms.len() <= config.max_rooms as usize);
        assert!(floor.level.count_tiles(TileType::Floor) > 0);
        assert!(RoomCorridorGenerator::new().validate(&floor, &config).is_ok());
    }

    #[test]
    fn test_rooms_never_overlap() {
        let config = GenerationConfig::for_testing(1);
        let floor = generate(&config, 3);
        for (i, a) in floor.rooms.iter().enumerate() {
            for b in floor.rooms.iter().skip(i + 1) {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn test_room_interiors_are_carved() {
        let config = GenerationConfig::for_testing(1);
        let floor = generate(&config, 8);
        for room in &floor.rooms {
            for pos in room.interior_positions() {
                assert!(floor.level.is_walkable(pos), "{} not carved", pos);
            }
        }
        assert!(floor.rooms[0].interior_contains(floor.player_start.unwrap()));
    }

    #[test]
    fn test_stairs_in_last_room_before_final_floor() {
        let config = GenerationConfig::for_testing(1);
        let floor = generate(&config, 21);
        let last = floor.rooms.last().unwrap();
        assert_eq!(floor.level.downstairs_location, Some(last.center()));
        assert_eq!(floor.level.get_tile(last.center()), Some(TileType::DownStairs));
        assert!(floor.key_position().is_none());
    }

    #[test]
    fn test_final_floor_has_key_and_no_stairs() {
        let config = GenerationConfig::for_testing(2);
        assert!(config.is_final_floor());
        let floor = generate(&config, 21);
        assert!(floor.level.downstairs_location.is_none());
        assert_eq!(floor.level.count_tiles(TileType::DownStairs), 0);

        let key = floor.key_position().unwrap();
        assert!(floor.rooms.iter().any(|room| room.interior_contains(key)));
    }

    #[test]
    fn test_entities_registered_and_unique_cells() {
        let config = GenerationConfig::for_testing(1);
        let floor = generate(&config, 99);

        let mut cells = HashSet::new();
        for entity in &floor.entities {
            assert!(floor.level.contains_entity(&entity.id));
            assert_eq!(entity.owner, Owner::OnGrid(1));
            assert!(cells.insert(entity.position));
            assert_ne!(Some(entity.position), floor.player_start);
        }
        assert_eq!(floor.level.entities.len(), floor.entities.len());
    }

    #[test]
    fn test_tunnel_connects_centers() {
        let generator = RoomCorridorGenerator::new();
        let mut level = Level::new(1, 20, 20);
        let mut rng = create_rng(5);
        let start = Position::new(3, 4);
        let end = Position::new(15, 12);
        generator.carve_tunnel(&mut level, start, end, &mut rng).unwrap();

        assert_eq!(level.get_tile(start), Some(TileType::Floor));
        assert_eq!(level.get_tile(end), Some(TileType::Floor));
        // Two straight segments of 12 and 8 steps share the corner cell
        assert_eq!(level.count_tiles(TileType::Floor), 13 + 9 - 1);
        let corner_a = level.get_tile(Position::new(15, 4)) == Some(TileType::Floor);
        let corner_b = level.get_tile(Position::new(3, 12)) == Some(TileType::Floor);
        assert!(corner_a ^ corner_b);
    }

    #[test]
    fn test_zero_rooms_terminates() {
        let mut config = GenerationConfig::for_testing(1);
        config.max_rooms = 0;
        let floor = generate(&config, 1);
        assert!(floor.rooms.is_empty());
        assert!(floor.player_start.is_none());
        assert_eq!(floor.level.count_tiles(TileType::Floor), 0);
        assert!(RoomCorridorGenerator::new().validate(&floor, &config).is_err());
    }

    #[test]
    fn test_map_too_small_terminates() {
        let mut config = GenerationConfig::for_testing(1);
        config.map_width = 6;
        config.map_height = 6;
        config.room_min_size = 8;
        config.room_max_size = 10;
        let floor = generate(&config, 1);
        assert!(floor.rooms.is_empty());
    }

    #[test]
    fn test_inverted_bounds_terminate() {
        let mut config = GenerationConfig::for_testing(1);
        config.room_min_size = 9;
        config.room_max_size = 4;
        let floor = generate(&config, 1);
        assert!(floor.rooms.is_empty());
    }

    #[test]
    fn test_same_seed_same_deck() {
        let config = GenerationConfig::for_testing(1);
        let a = generate(&config, 404);
        let b = generate(&config, 404);
        assert_eq!(a.level.tiles, b.level.tiles);
        assert_eq!(a.rooms, b.rooms);
        let names_a: Vec<_> = a.entities.iter().map(|e| (e.name.clone(), e.position)).collect();
        let names_b: Vec<_> = b.entities.iter().map(|e| (e.name.clone(), e.position)).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_validation_rejects_missing_key() {
        let config = GenerationConfig::for_testing(2);
        let mut floor = generate(&config, 17);
        let generator = RoomCorridorGenerator::new();
        assert!(generator.validate(&floor, &config).is_ok());

        floor.entities.retain(|e| e.consumable() != Some(crate::game::Consumable::Key));
        assert!(generator.validate(&floor, &config).is_err());
    }

    /// A final deck with the given rooms carved and nothing placed yet.
    fn hand_built(rooms: Vec<Room>) -> GeneratedFloor {
        let mut level = Level::new(2, 30, 20);
        for room in &rooms {
            for pos in room.interior_positions() {
                level.set_tile(pos, TileType::Floor).unwrap();
            }
        }
        GeneratedFloor {
            level,
            entities: Vec::new(),
            player_start: None,
            rooms,
        }
    }

    fn fill(floor: &mut GeneratedFloor, room: &Room, except: Option<Position>) {
        let generator = RoomCorridorGenerator::new();
        for pos in room.interior_positions() {
            if Some(pos) != except {
                generator.spawn(floor, crate::generation::untung(), pos, 2);
            }
        }
    }

    #[test]
    fn test_key_moves_to_previous_room_when_last_is_full() {
        let config = GenerationConfig::for_testing(2);
        let first = Room::new(0, Position::new(1, 1), 5, 5);
        let last = Room::new(1, Position::new(10, 1), 5, 5);

        for seed in 0..50 {
            let mut floor = hand_built(vec![first.clone(), last.clone()]);
            fill(&mut floor, &last, None);
            RoomCorridorGenerator::new().place_key(&mut floor, &config, &mut create_rng(seed));

            let key = floor.key_position().expect("key placed");
            assert!(first.interior_contains(key), "seed {} put the key at {}", seed, key);
        }
    }

    #[test]
    fn test_key_in_single_room_finds_the_free_cell() {
        let config = GenerationConfig::for_testing(2);
        let only = Room::new(0, Position::new(1, 1), 5, 5);
        let free = Position::new(4, 3);

        for seed in 0..50 {
            let mut floor = hand_built(vec![only.clone()]);
            fill(&mut floor, &only, Some(free));
            RoomCorridorGenerator::new().place_key(&mut floor, &config, &mut create_rng(seed));
            assert_eq!(floor.key_position(), Some(free));
        }
    }

    #[test]
    fn test_key_skips_last_room_without_interior() {
        let config = GenerationConfig::for_testing(2);
        let first = Room::new(0, Position::new(1, 1), 5, 5);
        let sliver = Room::new(1, Position::new(10, 1), 1, 6);

        let mut floor = hand_built(vec![first.clone(), sliver]);
        RoomCorridorGenerator::new().place_key(&mut floor, &config, &mut create_rng(3));
        assert!(first.interior_contains(floor.key_position().unwrap()));
    }

    #[test]
    fn test_no_key_when_every_cell_is_taken() {
        let config = GenerationConfig::for_testing(2);
        let first = Room::new(0, Position::new(1, 1), 5, 5);
        let last = Room::new(1, Position::new(10, 1), 5, 5);
        let mut floor = hand_built(vec![first.clone(), last.clone()]);
        fill(&mut floor, &first, None);
        fill(&mut floor, &last, None);
        let placed = floor.entities.len();

        RoomCorridorGenerator::new().place_key(&mut floor, &config, &mut create_rng(8));
        assert_eq!(floor.key_position(), None);
        assert_eq!(floor.entities.len(), placed);
        assert!(RoomCorridorGenerator::new().validate(&floor, &config).is_err());
    }
}
