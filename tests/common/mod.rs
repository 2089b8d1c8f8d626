//! Shared setup for integration tests.

#![allow(dead_code)]

use derelict::{Entity, EntityId, GameConfig, GameState, Level, Position, TileType};

/// A fresh session on small decks.
pub fn new_state(seed: u64) -> GameState {
    GameState::new(GameConfig::for_testing(), seed).unwrap()
}

/// Replaces the current deck with an empty 20x20 room and puts the player at
/// (5, 5). Carried items are kept.
pub fn arena(state: &mut GameState) -> Position {
    let player = state.entities.remove(&state.player_id).unwrap();
    for id in std::mem::take(&mut state.level.entities) {
        state.entities.remove(&id);
    }

    let mut level = Level::new(state.world.current_floor, 20, 20);
    for y in 1..19 {
        for x in 1..19 {
            level.set_tile(Position::new(x, y), TileType::Floor).unwrap();
        }
    }
    state.level = level;

    let start = Position::new(5, 5);
    state.level.add_entity(player.id);
    state.entities.insert(player.id, player.at(start));
    state.update_fov().unwrap();
    start
}

/// Puts an entity on the current deck.
pub fn spawn(state: &mut GameState, entity: Entity) -> EntityId {
    let id = entity.id;
    state.level.add_entity(id);
    state.entities.insert(id, entity);
    id
}

pub fn set_player_position(state: &mut GameState, pos: Position) {
    let id = state.player_id;
    state.entities.get_mut(&id).unwrap().position = pos;
}

pub fn log_texts(state: &GameState) -> Vec<String> {
    state
        .message_log()
        .messages()
        .iter()
        .map(|m| m.plain_text.clone())
        .collect()
}
