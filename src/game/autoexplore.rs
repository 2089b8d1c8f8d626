//! # Autoexplore Module
//!
//! A simple bot that plays the player's side. Used by the headless binary and
//! by long-running tests.

use crate::game::{ConcreteAction, Consumable, Direction, GameState, Position};
use crate::utils::find_path;
use crate::{DerelictError, DerelictResult};
use std::collections::{HashSet, VecDeque};

/// Fraction of max hp below which the bot drinks a first aid kit.
const HEAL_THRESHOLD: f64 = 0.5;

/// Autoexplore state: the path being followed and where it leads.
#[derive(Debug, Clone, Default)]
pub struct AutoexploreState {
    pub current_path: Vec<Position>,
    pub target: Option<Position>,
}

impl AutoexploreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the next player action, or None when there is nothing left to do.
    ///
    /// Priorities, highest first: use the key, fight an adjacent alien, heal
    /// when low, pick up an item underfoot, take the stairs, then walk
    /// toward the stairs, a visible item or the nearest unexplored cell.
    pub fn next_action(&mut self, state: &GameState) -> DerelictResult<Option<ConcreteAction>> {
        let player = state.player()?;
        let player_id = player.id;
        let pos = player.position;

        if let Some(key) = self.carried(state, |c| c == Consumable::Key) {
            return Ok(Some(ConcreteAction::use_item(player_id, key, None)));
        }

        if let Some(direction) = Direction::all()
            .into_iter()
            .find(|dir| state.actor_at(pos.step(*dir)).is_some())
        {
            self.clear();
            return Ok(Some(ConcreteAction::melee(player_id, direction)));
        }

        let fighter = player
            .fighter()
            .ok_or_else(|| DerelictError::InvalidState("Player cannot fight".to_string()))?;
        if (fighter.hp() as f64) < fighter.max_hp as f64 * HEAL_THRESHOLD {
            if let Some(kit) = self.carried(state, |c| matches!(c, Consumable::Healing { .. })) {
                return Ok(Some(ConcreteAction::use_item(player_id, kit, None)));
            }
        }

        let inventory_full = player.inventory().map_or(true, |inv| inv.is_full());
        if !inventory_full && !state.items_at(pos).is_empty() {
            return Ok(Some(ConcreteAction::pick_up(player_id)));
        }

        if state.level.downstairs_location == Some(pos) {
            self.clear();
            return Ok(Some(ConcreteAction::take_stairs(player_id)));
        }

        if let Some(next) = self.follow_path(pos) {
            if let Some(direction) = Direction::from_delta(next - pos) {
                return Ok(Some(ConcreteAction::bump(player_id, direction)));
            }
        }
        self.clear();

        let Some(goal) = self.choose_goal(state, pos, inventory_full) else {
            return Ok(None);
        };
        let blocked: HashSet<Position> = state
            .level_entities()
            .filter(|e| e.blocks_movement && e.id != player_id)
            .map(|e| e.position)
            .collect();

        match find_path(&state.level, &blocked, pos, goal) {
            Some(path) if !path.is_empty() => {
                self.current_path = path;
                self.target = Some(goal);
                Ok(self
                    .follow_path(pos)
                    .and_then(|next| Direction::from_delta(next - pos))
                    .map(|direction| ConcreteAction::bump(player_id, direction)))
            }
            _ => Ok(None),
        }
    }

    fn clear(&mut self) {
        self.current_path.clear();
        self.target = None;
    }

    /// Pops the next step if it is adjacent to the current position.
    fn follow_path(&mut self, pos: Position) -> Option<Position> {
        let next = *self.current_path.first()?;
        if pos.chebyshev_distance(next) != 1 {
            return None;
        }
        self.current_path.remove(0);
        Some(next)
    }

    fn carried(
        &self,
        state: &GameState,
        wanted: impl Fn(Consumable) -> bool,
    ) -> Option<crate::game::EntityId> {
        state
            .inventory_items()
            .into_iter()
            .find(|item| item.consumable().map_or(false, &wanted))
            .map(|item| item.id)
    }

    fn choose_goal(&self, state: &GameState, pos: Position, inventory_full: bool) -> Option<Position> {
        if let Some(stairs) = state.level.downstairs_location {
            if state.level.is_explored(stairs) {
                return Some(stairs);
            }
        }

        if !inventory_full {
            let item = state
                .level_entities()
                .filter(|e| e.has_consumable() && state.level.is_visible(e.position))
                .min_by_key(|e| pos.chebyshev_distance(e.position))
                .map(|e| e.position);
            if item.is_some() {
                return item;
            }
        }

        nearest_frontier(state, pos)
    }
}

/// Nearest explored walkable cell that touches an unexplored one.
fn nearest_frontier(state: &GameState, start: Position) -> Option<Position> {
    let level = &state.level;
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        let neighbours = pos.adjacent_positions();
        if pos != start
            && neighbours
                .iter()
                .any(|n| level.in_bounds(*n) && !level.is_explored(*n))
        {
            return Some(pos);
        }
        for next in neighbours {
            if level.is_walkable(next) && level.is_explored(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::TileType;

    #[test]
    fn test_autoexplore_state_creation() {
        let autoexplore = AutoexploreState::new();
        assert!(autoexplore.current_path.is_empty());
        assert!(autoexplore.target.is_none());
    }

    #[test]
    fn test_takes_stairs_when_standing_on_them() {
        let mut state = GameState::new(GameConfig::for_testing(), 3).unwrap();
        let stairs = state.level.downstairs_location.unwrap();
        let alive: Vec<_> = state
            .living_actors()
            .filter(|e| e.id != state.player_id)
            .map(|e| e.id)
            .collect();
        for id in alive {
            state.entities.get_mut(&id).unwrap().die();
        }
        for item in state.items_at(stairs) {
            state.level.remove_entity(&item);
        }
        state.entities.get_mut(&state.player_id).unwrap().position = stairs;
        assert_eq!(state.level.get_tile(stairs), Some(TileType::DownStairs));

        let mut bot = AutoexploreState::new();
        let action = bot.next_action(&state).unwrap();
        assert!(matches!(action, Some(ConcreteAction::TakeStairs(_))));
    }

    #[test]
    fn test_bot_makes_progress() {
        let mut state = GameState::new(GameConfig::for_testing(), 11).unwrap();
        let mut bot = AutoexploreState::new();

        for _ in 0..30 {
            if state.is_game_ended() {
                break;
            }
            match bot.next_action(&state).unwrap() {
                Some(action) => {
                    state.handle_player_action(action).unwrap();
                }
                None => break,
            }
        }

        assert!(state.turn_number > 0);
    }
}
