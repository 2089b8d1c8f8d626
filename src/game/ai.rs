//! # Alien Behavior
//!
//! Decisions are pure: a [`WorldView`] snapshot goes in, an action comes out.
//! The turn engine executes the action and discards it if it turns out to be
//! impossible.

use crate::game::{AiKind, ConcreteAction, Direction, Entity, GameState, Level, Position};
use crate::utils::find_path;
use std::collections::HashSet;

/// What an alien needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct WorldView<'a> {
    pub level: &'a Level,
    pub player_position: Position,
    /// Cells holding a blocking entity
    pub blocked: HashSet<Position>,
}

impl<'a> WorldView<'a> {
    pub fn new(level: &'a Level, player_position: Position, blocked: HashSet<Position>) -> Self {
        Self {
            level,
            player_position,
            blocked,
        }
    }

    /// Captures the view of the current deck.
    pub fn from_state(state: &'a GameState) -> Option<Self> {
        let player_position = state.player().ok()?.position;
        let blocked = state
            .level
            .entities
            .iter()
            .filter_map(|id| state.entities.get(id))
            .filter(|entity| entity.blocks_movement)
            .map(|entity| entity.position)
            .collect();
        Some(Self::new(&state.level, player_position, blocked))
    }
}

/// Picks the action of an actor driven by an AI.
pub fn decide(actor: &Entity, view: &WorldView) -> ConcreteAction {
    match actor.ai() {
        Some(AiKind::Hostile) => hostile_decision(actor, view),
        Some(AiKind::Player) | None => ConcreteAction::wait(actor.id),
    }
}

/// Hostile policy: attack when adjacent, chase when the player is in sight,
/// otherwise stay put.
///
/// Sight is read from the player's field of view, which is symmetric, so an
/// alien standing in a visible cell can see the player too.
pub fn hostile_decision(actor: &Entity, view: &WorldView) -> ConcreteAction {
    if !view.level.is_visible(actor.position) {
        return ConcreteAction::wait(actor.id);
    }

    let target = view.player_position;
    if actor.position.chebyshev_distance(target) <= 1 {
        if let Some(direction) = Direction::from_delta(target - actor.position) {
            return ConcreteAction::melee(actor.id, direction);
        }
        return ConcreteAction::wait(actor.id);
    }

    find_path(view.level, &view.blocked, actor.position, target)
        .and_then(|path| path.first().copied())
        .and_then(|next| Direction::from_delta(next - actor.position))
        .map(|direction| ConcreteAction::movement(actor.id, direction))
        .unwrap_or_else(|| ConcreteAction::wait(actor.id))
}
