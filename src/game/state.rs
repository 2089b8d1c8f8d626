//! # Game State Module
//!
//! Central game state and the turn engine.
//!
//! A [`GameState`] owns the current deck, every entity, the message log and
//! the random number generator. One call to
//! [`GameState::handle_player_action`] resolves one full turn: the player's
//! action, the aliens' actions and the field of view update.

use crate::config::GameConfig;
use crate::game::{
    ai, compute_level_fov, player, Action, AiKind, ConcreteAction, Entity, EntityId, GameEvent,
    Level, MessageColor, MessageLog, Owner, Position, World,
};
use crate::generation::{utils::create_rng, GeneratedFloor};
use crate::rendering::{GridSnapshot, StatusBar};
use crate::{DerelictError, DerelictResult};
use log::{debug, info};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Aliens killed by the player
    pub enemies_defeated: u32,
    pub items_collected: u32,
    pub items_used: u32,
    /// Damage inflicted by the player
    pub damage_dealt: u64,
    /// Damage suffered by the player
    pub damage_taken: u64,
    pub deepest_floor: u32,
    pub steps_taken: u64,
    pub deaths: u32,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent, player_id: EntityId) {
        match event {
            GameEvent::EntityMoved { entity_id, .. } if *entity_id == player_id => {
                self.steps_taken += 1;
            }
            GameEvent::EntityDamaged {
                entity_id,
                damage,
                source,
            } => {
                if *entity_id == player_id {
                    self.damage_taken += *damage as u64;
                } else if *source == Some(player_id) {
                    self.damage_dealt += *damage as u64;
                }
            }
            GameEvent::EntityDied { entity_id, killer } => {
                if *entity_id == player_id {
                    self.deaths += 1;
                } else if *killer == Some(player_id) {
                    self.enemies_defeated += 1;
                }
            }
            GameEvent::ItemPickedUp { actor, .. } if *actor == player_id => {
                self.items_collected += 1;
            }
            GameEvent::ItemUsed { actor, .. } if *actor == player_id => {
                self.items_used += 1;
            }
            GameEvent::FloorChanged { to, .. } => {
                self.deepest_floor = self.deepest_floor.max(*to);
            }
            _ => {}
        }
    }
}

/// Game completion state for handling endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Player hit points reached zero
    PlayerDied,
    /// The key was used on the final deck
    KeyRecovered,
}

/// Result of submitting a player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The action resolved and the aliens took their turn
    Advanced,
    /// The action was impossible; nothing changed except the message log
    Rejected { reason: String },
}

/// Central game state containing all game data and systems.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Floor counter and generation parameters
    pub world: World,
    /// The current deck
    pub level: Level,
    /// Every live entity: the current deck's entities plus carried items
    pub entities: HashMap<EntityId, Entity>,
    pub player_id: EntityId,
    pub message_log: MessageLog,
    /// Completed turns
    pub turn_number: u64,
    pub statistics: GameStatistics,
    pub completion_state: GameCompletionState,
    pub seed: u64,
    rng: StdRng,
}

impl GameState {
    /// Starts a new session: generates the first deck, places the player and
    /// computes the initial field of view.
    ///
    /// # Examples
    ///
    /// ```
    /// use derelict::{GameCompletionState, GameConfig, GameState};
    ///
    /// let state = GameState::new(GameConfig::for_testing(), 42).unwrap();
    /// assert_eq!(state.world.current_floor, 1);
    /// assert_eq!(state.completion_state, GameCompletionState::Playing);
    /// assert!(state.level.is_visible(state.player().unwrap().position));
    /// ```
    pub fn new(config: GameConfig, seed: u64) -> DerelictResult<Self> {
        let mut rng = create_rng(seed);
        let mut world = World::new(config.clone());
        let floor = world.generate_floor(&mut rng)?;
        let player = player(config.player_inventory_capacity);

        let mut state = Self {
            config,
            world,
            level: Level::new(0, 0, 0),
            entities: HashMap::new(),
            player_id: player.id,
            message_log: MessageLog::new(),
            turn_number: 0,
            statistics: GameStatistics::new(),
            completion_state: GameCompletionState::Playing,
            seed,
            rng,
        };
        state.install_floor(floor, player)?;
        state.statistics.deepest_floor = state.world.current_floor;
        state.update_fov()?;
        state.message_log.add_message(
            "Hello and welcome, stranger, to the spaceship!",
            MessageColor::Welcome,
        );

        info!("New session with seed {}, target deck {}", seed, state.world.target_floor());
        Ok(state)
    }

    /// Makes a generated deck current and puts the player on its start cell.
    fn install_floor(&mut self, floor: GeneratedFloor, mut player: Entity) -> DerelictResult<()> {
        let start = floor.player_start.ok_or_else(|| {
            DerelictError::InvalidState(format!("Deck {} has no room for the player", floor.level.floor))
        })?;

        self.level = floor.level;
        for entity in floor.entities {
            self.entities.insert(entity.id, entity);
        }

        player.position = start;
        player.owner = Owner::OnGrid(self.level.floor);
        self.level.add_entity(player.id);
        self.entities.insert(player.id, player);
        Ok(())
    }

    pub fn entity(&self, id: EntityId) -> DerelictResult<&Entity> {
        self.entities
            .get(&id)
            .ok_or_else(|| DerelictError::InvalidState(format!("Unknown entity {}", id)))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> DerelictResult<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or_else(|| DerelictError::InvalidState(format!("Unknown entity {}", id)))
    }

    pub fn player(&self) -> DerelictResult<&Entity> {
        self.entity(self.player_id)
    }

    pub fn is_player_alive(&self) -> bool {
        self.player().map_or(false, |p| p.is_alive())
    }

    /// Entities on the current deck, in deck order.
    pub fn level_entities(&self) -> impl Iterator<Item = &Entity> {
        self.level
            .entities
            .iter()
            .filter_map(move |id| self.entities.get(id))
    }

    /// Living actors on the current deck, in deck order.
    pub fn living_actors(&self) -> impl Iterator<Item = &Entity> {
        self.level_entities().filter(|entity| entity.is_alive())
    }

    /// The living actor standing at `pos`, if any.
    pub fn actor_at(&self, pos: Position) -> Option<EntityId> {
        self.living_actors()
            .find(|entity| entity.position == pos)
            .map(|entity| entity.id)
    }

    /// The first entity at `pos` that blocks movement.
    pub fn blocking_entity_at(&self, pos: Position) -> Option<EntityId> {
        self.level_entities()
            .find(|entity| entity.blocks_movement && entity.position == pos)
            .map(|entity| entity.id)
    }

    /// Items lying at `pos`, in deck order.
    pub fn items_at(&self, pos: Position) -> Vec<EntityId> {
        self.level_entities()
            .filter(|entity| entity.has_consumable() && entity.position == pos)
            .map(|entity| entity.id)
            .collect()
    }

    /// Lowers an actor's hit points and kills it when they reach zero.
    pub fn apply_damage(
        &mut self,
        target: EntityId,
        amount: i32,
        source: Option<EntityId>,
    ) -> DerelictResult<Vec<GameEvent>> {
        let remaining = {
            let fighter = self
                .entity_mut(target)?
                .fighter_mut()
                .ok_or_else(|| DerelictError::InvalidState(format!("{} cannot take damage", target)))?;
            fighter.set_hp(fighter.hp() - amount);
            fighter.hp()
        };

        let mut events = vec![GameEvent::EntityDamaged {
            entity_id: target,
            damage: amount,
            source,
        }];
        if remaining == 0 {
            events.extend(self.kill(target, source)?);
        }
        Ok(events)
    }

    fn kill(&mut self, target: EntityId, killer: Option<EntityId>) -> DerelictResult<Vec<GameEvent>> {
        let is_player = target == self.player_id;
        let entity = self.entity_mut(target)?;
        let name = entity.name.clone();
        if !entity.die() {
            return Ok(Vec::new());
        }

        let message = if is_player {
            GameEvent::message("You died!", MessageColor::PlayerDie)
        } else {
            GameEvent::message(format!("{} is dead!", name), MessageColor::EnemyDie)
        };
        Ok(vec![
            GameEvent::EntityDied {
                entity_id: target,
                killer,
            },
            message,
        ])
    }

    /// Removes a used item from its holder and from the game.
    pub fn consume_item(&mut self, actor: EntityId, item: EntityId) -> DerelictResult<()> {
        let inventory = self
            .entity_mut(actor)?
            .inventory_mut()
            .ok_or_else(|| DerelictError::InvalidState(format!("{} has no inventory", actor)))?;
        let slot = inventory
            .slot_of(&item)
            .ok_or_else(|| DerelictError::InvalidState(format!("{} does not carry {}", actor, item)))?;
        inventory.items.remove(slot);
        let remaining = inventory.items.clone();

        self.entities.remove(&item);
        for (slot, id) in remaining.into_iter().enumerate() {
            if let Some(entity) = self.entities.get_mut(&id) {
                entity.owner = Owner::InInventory { actor, slot };
            }
        }
        Ok(())
    }

    /// Marks the game as won.
    pub fn recover_key(&mut self) {
        info!("Key recovered on deck {} after {} turns", self.world.current_floor, self.turn_number);
        self.completion_state = GameCompletionState::KeyRecovered;
    }

    /// Generates the next deck and moves the player onto it. Everything else
    /// on the old deck is discarded; carried items come along.
    pub fn descend(&mut self) -> DerelictResult<Vec<GameEvent>> {
        let from = self.world.current_floor;
        let floor = self.world.generate_floor(&mut self.rng)?;

        let player = self
            .entities
            .remove(&self.player_id)
            .ok_or_else(|| DerelictError::InvalidState("No player found".to_string()))?;
        for id in std::mem::take(&mut self.level.entities) {
            self.entities.remove(&id);
        }
        self.install_floor(floor, player)?;

        info!("Player descended from deck {} to deck {}", from, self.world.current_floor);
        Ok(vec![GameEvent::FloorChanged {
            from,
            to: self.world.current_floor,
        }])
    }

    /// Recomputes the player's field of view and merges it into explored.
    pub fn update_fov(&mut self) -> DerelictResult<()> {
        let origin = self.player()?.position;
        let visible = compute_level_fov(&self.level, origin, self.config.fov_radius);
        self.level.update_visibility(visible)
    }

    /// Applies events to the statistics and the message log.
    pub fn process_events(&mut self, events: &[GameEvent]) {
        for event in events {
            self.statistics.update_from_event(event, self.player_id);
            if let GameEvent::Message { text, color } = event {
                self.message_log.add_message(text.clone(), *color);
            }
        }
    }

    /// Resolves one player turn.
    ///
    /// An impossible action is logged and returned as
    /// [`TurnOutcome::Rejected`]; the aliens do not act and the turn counter
    /// stays put. Any other error is a bug and is propagated.
    pub fn handle_player_action(&mut self, action: ConcreteAction) -> DerelictResult<TurnOutcome> {
        if self.is_game_ended() {
            return Err(DerelictError::GameEnded);
        }
        if action.actor() != self.player_id {
            return Err(DerelictError::InvalidState(
                "Player actions must be performed by the player".to_string(),
            ));
        }

        match action.execute(self) {
            Ok(events) => self.process_events(&events),
            Err(e) if e.is_impossible() => {
                let reason = e.to_string();
                self.message_log.add_message(reason.clone(), MessageColor::Impossible);
                return Ok(TurnOutcome::Rejected { reason });
            }
            Err(e) => return Err(e),
        }

        if self.completion_state == GameCompletionState::Playing {
            self.handle_enemy_turns()?;
        }
        self.update_fov()?;
        self.turn_number += 1;

        if !self.is_player_alive() && self.completion_state == GameCompletionState::Playing {
            info!("Player died on deck {} at turn {}", self.world.current_floor, self.turn_number);
            self.completion_state = GameCompletionState::PlayerDied;
        }

        debug!(
            "Turn {} resolved with {:?}",
            self.turn_number,
            action.action_type()
        );
        Ok(TurnOutcome::Advanced)
    }

    /// Lets every living alien on the deck act once, in deck order.
    fn handle_enemy_turns(&mut self) -> DerelictResult<()> {
        let order: Vec<EntityId> = self
            .level
            .entities
            .iter()
            .copied()
            .filter(|id| *id != self.player_id)
            .collect();

        for id in order {
            if !self.is_player_alive() {
                break;
            }

            let action = {
                let Some(entity) = self.entities.get(&id) else {
                    continue;
                };
                if entity.ai() != Some(AiKind::Hostile) {
                    continue;
                }
                let Some(view) = ai::WorldView::from_state(self) else {
                    break;
                };
                ai::decide(entity, &view)
            };

            match action.execute(self) {
                Ok(events) => self.process_events(&events),
                Err(e) if e.is_impossible() => {
                    debug!("Alien {} could not act: {}", id, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn is_game_ended(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }

    pub fn message_log(&self) -> &MessageLog {
        &self.message_log
    }

    /// Names of the entities at a visible cell, joined with commas.
    pub fn names_at(&self, pos: Position) -> String {
        if !self.level.is_visible(pos) {
            return String::new();
        }
        self.level_entities()
            .filter(|entity| entity.position == pos)
            .map(|entity| entity.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Items carried by the player, in slot order.
    pub fn inventory_items(&self) -> Vec<&Entity> {
        self.player()
            .ok()
            .and_then(|p| p.inventory())
            .map(|inventory| {
                inventory
                    .items
                    .iter()
                    .filter_map(|id| self.entities.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn status(&self) -> StatusBar {
        let (hp, max_hp) = self
            .player()
            .ok()
            .and_then(|p| p.fighter())
            .map_or((0, 0), |f| (f.hp(), f.max_hp));
        StatusBar {
            hp,
            max_hp,
            floor: self.world.current_floor,
            target_floor: self.world.target_floor(),
        }
    }

    /// Read-only view of the deck for drawing.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(self)
    }
}
