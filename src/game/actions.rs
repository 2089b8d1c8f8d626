//! # Actions
//!
//! Every decision made by the player or an alien is an [`Action`]. Executing
//! an action either yields the [`GameEvent`]s it caused or fails with
//! [`DerelictError::Impossible`]. Preconditions are checked before any state
//! is touched, so a rejected action leaves the game unchanged.

use crate::game::{Consumable, Direction, EntityId, GameState, MessageColor, Owner, Position};
use crate::{DerelictError, DerelictResult};
use serde::{Deserialize, Serialize};

/// Kinds of actions, mostly useful for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Bump,
    Move,
    Melee,
    Wait,
    PickUp,
    UseItem,
    TakeStairs,
}

/// Something that happened while an action resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EntityMoved {
        entity_id: EntityId,
        from: Position,
        to: Position,
    },
    EntityAttacked {
        attacker: EntityId,
        target: EntityId,
        damage: i32,
    },
    EntityDamaged {
        entity_id: EntityId,
        damage: i32,
        source: Option<EntityId>,
    },
    EntityDied {
        entity_id: EntityId,
        killer: Option<EntityId>,
    },
    EntityHealed {
        entity_id: EntityId,
        amount: i32,
    },
    ItemPickedUp {
        actor: EntityId,
        item: EntityId,
    },
    ItemUsed {
        actor: EntityId,
        item: EntityId,
    },
    FloorChanged {
        from: u32,
        to: u32,
    },
    /// Narration for the message log
    Message { text: String, color: MessageColor },
}

impl GameEvent {
    pub fn message(text: impl Into<String>, color: MessageColor) -> Self {
        GameEvent::Message {
            text: text.into(),
            color,
        }
    }
}

/// Common interface of everything an actor can do in a turn.
pub trait Action {
    /// The entity performing the action.
    fn actor(&self) -> EntityId;

    fn action_type(&self) -> ActionType;

    /// Validates and applies the action.
    fn execute(&self, state: &mut GameState) -> DerelictResult<Vec<GameEvent>>;
}

/// Moves in a direction, or attacks whatever living actor stands there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpAction {
    pub actor: EntityId,
    pub direction: Direction,
}

impl BumpAction {
    pub fn new(actor: EntityId, direction: Direction) -> Self {
        Self { actor, direction }
    }
}

impl Action for BumpAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Bump
    }

    fn execute(&self, state: &mut GameState) -> DerelictResult<Vec<GameEvent>> {
        let destination = state.entity(self.actor)?.position.step(self.direction);
        if state.actor_at(destination).is_some() {
            MeleeAction::new(self.actor, self.direction).execute(state)
        } else {
            MoveAction::new(self.actor, self.direction).execute(state)
        }
    }
}

/// Steps one cell in a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    pub actor: EntityId,
    pub direction: Direction,
}

impl MoveAction {
    pub fn new(actor: EntityId, direction: Direction) -> Self {
        Self { actor, direction }
    }
}

impl Action for MoveAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Move
    }

    fn execute(&self, state: &mut GameState) -> DerelictResult<Vec<GameEvent>> {
        let from = state.entity(self.actor)?.position;
        let to = from.step(self.direction);

        if !state.level.is_walkable(to) || state.blocking_entity_at(to).is_some() {
            return Err(DerelictError::impossible("That way is blocked."));
        }

        state.entity_mut(self.actor)?.position = to;
        Ok(vec![GameEvent::EntityMoved {
            entity_id: self.actor,
            from,
            to,
        }])
    }
}

/// Attacks the living actor in an adjacent cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeleeAction {
    pub actor: EntityId,
    pub direction: Direction,
}

impl MeleeAction {
    pub fn new(actor: EntityId, direction: Direction) -> Self {
        Self { actor, direction }
    }
}

impl Action for MeleeAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Melee
    }

    fn execute(&self, state: &mut GameState) -> DerelictResult<Vec<GameEvent>> {
        let attacker = state.entity(self.actor)?;
        let destination = attacker.position.step(self.direction);
        let target_id = state
            .actor_at(destination)
            .ok_or_else(|| DerelictError::impossible("Nothing to attack."))?;
        let target = state.entity(target_id)?;

        let (attacker_fighter, target_fighter) = match (attacker.fighter(), target.fighter()) {
            (Some(a), Some(t)) => (a, t),
            _ => return Err(DerelictError::impossible("Nothing to attack.")),
        };
        let damage = attacker_fighter.damage_against(target_fighter);

        let description = format!("{} attacks {}", attacker.name, target.name);
        let color = if self.actor == state.player_id {
            MessageColor::PlayerAttack
        } else {
            MessageColor::EnemyAttack
        };

        let mut events = vec![GameEvent::EntityAttacked {
            attacker: self.actor,
            target: target_id,
            damage,
        }];
        if damage > 0 {
            events.push(GameEvent::message(
                format!("{} for {} hit points.", description, damage),
                color,
            ));
            events.extend(state.apply_damage(target_id, damage, Some(self.actor))?);
        } else {
            events.push(GameEvent::message(
                format!("{} but does no damage.", description),
                color,
            ));
        }
        Ok(events)
    }
}

/// Does nothing; the turn still passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitAction {
    pub actor: EntityId,
}

impl WaitAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl Action for WaitAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::Wait
    }

    fn execute(&self, _state: &mut GameState) -> DerelictResult<Vec<GameEvent>> {
        Ok(Vec::new())
    }
}

/// Picks up the first item lying under the actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickUpAction {
    pub actor: EntityId,
}

impl PickUpAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl Action for PickUpAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::PickUp
    }

    fn execute(&self, state: &mut GameState) -> DerelictResult<Vec<GameEvent>> {
        let actor = state.entity(self.actor)?;
        let inventory = actor
            .inventory()
            .ok_or_else(|| DerelictError::impossible("There is nothing here to pick up."))?;
        let item_id = state
            .items_at(actor.position)
            .first()
            .copied()
            .ok_or_else(|| DerelictError::impossible("There is nothing here to pick up."))?;
        if inventory.is_full() {
            return Err(DerelictError::impossible("Your inventory is full."));
        }

        state.level.remove_entity(&item_id);
        let slot = {
            let inventory = state
                .entity_mut(self.actor)?
                .inventory_mut()
                .ok_or_else(|| DerelictError::InvalidState("Actor lost its inventory".to_string()))?;
            inventory.items.push(item_id);
            inventory.items.len() - 1
        };
        let item = state.entity_mut(item_id)?;
        item.owner = Owner::InInventory {
            actor: self.actor,
            slot,
        };
        let name = item.name.clone();

        Ok(vec![
            GameEvent::ItemPickedUp {
                actor: self.actor,
                item: item_id,
            },
            GameEvent::message(format!("You picked up the {}!", name), MessageColor::Neutral),
        ])
    }
}

/// Uses a consumable from the actor's inventory, optionally on a target cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseItemAction {
    pub actor: EntityId,
    pub item: EntityId,
    pub target: Option<Position>,
}

impl UseItemAction {
    pub fn new(actor: EntityId, item: EntityId, target: Option<Position>) -> Self {
        Self {
            actor,
            item,
            target,
        }
    }

    fn heal(&self, state: &mut GameState, amount: i32, item_name: &str) -> DerelictResult<Vec<GameEvent>> {
        let fighter = state
            .entity_mut(self.actor)?
            .fighter_mut()
            .ok_or_else(|| DerelictError::impossible("You cannot use that."))?;
        let recovered = fighter.heal(amount);
        if recovered == 0 {
            return Err(DerelictError::impossible("Your health is already full."));
        }

        Ok(vec![
            GameEvent::EntityHealed {
                entity_id: self.actor,
                amount: recovered,
            },
            GameEvent::message(
                format!("You consume the {}, and recover {} HP!", item_name, recovered),
                MessageColor::HealthRecovered,
            ),
        ])
    }

    fn shoot(
        &self,
        state: &mut GameState,
        damage: i32,
        maximum_range: u32,
        item_name: &str,
    ) -> DerelictResult<Vec<GameEvent>> {
        let target_pos = self
            .target
            .ok_or_else(|| DerelictError::impossible("You must select an enemy to target."))?;
        if !state.level.is_visible(target_pos) {
            return Err(DerelictError::impossible(
                "You cannot target an area that you cannot see.",
            ));
        }
        let target_id = state
            .actor_at(target_pos)
            .ok_or_else(|| DerelictError::impossible("You must select an enemy to target."))?;
        if target_id == self.actor {
            return Err(DerelictError::impossible("You cannot shoot yourself!"));
        }
        let origin = state.entity(self.actor)?.position;
        if origin.euclidean_distance(target_pos) > maximum_range as f64 {
            return Err(DerelictError::impossible("The target is too far away."));
        }

        let target_name = state.entity(target_id)?.name.clone();
        let mut events = vec![GameEvent::message(
            format!(
                "A bolt from the {} strikes the {} for {} damage!",
                item_name, target_name, damage
            ),
            MessageColor::PlayerAttack,
        )];
        events.extend(state.apply_damage(target_id, damage, Some(self.actor))?);
        Ok(events)
    }

    fn detonate(&self, state: &mut GameState, damage: i32, radius: u32) -> DerelictResult<Vec<GameEvent>> {
        let center = self
            .target
            .ok_or_else(|| DerelictError::impossible("You must select an area to target."))?;
        if !state.level.is_visible(center) {
            return Err(DerelictError::impossible(
                "You cannot target an area that you cannot see.",
            ));
        }

        let caught: Vec<EntityId> = state
            .living_actors()
            .filter(|entity| entity.position.euclidean_distance(center) <= radius as f64)
            .map(|entity| entity.id)
            .collect();
        if caught.is_empty() {
            return Err(DerelictError::impossible("There are no targets in the radius."));
        }

        let mut events = Vec::new();
        for target_id in caught {
            let name = state.entity(target_id)?.name.clone();
            events.push(GameEvent::message(
                format!("The {} is caught in the blast, taking {} damage!", name, damage),
                MessageColor::PlayerAttack,
            ));
            events.extend(state.apply_damage(target_id, damage, Some(self.actor))?);
        }
        Ok(events)
    }
}

impl Action for UseItemAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::UseItem
    }

    fn execute(&self, state: &mut GameState) -> DerelictResult<Vec<GameEvent>> {
        let carried = state
            .entity(self.actor)?
            .inventory()
            .map_or(false, |inventory| inventory.slot_of(&self.item).is_some());
        if !carried {
            return Err(DerelictError::impossible("You do not carry that item."));
        }

        let item = state.entity(self.item)?;
        let item_name = item.name.clone();
        let consumable = item
            .consumable()
            .ok_or_else(|| DerelictError::impossible("You cannot use that."))?;

        let mut events = match consumable {
            Consumable::Healing { amount } => self.heal(state, amount, &item_name)?,
            Consumable::Gun {
                damage,
                maximum_range,
            } => self.shoot(state, damage, maximum_range, &item_name)?,
            Consumable::Bomb { damage, radius } => self.detonate(state, damage, radius)?,
            Consumable::Key => {
                state.recover_key();
                vec![GameEvent::message(
                    "You unlock the bridge with the key. The spaceship is yours again!",
                    MessageColor::Victory,
                )]
            }
        };

        state.consume_item(self.actor, self.item)?;
        events.insert(
            0,
            GameEvent::ItemUsed {
                actor: self.actor,
                item: self.item,
            },
        );
        Ok(events)
    }
}

/// Descends to the next deck when standing on the stairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeStairsAction {
    pub actor: EntityId,
}

impl TakeStairsAction {
    pub fn new(actor: EntityId) -> Self {
        Self { actor }
    }
}

impl Action for TakeStairsAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn action_type(&self) -> ActionType {
        ActionType::TakeStairs
    }

    fn execute(&self, state: &mut GameState) -> DerelictResult<Vec<GameEvent>> {
        let position = state.entity(self.actor)?.position;
        if state.level.downstairs_location != Some(position) {
            return Err(DerelictError::impossible("There are no stairs here."));
        }

        let mut events = state.descend()?;
        events.push(GameEvent::message(
            "You descend the staircase.",
            MessageColor::Descend,
        ));
        Ok(events)
    }
}

/// Closed set of all actions, as accepted by [`GameState::handle_player_action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcreteAction {
    Bump(BumpAction),
    Move(MoveAction),
    Melee(MeleeAction),
    Wait(WaitAction),
    PickUp(PickUpAction),
    UseItem(UseItemAction),
    TakeStairs(TakeStairsAction),
}

impl ConcreteAction {
    pub fn bump(actor: EntityId, direction: Direction) -> Self {
        ConcreteAction::Bump(BumpAction::new(actor, direction))
    }

    pub fn movement(actor: EntityId, direction: Direction) -> Self {
        ConcreteAction::Move(MoveAction::new(actor, direction))
    }

    pub fn melee(actor: EntityId, direction: Direction) -> Self {
        ConcreteAction::Melee(MeleeAction::new(actor, direction))
    }

    pub fn wait(actor: EntityId) -> Self {
        ConcreteAction::Wait(WaitAction::new(actor))
    }

    pub fn pick_up(actor: EntityId) -> Self {
        ConcreteAction::PickUp(PickUpAction::new(actor))
    }

    pub fn use_item(actor: EntityId, item: EntityId, target: Option<Position>) -> Self {
        ConcreteAction::UseItem(UseItemAction::new(actor, item, target))
    }

    pub fn take_stairs(actor: EntityId) -> Self {
        ConcreteAction::TakeStairs(TakeStairsAction::new(actor))
    }

    fn inner(&self) -> &dyn Action {
        match self {
            ConcreteAction::Bump(action) => action,
            ConcreteAction::Move(action) => action,
            ConcreteAction::Melee(action) => action,
            ConcreteAction::Wait(action) => action,
            ConcreteAction::PickUp(action) => action,
            ConcreteAction::UseItem(action) => action,
            ConcreteAction::TakeStairs(action) => action,
        }
    }
}

impl Action for ConcreteAction {
    fn actor(&self) -> EntityId {
        self.inner().actor()
    }

    fn action_type(&self) -> ActionType {
        self.inner().action_type()
    }

    fn execute(&self, state: &mut GameState) -> DerelictResult<Vec<GameEvent>> {
        self.inner().execute(state)
    }
}
