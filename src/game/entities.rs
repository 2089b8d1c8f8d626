//! # Entities
//!
//! Everything placed on a deck: the player, the aliens and the items lying
//! around. An entity is either an actor or an item; what it can do is decided
//! by checking its capabilities rather than by dynamic dispatch.

use crate::game::{new_entity_id, EntityId, Position, Rgb};
use serde::{Deserialize, Serialize};

/// Draw order. Higher priorities are drawn last, on top of lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

/// The container currently holding an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    /// Freshly built, not yet placed anywhere
    Detached,
    /// Lying on the deck generated for this floor
    OnGrid(u32),
    /// Held by an actor at the given inventory slot
    InInventory { actor: EntityId, slot: usize },
}

/// Combat statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    hp: i32,
    pub max_hp: i32,
    pub defense: i32,
    pub power: i32,
}

impl Fighter {
    pub fn new(hp: i32, defense: i32, power: i32) -> Self {
        Self {
            hp,
            max_hp: hp,
            defense,
            power,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Sets hit points, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, value: i32) {
        self.hp = value.clamp(0, self.max_hp.max(0));
    }

    /// Damage this fighter deals to the given defender, never negative.
    pub fn damage_against(&self, defender: &Fighter) -> i32 {
        (self.power - defender.defense).max(0)
    }

    /// Restores hit points up to the maximum and returns how many were gained.
    ///
    /// # Examples
    ///
    /// ```
    /// use derelict::Fighter;
    ///
    /// let mut fighter = Fighter::new(30, 2, 5);
    /// fighter.set_hp(27);
    /// assert_eq!(fighter.heal(6), 3);
    /// assert_eq!(fighter.hp(), 30);
    /// assert_eq!(fighter.heal(6), 0);
    /// ```
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.hp >= self.max_hp {
            return 0;
        }
        let before = self.hp;
        self.set_hp(self.hp + amount);
        self.hp - before
    }
}

/// Item storage owned by an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub capacity: usize,
    pub items: Vec<EntityId>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn slot_of(&self, item: &EntityId) -> Option<usize> {
        self.items.iter().position(|id| id == item)
    }
}

/// Behavior driver of a living actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiKind {
    /// Driven by player input
    Player,
    /// Attacks the player on sight
    Hostile,
}

/// How a consumable chooses what it affects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Targeting {
    /// Affects the user
    None,
    /// A single actor within `range`
    Single { range: u32 },
    /// Every actor within `radius` of a chosen cell
    Area { radius: u32 },
}

/// Effect applied when an item is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consumable {
    Healing { amount: i32 },
    Bomb { damage: i32, radius: u32 },
    Gun { damage: i32, maximum_range: u32 },
    Key,
}

impl Consumable {
    pub fn targeting(&self) -> Targeting {
        match *self {
            Consumable::Healing { .. } | Consumable::Key => Targeting::None,
            Consumable::Bomb { radius, .. } => Targeting::Area { radius },
            Consumable::Gun { maximum_range, .. } => Targeting::Single {
                range: maximum_range,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorData {
    pub fighter: Fighter,
    pub ai: Option<AiKind>,
    pub inventory: Inventory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub consumable: Consumable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Actor(ActorData),
    Item(ItemData),
}

/// A placeable game object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub glyph: char,
    pub color: Rgb,
    pub name: String,
    pub blocks_movement: bool,
    pub render_order: RenderOrder,
    pub owner: Owner,
    pub kind: EntityKind,
}

impl Entity {
    /// Builds a living actor. Actors block movement and draw above items.
    pub fn actor(
        name: &str,
        glyph: char,
        color: Rgb,
        fighter: Fighter,
        ai: AiKind,
        inventory: Inventory,
    ) -> Self {
        Self {
            id: new_entity_id(),
            position: Position::new(0, 0),
            glyph,
            color,
            name: name.to_string(),
            blocks_movement: true,
            render_order: RenderOrder::Actor,
            owner: Owner::Detached,
            kind: EntityKind::Actor(ActorData {
                fighter,
                ai: Some(ai),
                inventory,
            }),
        }
    }

    /// Builds an item. Items never block movement.
    pub fn item(name: &str, glyph: char, color: Rgb, consumable: Consumable) -> Self {
        Self {
            id: new_entity_id(),
            position: Position::new(0, 0),
            glyph,
            color,
            name: name.to_string(),
            blocks_movement: false,
            render_order: RenderOrder::Item,
            owner: Owner::Detached,
            kind: EntityKind::Item(ItemData { consumable }),
        }
    }

    /// Returns a copy placed at the given position.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn actor_data(&self) -> Option<&ActorData> {
        match &self.kind {
            EntityKind::Actor(data) => Some(data),
            EntityKind::Item(_) => None,
        }
    }

    pub fn actor_data_mut(&mut self) -> Option<&mut ActorData> {
        match &mut self.kind {
            EntityKind::Actor(data) => Some(data),
            EntityKind::Item(_) => None,
        }
    }

    pub fn fighter(&self) -> Option<&Fighter> {
        self.actor_data().map(|data| &data.fighter)
    }

    pub fn fighter_mut(&mut self) -> Option<&mut Fighter> {
        self.actor_data_mut().map(|data| &mut data.fighter)
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        self.actor_data().map(|data| &data.inventory)
    }

    pub fn inventory_mut(&mut self) -> Option<&mut Inventory> {
        self.actor_data_mut().map(|data| &mut data.inventory)
    }

    pub fn ai(&self) -> Option<AiKind> {
        self.actor_data().and_then(|data| data.ai)
    }

    pub fn consumable(&self) -> Option<Consumable> {
        match &self.kind {
            EntityKind::Item(data) => Some(data.consumable),
            EntityKind::Actor(_) => None,
        }
    }

    pub fn has_combat(&self) -> bool {
        self.fighter().is_some()
    }

    pub fn has_ai(&self) -> bool {
        self.ai().is_some()
    }

    pub fn has_inventory(&self) -> bool {
        self.inventory().is_some()
    }

    pub fn has_consumable(&self) -> bool {
        self.consumable().is_some()
    }

    /// An actor is alive exactly while it has a behavior driver.
    pub fn is_alive(&self) -> bool {
        self.has_ai()
    }

    /// Turns a living actor into remains. Returns false if it was already dead.
    pub fn die(&mut self) -> bool {
        let was_alive = match self.actor_data_mut() {
            Some(data) => data.ai.take().is_some(),
            None => false,
        };
        if !was_alive {
            return false;
        }

        self.glyph = '%';
        self.color = Rgb(191, 0, 0);
        self.blocks_movement = false;
        self.render_order = RenderOrder::Corpse;
        self.name = format!("remains of {}", self.name);
        true
    }
}

/// The player character template.
pub fn player(inventory_capacity: usize) -> Entity {
    Entity::actor(
        "Player",
        '@',
        Rgb::WHITE,
        Fighter::new(30, 2, 5),
        AiKind::Player,
        Inventory::new(inventory_capacity),
    )
}
