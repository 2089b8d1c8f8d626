//! # Item Generation
//!
//! The item table and the weighted choice used when stocking rooms.

use crate::game::{Consumable, Entity, Rgb};
use crate::generation::{GenerationConfig, Generator};
use crate::{DerelictError, DerelictResult};
use rand::rngs::StdRng;
use rand::Rng;

/// Cumulative thresholds for bomb and first aid kit; the rest are guns.
pub const BOMB_THRESHOLD: f64 = 0.3;
pub const FIRST_AID_THRESHOLD: f64 = 0.7;

pub fn first_aid_kit() -> Entity {
    Entity::item(
        "First Aid Kit",
        '+',
        Rgb(4, 161, 110),
        Consumable::Healing { amount: 6 },
    )
}

pub fn space_bomb() -> Entity {
    Entity::item(
        "Space Bomb",
        '*',
        Rgb(255, 255, 0),
        Consumable::Bomb {
            damage: 12,
            radius: 3,
        },
    )
}

pub fn space_gun() -> Entity {
    Entity::item(
        "Space Gun",
        '"',
        Rgb(255, 255, 0),
        Consumable::Gun {
            damage: 20,
            maximum_range: 5,
        },
    )
}

/// The ship key hidden on the final floor.
pub fn ship_key() -> Entity {
    Entity::item("Key", '1', Rgb(255, 215, 0), Consumable::Key)
}

/// Picks which item to place.
#[derive(Debug, Clone, Default)]
pub struct ItemGenerator;

impl ItemGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator<Entity> for ItemGenerator {
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> DerelictResult<Entity> {
        let roll = rng.gen::<f64>();
        let item = if roll < BOMB_THRESHOLD {
            space_bomb()
        } else if roll < FIRST_AID_THRESHOLD {
            first_aid_kit()
        } else {
            space_gun()
        };
        Ok(item)
    }

    fn validate(&self, content: &Entity, _config: &GenerationConfig) -> DerelictResult<()> {
        match content.consumable() {
            Some(Consumable::Key) => Err(DerelictError::GenerationFailed(
                "The key is never part of the random item table".to_string(),
            )),
            Some(_) => Ok(()),
            None => Err(DerelictError::GenerationFailed(format!(
                "{} is not an item",
                content.name
            ))),
        }
    }

    fn generator_type(&self) -> &'static str {
        "ItemGenerator"
    }
}
