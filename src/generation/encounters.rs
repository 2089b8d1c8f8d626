//! # Encounter Generation
//!
//! The alien roster and the weighted choice between its variants.

use crate::game::{AiKind, Entity, Fighter, Inventory, Rgb};
use crate::generation::{GenerationConfig, Generator};
use crate::DerelictResult;
use rand::rngs::StdRng;
use rand::Rng;

/// Probability that a spawned alien is the weak variant.
pub const WEAK_MONSTER_CHANCE: f64 = 0.7;

const ALIEN_COLOR: Rgb = Rgb(142, 7, 54);

/// The weak, common alien.
pub fn untung() -> Entity {
    Entity::actor(
        "Untung",
        'u',
        ALIEN_COLOR,
        Fighter::new(10, 0, 3),
        AiKind::Hostile,
        Inventory::new(0),
    )
}

/// The stronger alien.
pub fn tiada() -> Entity {
    Entity::actor(
        "Tiada",
        'T',
        ALIEN_COLOR,
        Fighter::new(16, 1, 4),
        AiKind::Hostile,
        Inventory::new(0),
    )
}

/// Picks which alien to spawn.
#[derive(Debug, Clone, Default)]
pub struct EncounterGenerator;

impl EncounterGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator<Entity> for EncounterGenerator {
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> DerelictResult<Entity> {
        if rng.gen::<f64>() < WEAK_MONSTER_CHANCE {
            Ok(untung())
        } else {
            Ok(tiada())
        }
    }

    fn validate(&self, content: &Entity, _config: &GenerationConfig) -> DerelictResult<()> {
        if content.is_alive() && content.has_combat() {
            Ok(())
        } else {
            Err(crate::DerelictError::GenerationFailed(format!(
                "{} is not a living actor",
                content.name
            )))
        }
    }

    fn generator_type(&self) -> &'static str {
        "EncounterGenerator"
    }
}
