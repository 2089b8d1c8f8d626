//! # Derelict
//!
//! A turn-based roguelike set aboard a derelict spaceship. The player explores
//! procedurally generated decks of rooms and corridors, fights the aliens that
//! took over the ship, collects equipment and descends deck by deck until the
//! lost ship key is recovered.
//!
//! ## Architecture Overview
//!
//! - **Game State**: the session owns the current deck, every entity, the
//!   message log and the random number generator
//! - **Entity Model**: actors and items as a closed set of variants with
//!   capability checks instead of virtual dispatch
//! - **Action System**: every player or AI decision is an [`Action`] that either
//!   succeeds with a list of [`GameEvent`]s or fails with an impossible-action
//!   reason
//! - **Generation System**: room-and-corridor deck generation with per-floor
//!   difficulty tables
//! - **Field of View**: symmetric shadowcasting recomputed once per turn
//!
//! Drawing characters and decoding key presses is left to the front end; the
//! crate exposes a [`GridSnapshot`] to draw from and accepts [`ConcreteAction`]s.

pub mod config;
pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

pub use config::{Difficulty, GameConfig};

/// Core error type for the Derelict game engine.
#[derive(thiserror::Error, Debug)]
pub enum DerelictError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// The action cannot be performed; the message is shown to the player
    #[error("{0}")]
    Impossible(String),

    /// Generated content does not meet its requirements
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The session already reached a terminal state
    #[error("The game has already ended")]
    GameEnded,
}

impl DerelictError {
    /// Shorthand for building an [`DerelictError::Impossible`].
    pub fn impossible(reason: impl Into<String>) -> Self {
        DerelictError::Impossible(reason.into())
    }

    /// Returns true for the recoverable impossible-action error.
    pub fn is_impossible(&self) -> bool {
        matches!(self, DerelictError::Impossible(_))
    }
}

/// Result type used throughout the Derelict codebase.
pub type DerelictResult<T> = Result<T, DerelictError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
