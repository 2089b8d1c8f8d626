//! # Input Module
//!
//! Turns parsed player input into game actions or read-only views. Views
//! (inventory, look, message history) never change the game state. Input
//! that cannot become an action comes back as a notice for the message log.

pub mod commands;

pub use commands::*;

use crate::game::{ConcreteAction, GameState, MessageColor, Targeting};
use crate::{DerelictError, DerelictResult};

/// Number of messages shown by the history view when no limit is given.
pub const DEFAULT_HISTORY_LENGTH: usize = 20;

const HELP_TEXT: &str = "\
Movement: h j k l y u b n (move or attack)
.  wait a turn       g  pick up an item
>  take the stairs   use <slot> [x,y]  use an item
look x,y             inv  show inventory
log                  quit";

/// What a piece of input amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Submit this action to the turn engine
    Action(ConcreteAction),
    /// Text to show; the game state is untouched
    View(String),
    /// Feedback to append to the message log; no turn passes
    Notice { text: String, color: MessageColor },
    Quit,
}

impl InputOutcome {
    fn invalid_entry() -> Self {
        InputOutcome::Notice {
            text: "Invalid entry.".to_string(),
            color: MessageColor::Invalid,
        }
    }
}

/// Input handler for processing player commands.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Messages shown by the history view
    pub history_length: usize,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            history_length: DEFAULT_HISTORY_LENGTH,
        }
    }

    /// Parses a command line and resolves it against the current state.
    pub fn handle_line(&self, line: &str, game_state: &GameState) -> DerelictResult<InputOutcome> {
        match parse_command(line) {
            Some(input) => self.input_to_action(input, game_state),
            None => Ok(InputOutcome::invalid_entry()),
        }
    }

    /// Converts player input to a concrete game action or a view.
    pub fn input_to_action(
        &self,
        input: PlayerInput,
        game_state: &GameState,
    ) -> DerelictResult<InputOutcome> {
        let player_id = game_state.player_id;

        let outcome = match input {
            PlayerInput::Move(direction) => {
                InputOutcome::Action(ConcreteAction::bump(player_id, direction))
            }
            PlayerInput::Wait => InputOutcome::Action(ConcreteAction::wait(player_id)),
            PlayerInput::PickUp => InputOutcome::Action(ConcreteAction::pick_up(player_id)),
            PlayerInput::TakeStairs => InputOutcome::Action(ConcreteAction::take_stairs(player_id)),
            PlayerInput::UseItem { slot, target } => {
                let items = game_state.inventory_items();
                match items.get(slot) {
                    Some(item) => {
                        let needs_target = item
                            .consumable()
                            .map_or(false, |c| c.targeting() != Targeting::None);
                        if needs_target && target.is_none() {
                            InputOutcome::Notice {
                                text: "Select a target location.".to_string(),
                                color: MessageColor::NeedsTarget,
                            }
                        } else {
                            let action = ConcreteAction::use_item(player_id, item.id, target);
                            InputOutcome::Action(action)
                        }
                    }
                    None => InputOutcome::invalid_entry(),
                }
            }
            PlayerInput::Look(pos) => {
                let names = game_state.names_at(pos);
                if names.is_empty() {
                    InputOutcome::View("You see nothing of interest.".to_string())
                } else {
                    InputOutcome::View(names)
                }
            }
            PlayerInput::ShowInventory => InputOutcome::View(self.inventory_view(game_state)?),
            PlayerInput::ShowLog => InputOutcome::View(
                game_state
                    .message_log()
                    .recent(self.history_length)
                    .iter()
                    .map(|message| message.full_text())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            PlayerInput::Help => InputOutcome::View(HELP_TEXT.to_string()),
            PlayerInput::Quit => InputOutcome::Quit,
        };
        Ok(outcome)
    }

    fn inventory_view(&self, game_state: &GameState) -> DerelictResult<String> {
        let capacity = game_state
            .player()?
            .inventory()
            .map(|inventory| inventory.capacity)
            .ok_or_else(|| DerelictError::InvalidState("Player has no inventory".to_string()))?;
        let items = game_state.inventory_items();
        if items.is_empty() {
            return Ok("(Empty)".to_string());
        }

        let mut lines = vec![format!("Inventory ({}/{})", items.len(), capacity)];
        for (slot, item) in items.iter().enumerate() {
            let letter = char::from(b'a' + (slot % 26) as u8);
            lines.push(format!("({}) {}", letter, item.name));
        }
        Ok(lines.join("\n"))
    }
}
