//! # Command Definitions
//!
//! Text commands understood by the headless front end. Movement uses the vi
//! keys; everything else is a short word.

use crate::game::{Direction, Position};

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move or attack in a direction
    Move(Direction),
    /// Wait/rest for one turn
    Wait,
    /// Pick up item at current position
    PickUp,
    /// Descend the stairs under the player
    TakeStairs,
    /// Use the item in an inventory slot, optionally on a target cell
    UseItem {
        slot: usize,
        target: Option<Position>,
    },
    /// Names of whatever stands on a cell
    Look(Position),
    ShowInventory,
    /// Message history
    ShowLog,
    Help,
    Quit,
}

impl PlayerInput {
    /// Returns true if the input becomes a game action rather than a view.
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            PlayerInput::Move(_)
                | PlayerInput::Wait
                | PlayerInput::PickUp
                | PlayerInput::TakeStairs
                | PlayerInput::UseItem { .. }
        )
    }
}

/// Maps a vi key to its direction.
pub fn vi_direction(key: char) -> Option<Direction> {
    match key {
        'h' => Some(Direction::West),
        'j' => Some(Direction::South),
        'k' => Some(Direction::North),
        'l' => Some(Direction::East),
        'y' => Some(Direction::Northwest),
        'u' => Some(Direction::Northeast),
        'b' => Some(Direction::Southwest),
        'n' => Some(Direction::Southeast),
        _ => None,
    }
}

/// Parses `x,y`.
pub fn parse_position(text: &str) -> Option<Position> {
    let (x, y) = text.split_once(',')?;
    Some(Position::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Parses an inventory slot given as a letter (`a` is slot 0) or a number.
pub fn parse_slot(text: &str) -> Option<usize> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Some((c as u8 - b'a') as usize),
        _ => text.parse().ok(),
    }
}

/// Parses one command line. Returns None for unknown or malformed commands.
///
/// # Examples
///
/// ```
/// use derelict::{parse_command, Direction, PlayerInput, Position};
///
/// assert_eq!(parse_command("h"), Some(PlayerInput::Move(Direction::West)));
/// assert_eq!(
///     parse_command("use b 4,7"),
///     Some(PlayerInput::UseItem { slot: 1, target: Some(Position::new(4, 7)) })
/// );
/// assert_eq!(parse_command("dance"), None);
/// ```
pub fn parse_command(line: &str) -> Option<PlayerInput> {
    let mut words = line.split_whitespace();
    let head = words.next()?;
    let args: Vec<&str> = words.collect();

    let input = match (head, args.as_slice()) {
        (".", []) | ("wait", []) => PlayerInput::Wait,
        ("g", []) | ("pickup", []) => PlayerInput::PickUp,
        (">", []) | ("descend", []) => PlayerInput::TakeStairs,
        ("inv", []) | ("i", []) => PlayerInput::ShowInventory,
        ("log", []) | ("m", []) => PlayerInput::ShowLog,
        ("help", []) | ("?", []) => PlayerInput::Help,
        ("quit", []) | ("q", []) => PlayerInput::Quit,
        ("look", [pos]) => PlayerInput::Look(parse_position(pos)?),
        ("use", [slot]) => PlayerInput::UseItem {
            slot: parse_slot(slot)?,
            target: None,
        },
        ("use", [slot, pos]) => PlayerInput::UseItem {
            slot: parse_slot(slot)?,
            target: Some(parse_position(pos)?),
        },
        (key, []) => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => PlayerInput::Move(vi_direction(c)?),
                _ => return None,
            }
        }
        _ => return None,
    };
    Some(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vi_keys() {
        let keys = "hjklyubn";
        let directions: Vec<Direction> = keys.chars().filter_map(vi_direction).collect();
        assert_eq!(directions.len(), 8);
        assert_eq!(parse_command("y"), Some(PlayerInput::Move(Direction::Northwest)));
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(parse_command("  wait "), Some(PlayerInput::Wait));
        assert_eq!(parse_command("."), Some(PlayerInput::Wait));
        assert_eq!(parse_command("g"), Some(PlayerInput::PickUp));
        assert_eq!(parse_command(">"), Some(PlayerInput::TakeStairs));
        assert_eq!(parse_command("inv"), Some(PlayerInput::ShowInventory));
        assert_eq!(parse_command("log"), Some(PlayerInput::ShowLog));
    }

    #[test]
    fn test_use_and_look() {
        assert_eq!(
            parse_command("use 3"),
            Some(PlayerInput::UseItem {
                slot: 3,
                target: None
            })
        );
        assert_eq!(
            parse_command("look 10, 4"),
            None,
            "positions must not contain spaces"
        );
        assert_eq!(
            parse_command("look 10,4"),
            Some(PlayerInput::Look(Position::new(10, 4)))
        );
    }

    #[test]
    fn test_malformed_commands() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command("use"), None);
        assert_eq!(parse_command("use a b"), None);
        assert_eq!(parse_command("wait now"), None);
    }

    #[test]
    fn test_actions_versus_views() {
        assert!(PlayerInput::Wait.is_action());
        assert!(!PlayerInput::ShowLog.is_action());
        assert!(!PlayerInput::Look(Position::new(0, 0)).is_action());
    }
}
