//! # User Interface Elements
//!
//! The status bar shown under the deck.

use serde::{Deserialize, Serialize};

/// Player hit points and deck progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBar {
    pub hp: i32,
    pub max_hp: i32,
    pub floor: u32,
    pub target_floor: u32,
}

impl StatusBar {
    /// Number of filled cells in a health bar `total_width` cells wide.
    pub fn filled_width(&self, total_width: u32) -> u32 {
        if self.max_hp <= 0 || self.hp <= 0 {
            return 0;
        }
        (self.hp as f64 / self.max_hp as f64 * total_width as f64) as u32
    }

    /// Text health bar, e.g. `[#######.......] HP: 15/30`.
    ///
    /// # Examples
    ///
    /// ```
    /// use derelict::StatusBar;
    ///
    /// let status = StatusBar { hp: 15, max_hp: 30, floor: 2, target_floor: 5 };
    /// assert_eq!(status.health_bar(10), "[#####.....] HP: 15/30");
    /// ```
    pub fn health_bar(&self, total_width: u32) -> String {
        let filled = self.filled_width(total_width) as usize;
        let empty = (total_width as usize).saturating_sub(filled);
        format!(
            "[{}{}] HP: {}/{}",
            "#".repeat(filled),
            ".".repeat(empty),
            self.hp,
            self.max_hp
        )
    }

    pub fn floor_label(&self) -> String {
        format!("Spaceship level: {}/{}", self.floor, self.target_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width_rounds_down() {
        let status = StatusBar {
            hp: 29,
            max_hp: 30,
            floor: 1,
            target_floor: 5,
        };
        assert_eq!(status.filled_width(20), 19);
    }

    #[test]
    fn test_dead_player_has_empty_bar() {
        let status = StatusBar {
            hp: 0,
            max_hp: 30,
            floor: 3,
            target_floor: 5,
        };
        assert_eq!(status.filled_width(20), 0);
        assert_eq!(status.health_bar(4), "[....] HP: 0/30");
        assert_eq!(status.floor_label(), "Spaceship level: 3/5");
    }
}
