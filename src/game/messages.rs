//! # Message Log
//!
//! Append-only narration shown to the player: combat results, pickups,
//! impossible-action reasons and floor transitions.

use crate::game::Rgb;
use serde::{Deserialize, Serialize};

/// What kind of narration a message is; the front end picks colors from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageColor {
    Neutral,
    Welcome,
    PlayerAttack,
    EnemyAttack,
    PlayerDie,
    EnemyDie,
    HealthRecovered,
    NeedsTarget,
    Descend,
    Invalid,
    Impossible,
    Victory,
}

impl MessageColor {
    pub fn rgb(self) -> Rgb {
        match self {
            MessageColor::Neutral => Rgb::WHITE,
            MessageColor::Welcome => Rgb(32, 160, 255),
            MessageColor::PlayerAttack => Rgb(224, 224, 224),
            MessageColor::EnemyAttack => Rgb(255, 192, 192),
            MessageColor::PlayerDie => Rgb(255, 48, 48),
            MessageColor::EnemyDie => Rgb(255, 160, 48),
            MessageColor::HealthRecovered => Rgb(0, 255, 0),
            MessageColor::NeedsTarget => Rgb(63, 255, 255),
            MessageColor::Descend => Rgb(159, 63, 255),
            MessageColor::Invalid => Rgb(255, 255, 0),
            MessageColor::Impossible => Rgb(128, 128, 128),
            MessageColor::Victory => Rgb(255, 255, 63),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub plain_text: String,
    pub color: MessageColor,
    /// How many times in a row this message was logged
    pub count: u32,
}

impl Message {
    pub fn new(text: impl Into<String>, color: MessageColor) -> Self {
        Self {
            plain_text: text.into(),
            color,
            count: 1,
        }
    }

    /// The text with a repeat counter appended when needed.
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.plain_text, self.count)
        } else {
            self.plain_text.clone()
        }
    }
}

/// Ordered, unbounded message history.
///
/// # Examples
///
/// ```
/// use derelict::{MessageColor, MessageLog};
///
/// let mut log = MessageLog::new();
/// log.add_message("The door is blocked.", MessageColor::Impossible);
/// log.add_message("The door is blocked.", MessageColor::Impossible);
/// assert_eq!(log.len(), 1);
/// assert_eq!(log.messages()[0].full_text(), "The door is blocked. (x2)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, stacking it onto the previous one if identical.
    pub fn add_message(&mut self, text: impl Into<String>, color: MessageColor) {
        let text = text.into();
        if let Some(last) = self.messages.last_mut() {
            if last.plain_text == text {
                last.count += 1;
                return;
            }
        }
        self.messages.push(Message::new(text, color));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }
}
