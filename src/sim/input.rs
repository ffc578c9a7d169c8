//! Input events consumed by the loop driver once per tick

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn step(&self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Abstract input, decoupled from any UI toolkit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Move the player one lane/step
    Move(Direction),
    /// Continuous pointer position (surface coordinates)
    Pointer(Vec2),
    /// Tap/click at a point
    Select(Vec2),
    /// Typed letter
    Letter(char),
}

impl InputEvent {
    /// Map a browser `KeyboardEvent.key` name to an input event
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(InputEvent::Move(Direction::Left)),
            "ArrowRight" => Some(InputEvent::Move(Direction::Right)),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => Some(InputEvent::Letter(c)),
                    _ => None,
                }
            }
        }
    }
}
