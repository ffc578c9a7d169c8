//! Game variants built on the loop driver

pub mod falling_dodge;
pub mod hangman;
pub mod lane_dodge;
pub mod match_pairs;
pub mod words;

pub use falling_dodge::FallingDodge;
pub use hangman::Hangman;
pub use lane_dodge::LaneDodge;
pub use match_pairs::MatchPairs;
pub use words::{WordEntry, WordList, WordSource};

use serde::{Deserialize, Serialize};

use crate::sim::Game;
use crate::tuning::Tuning;

/// Payload of a falling obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Lane index for lane-based variants
    pub lane: Option<u8>,
}

/// Selectable game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    LaneDodge,
    FallingDodge,
    MatchPairs,
    Hangman,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::LaneDodge,
        GameKind::FallingDodge,
        GameKind::MatchPairs,
        GameKind::Hangman,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::LaneDodge => "lane-dodge",
            GameKind::FallingDodge => "falling-dodge",
            GameKind::MatchPairs => "match-pairs",
            GameKind::Hangman => "hangman",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "lane-dodge" | "lanes" | "dodge" => Some(GameKind::LaneDodge),
            "falling-dodge" | "falling" => Some(GameKind::FallingDodge),
            "match-pairs" | "memory" | "pairs" => Some(GameKind::MatchPairs),
            "hangman" | "words" => Some(GameKind::Hangman),
            _ => None,
        }
    }

    /// Build the variant with its section of `tuning`
    pub fn build(&self, tuning: &Tuning, words: WordList) -> Box<dyn Game> {
        match self {
            GameKind::LaneDodge => Box::new(LaneDodge::new(tuning.lane_dodge.clone())),
            GameKind::FallingDodge => Box::new(FallingDodge::new(tuning.falling_dodge.clone())),
            GameKind::MatchPairs => Box::new(MatchPairs::new(tuning.match_pairs.clone())),
            GameKind::Hangman => Box::new(Hangman::new(tuning.hangman.clone(), words)),
        }
    }
}
