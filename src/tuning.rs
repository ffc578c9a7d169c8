//! Data-driven game balance
//!
//! One section per game variant. Every field has a default, so a tuning file
//! only needs to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::sim::ExitPolicy;
use crate::sim::progression::scaled;

/// Three-lane dodger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneDodgeTuning {
    pub width: f32,
    pub height: f32,
    /// Lane centre x coordinates, left to right
    pub lane_x: Vec<f32>,
    pub obstacle_size: f32,
    pub player_size: f32,
    /// Gap between the player's bottom edge and the surface bottom
    pub player_bottom_margin: f32,
    /// Pixels per second
    pub fall_speed: f32,
    /// Expected spawns per second
    pub spawn_rate: f32,
    pub lives: u32,
    pub exit_policy: ExitPolicy,
}

impl Default for LaneDodgeTuning {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 640.0,
            lane_x: vec![80.0, 180.0, 280.0],
            obstacle_size: 40.0,
            player_size: 40.0,
            player_bottom_margin: 20.0,
            fall_speed: 300.0,
            // 2% per frame at 60 Hz
            spawn_rate: 1.2,
            lives: 3,
            exit_policy: ExitPolicy::Credit(1),
        }
    }
}

/// Free-moving dodger with difficulty scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingDodgeTuning {
    pub width: f32,
    pub height: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_bottom_margin: f32,
    /// Pixels moved per directional key press
    pub player_step: f32,
    pub obstacle_size: f32,
    pub base_speed: f32,
    pub speed_per_level: f32,
    pub max_speed: f32,
    /// Seconds between spawns at level 1
    pub base_spawn_interval: f32,
    /// Interval reduction per level
    pub spawn_interval_step: f32,
    pub min_spawn_interval: f32,
    /// Obstacles dodged to clear a level
    pub dodges_per_level: u32,
    pub max_level: u32,
    pub lives: u32,
    pub exit_policy: ExitPolicy,
}

impl Default for FallingDodgeTuning {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
            player_width: 50.0,
            player_height: 20.0,
            player_bottom_margin: 10.0,
            player_step: 40.0,
            obstacle_size: 30.0,
            base_speed: 150.0,
            speed_per_level: 30.0,
            max_speed: 450.0,
            base_spawn_interval: 1.0,
            spawn_interval_step: 0.08,
            min_spawn_interval: 0.3,
            dodges_per_level: 10,
            max_level: 10,
            lives: 3,
            exit_policy: ExitPolicy::Credit(1),
        }
    }
}

impl FallingDodgeTuning {
    pub fn fall_speed(&self, level: u32) -> f32 {
        scaled(self.base_speed, self.speed_per_level, self.max_speed, level)
    }

    /// Spawns per second; the inverse interval, so it grows with the level
    pub fn spawn_rate(&self, level: u32) -> f32 {
        let shrink = self.base_spawn_interval - self.min_spawn_interval;
        let reduction = scaled(0.0, self.spawn_interval_step, shrink.max(0.0), level);
        1.0 / (self.base_spawn_interval - reduction).max(self.min_spawn_interval)
    }
}

/// Memory / match-pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPairsTuning {
    pub card_size: f32,
    pub card_gap: f32,
    pub base_pairs: u32,
    pub pairs_per_level: u32,
    pub max_pairs: u32,
    pub max_level: u32,
    /// Round time limit in seconds (None = untimed)
    pub round_seconds: Option<f32>,
    pub match_reward: u64,
    pub mismatch_penalty: u64,
    /// Seconds added to the round timer per match
    pub time_bonus_per_match: f32,
    /// Seconds a mismatched pair stays face-up
    pub mismatch_delay: f32,
    /// Flip animation speed (full flips per second)
    pub flip_speed: f32,
}

impl Default for MatchPairsTuning {
    fn default() -> Self {
        Self {
            card_size: 64.0,
            card_gap: 8.0,
            base_pairs: 2,
            pairs_per_level: 2,
            max_pairs: 12,
            max_level: 6,
            round_seconds: Some(60.0),
            match_reward: 10,
            mismatch_penalty: 0,
            time_bonus_per_match: 2.0,
            mismatch_delay: 0.8,
            flip_speed: 6.0,
        }
    }
}

impl MatchPairsTuning {
    pub fn pairs_for_level(&self, level: u32) -> u32 {
        scaled(
            self.base_pairs as f32,
            self.pairs_per_level as f32,
            self.max_pairs as f32,
            level,
        ) as u32
    }
}

/// Word guessing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HangmanTuning {
    /// Wrong guesses allowed per word
    pub max_misses: u32,
    /// Points per revealed letter occurrence
    pub letter_reward: u64,
    /// Points for solving a word
    pub word_bonus: u64,
    /// Words to solve for victory
    pub rounds: u32,
    pub round_seconds: Option<f32>,
}

impl Default for HangmanTuning {
    fn default() -> Self {
        Self {
            max_misses: 6,
            letter_reward: 1,
            word_bonus: 10,
            rounds: 10,
            round_seconds: None,
        }
    }
}

/// Balance for every variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub lane_dodge: LaneDodgeTuning,
    pub falling_dodge: FallingDodgeTuning,
    pub match_pairs: MatchPairsTuning,
    pub hangman: HangmanTuning,
}

impl Tuning {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Parse shell-supplied tuning, logging and falling back on errors
    pub fn load(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => tuning,
            Some(Err(e)) => {
                log::warn!("Ignoring malformed tuning: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }
}
