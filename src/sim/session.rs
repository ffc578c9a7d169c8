//! Session state: score, lives, level and the round clock
//!
//! Owned by the loop driver and handed to game variants through the tick
//! context. The round countdown is derived from accumulated tick time, so
//! there is no second timer that can drift or miss a pause.

use serde::{Deserialize, Serialize};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Lives exhausted
    GameOver,
    /// Round timer reached zero
    TimeUp,
    /// Final level cleared
    Victory,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::GameOver => "game_over",
            Outcome::TimeUp => "time_up",
            Outcome::Victory => "victory",
        }
    }
}

/// Score/lives tracker and round clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub lives: u32,
    /// 1-based level / round counter
    pub level: u32,
    pub paused: bool,
    /// Round time limit in seconds (None = untimed)
    pub time_limit: Option<f32>,
    /// Seconds granted on top of the limit this round
    pub time_bonus: f32,
    /// Seconds played this round
    pub round_elapsed: f32,
    /// Seconds played this session
    pub total_elapsed: f32,
    /// Latched terminal outcome
    outcome: Option<Outcome>,
}

impl SessionState {
    pub fn new(lives: u32) -> Self {
        Self {
            score: 0,
            lives,
            level: 1,
            paused: false,
            time_limit: None,
            time_bonus: 0.0,
            round_elapsed: 0.0,
            total_elapsed: 0.0,
            outcome: None,
        }
    }

    /// Add points
    pub fn credit(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    /// Remove points, never below zero
    pub fn penalize(&mut self, amount: u64) {
        self.score = self.score.saturating_sub(amount);
    }

    /// Extend the current round timer
    pub fn add_time(&mut self, seconds: f32) {
        if self.time_limit.is_some() && seconds > 0.0 {
            self.time_bonus += seconds;
        }
    }

    /// Lose one life. Returns true only on the transition to zero.
    pub fn lose_life(&mut self) -> bool {
        if self.lives == 0 {
            return false;
        }
        self.lives -= 1;
        if self.lives == 0 {
            return self.finish(Outcome::GameOver);
        }
        false
    }

    /// Start a new round timer
    pub fn start_round(&mut self, time_limit: Option<f32>) {
        self.time_limit = time_limit;
        self.time_bonus = 0.0;
        self.round_elapsed = 0.0;
    }

    /// Seconds left on the round timer, clamped at zero
    pub fn time_remaining(&self) -> Option<f32> {
        self.time_limit
            .map(|limit| (limit + self.time_bonus - self.round_elapsed).max(0.0))
    }

    /// Advance the session clock; latches `TimeUp` when the timer runs out
    pub fn advance_clock(&mut self, dt: f32) {
        if self.outcome.is_some() {
            return;
        }
        self.round_elapsed += dt;
        self.total_elapsed += dt;
        if self.time_remaining() == Some(0.0) {
            self.finish(Outcome::TimeUp);
        }
    }

    /// Latch a terminal outcome. The first outcome wins; returns whether this
    /// call set it.
    pub fn finish(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(3)
    }
}
