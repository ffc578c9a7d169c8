//! Events emitted during a tick, drained by the display shell

use serde::{Deserialize, Serialize};

use super::session::Outcome;
use crate::audio::Cue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Fire-and-forget sound cue
    Cue(Cue),
    /// A life was lost
    LifeLost { remaining: u32 },
    /// Moved to a new level/round
    LevelUp(u32),
    /// Session ended (emitted exactly once per session)
    Ended(Outcome),
}
