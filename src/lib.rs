//! Casual Arcade - a pausable update/render loop shared by small browser games
//!
//! Core modules:
//! - `sim`: Loop driver, session state, entity store, evaluators, progression
//! - `games`: Lane dodge, falling dodge, match pairs and hangman
//! - `render`: Frame and sprite data handed to the display shell
//! - `audio`: Sound cues and the sound/music gate
//! - `settings`: Shell-forwarded toggles
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod games;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::{AudioSink, Cue};
pub use games::GameKind;
pub use render::{Display, Frame, HudSnapshot, SpriteInstance};
pub use settings::Settings;
pub use sim::{Game, GameEvent, InputEvent, LoopDriver, Outcome, SessionState};
pub use tuning::Tuning;

/// Loop timing constants
pub mod consts {
    /// Nominal tick length (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest step a single frame may report
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum fixed steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}
