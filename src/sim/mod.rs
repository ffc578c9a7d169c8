//! Deterministic game-loop core
//!
//! Everything a variant needs to run inside the loop driver:
//! - Session state (score, lives, level, round clock, terminal outcome)
//! - Entity store with exit policies
//! - Overlap and pair-matching evaluators
//! - Level progression and difficulty curves
//!
//! Nothing in here draws or plays sound; the driver hands frames and cues to
//! the shell through the `Display` and `AudioSink` traits.

pub mod clock;
pub mod collision;
pub mod driver;
pub mod entity;
pub mod events;
pub mod input;
pub mod matching;
pub mod progression;
pub mod session;

pub use clock::{FixedStep, FrameClock};
pub use collision::{Rect, collect_overlaps};
pub use driver::{DriverPhase, Game, LoopDriver, TickContext};
pub use entity::{Entity, EntityId, EntityStore, ExitPolicy, PruneReport};
pub use events::GameEvent;
pub use input::{Direction, InputEvent};
pub use matching::{Card, CardFace, CardState, MatchOutcome, PairMatcher};
pub use progression::{LevelStep, Progression};
pub use session::{Outcome, SessionState};
