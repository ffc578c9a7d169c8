//! Render stage interface
//!
//! The core fills a `Frame` each tick; the display shell draws it. Sprites are
//! plain-old-data so a shell can upload them as a single instance buffer.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::sim::{Outcome, Rect, SessionState};

/// One axis-aligned sprite
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    /// Shape index for shells that draw glyphs (see `sprite_kind`)
    pub kind: u32,
    /// Animation parameter (flip progress for cards, 0 otherwise)
    pub param: f32,
}

impl SpriteInstance {
    pub fn new(rect: &Rect, color: [f32; 4], kind: u32) -> Self {
        Self {
            position: rect.pos.to_array(),
            size: rect.size.to_array(),
            color,
            kind,
            param: 0.0,
        }
    }

    pub fn with_param(mut self, param: f32) -> Self {
        self.param = param;
        self
    }
}

/// Sprite kinds understood by the shell
pub mod sprite_kind {
    pub const BACKGROUND: u32 = 0;
    pub const PLAYER: u32 = 1;
    pub const OBSTACLE: u32 = 2;
    pub const LANE_LINE: u32 = 3;
    pub const CARD_BACK: u32 = 4;
    pub const GALLOWS: u32 = 5;
    /// Hangman letter slot; `param` is 1.0 once the letter is revealed
    pub const LETTER_SLOT: u32 = 6;
    /// Card faces are `CARD_FACE + shape index`
    pub const CARD_FACE: u32 = 16;
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.13, 0.13, 0.13, 1.0];
    pub const LANE_LINE: [f32; 4] = [0.33, 0.33, 0.33, 1.0];
    pub const PLAYER: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const OBSTACLE: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const CARD_BACK: [f32; 4] = [0.3, 0.3, 0.45, 1.0];
    pub const MATCHED_TINT: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
    pub const GALLOWS: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
    pub const LETTER_SLOT: [f32; 4] = [0.6, 0.6, 0.7, 1.0];
}

/// Read-only session view for HUD text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub paused: bool,
    pub time_remaining: Option<f32>,
    /// Variant-specific caption (masked hangman word)
    pub caption: Option<String>,
    /// Variant-specific hint text
    pub hint: Option<String>,
}

impl HudSnapshot {
    pub fn from_session(session: &SessionState) -> Self {
        Self {
            score: session.score,
            lives: session.lives,
            level: session.level,
            paused: session.paused,
            time_remaining: session.time_remaining(),
            caption: None,
            hint: None,
        }
    }

    /// "Score: 12" style labels used by the HUD
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn lives_label(&self) -> String {
        format!("Lives: {}", self.lives)
    }
}

/// Everything the shell needs to draw one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub hud: HudSnapshot,
    pub sprites: Vec<SpriteInstance>,
}

impl Frame {
    pub fn clear(&mut self) {
        self.hud = HudSnapshot::default();
        self.sprites.clear();
    }

    pub fn push(&mut self, sprite: SpriteInstance) {
        self.sprites.push(sprite);
    }

    /// Sprite data as raw bytes for an instance buffer
    pub fn sprite_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sprites)
    }
}

/// Display shell: draws frames and reacts to the end of a session
pub trait Display {
    fn render(&mut self, frame: &Frame);

    /// Called exactly once when a session reaches a terminal outcome
    fn on_ended(&mut self, _outcome: Outcome, _session: &SessionState) {}
}

/// Draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn render(&mut self, _frame: &Frame) {}
}

/// Keeps the last frame and counts calls (tests, headless inspection)
#[derive(Debug, Default, Clone)]
pub struct FrameRecorder {
    pub last: Frame,
    pub renders: u32,
    pub endings: Vec<Outcome>,
}

impl Display for FrameRecorder {
    fn render(&mut self, frame: &Frame) {
        self.last = frame.clone();
        self.renders += 1;
    }

    fn on_ended(&mut self, outcome: Outcome, _session: &SessionState) {
        self.endings.push(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 40);
        let mut frame = Frame::default();
        frame.push(SpriteInstance::new(
            &Rect::new(1.0, 2.0, 3.0, 4.0),
            colors::PLAYER,
            sprite_kind::PLAYER,
        ));
        assert_eq!(frame.sprite_bytes().len(), 40);
        let floats: &[f32] = bytemuck::cast_slice(frame.sprite_bytes());
        assert_eq!(&floats[..4], &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_hud_labels() {
        let mut session = SessionState::new(3);
        session.credit(7);
        let hud = HudSnapshot::from_session(&session);
        assert_eq!(hud.score_label(), "Score: 7");
        assert_eq!(hud.lives_label(), "Lives: 3");
        assert_eq!(hud.time_remaining, None);
    }
}
