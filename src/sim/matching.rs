//! Match-pairs evaluation
//!
//! At most two cards may be face-up and unresolved at once. The second
//! selection is compared on its face key; a mismatch keeps both cards visible
//! for a fixed delay before they flip back.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityStore};

/// Card shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Star,
    Hexagon,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Circle,
        Shape::Square,
        Shape::Triangle,
        Shape::Diamond,
        Shape::Star,
        Shape::Hexagon,
    ];

    pub fn index(&self) -> u32 {
        match self {
            Shape::Circle => 0,
            Shape::Square => 1,
            Shape::Triangle => 2,
            Shape::Diamond => 3,
            Shape::Star => 4,
            Shape::Hexagon => 5,
        }
    }
}

/// Card colours, indices into the render palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl CardColor {
    pub const ALL: [CardColor; 4] = [
        CardColor::Red,
        CardColor::Blue,
        CardColor::Green,
        CardColor::Yellow,
    ];

    pub fn rgba(&self) -> [f32; 4] {
        match self {
            CardColor::Red => [0.9, 0.25, 0.25, 1.0],
            CardColor::Blue => [0.25, 0.45, 0.95, 1.0],
            CardColor::Green => [0.25, 0.8, 0.4, 1.0],
            CardColor::Yellow => [0.95, 0.85, 0.25, 1.0],
        }
    }
}

/// Equality key of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardFace {
    pub shape: Shape,
    pub color: CardColor,
}

impl CardFace {
    /// Every distinct face, shape-major
    pub fn all() -> Vec<CardFace> {
        Shape::ALL
            .iter()
            .flat_map(|&shape| {
                CardColor::ALL
                    .iter()
                    .map(move |&color| CardFace { shape, color })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    Hidden,
    /// Face-up, waiting for resolution
    Revealed,
    /// Permanently face-up
    Matched,
}

/// Card payload stored in the entity store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub face: CardFace,
    pub state: CardState,
    /// Flip animation progress: 0 = face down, 1 = face up
    pub flip: f32,
}

impl Card {
    pub fn new(face: CardFace) -> Self {
        Self {
            face,
            state: CardState::Hidden,
            flip: 0.0,
        }
    }

    /// Ease the flip animation toward the current state
    pub fn animate(&mut self, dt: f32, flip_speed: f32) {
        let target = if self.state == CardState::Hidden { 0.0 } else { 1.0 };
        let step = flip_speed * dt;
        if self.flip < target {
            self.flip = (self.flip + step).min(target);
        } else if self.flip > target {
            self.flip = (self.flip - step).max(target);
        }
    }
}

/// Result of a selection or resolution step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Card flipped face-up, waiting for a partner
    Revealed(EntityId),
    /// Pair resolved as equal; both now matched
    Matched(EntityId, EntityId),
    /// Pair resolved as unequal; both will revert after the delay
    Mismatched(EntityId, EntityId),
    /// Mismatched pair flipped back down and is selectable again
    Reverted(EntityId, EntityId),
}

/// Pending-selection tracker for the match-pairs evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairMatcher {
    pending: Vec<EntityId>,
    /// Seconds left before a mismatched pair flips back
    revert_timer: Option<f32>,
    revert_delay: f32,
}

impl PairMatcher {
    pub fn new(revert_delay: f32) -> Self {
        Self {
            pending: Vec::with_capacity(2),
            revert_timer: None,
            revert_delay,
        }
    }

    pub fn pending(&self) -> &[EntityId] {
        &self.pending
    }

    /// True while two cards are face-up and unresolved
    pub fn is_busy(&self) -> bool {
        self.pending.len() >= 2
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.revert_timer = None;
    }

    /// Select a card. Ignored when busy, or when the card is missing, already
    /// face-up, or matched.
    pub fn select(&mut self, store: &mut EntityStore<Card>, id: EntityId) -> Option<MatchOutcome> {
        if self.is_busy() {
            return None;
        }
        let entity = store.get_mut(id)?;
        if !entity.alive || entity.payload.state != CardState::Hidden {
            return None;
        }
        entity.payload.state = CardState::Revealed;
        self.pending.push(id);
        Some(MatchOutcome::Revealed(id))
    }

    /// Compare a completed pair. Runs once per pair; a mismatch arms the
    /// revert timer.
    pub fn evaluate(&mut self, store: &mut EntityStore<Card>) -> Option<MatchOutcome> {
        if !self.is_busy() || self.revert_timer.is_some() {
            return None;
        }
        let (a, b) = (self.pending[0], self.pending[1]);
        let face_a = store.get(a).map(|e| e.payload.face);
        let face_b = store.get(b).map(|e| e.payload.face);
        match (face_a, face_b) {
            (Some(fa), Some(fb)) if fa == fb => {
                for id in [a, b] {
                    if let Some(e) = store.get_mut(id) {
                        e.payload.state = CardState::Matched;
                    }
                }
                self.pending.clear();
                Some(MatchOutcome::Matched(a, b))
            }
            (Some(_), Some(_)) => {
                self.revert_timer = Some(self.revert_delay);
                Some(MatchOutcome::Mismatched(a, b))
            }
            _ => {
                // A pending card vanished (deck regenerated); drop the pair
                self.reset();
                None
            }
        }
    }

    /// Count down the mismatch delay; flips the pair back when it expires
    pub fn update(&mut self, store: &mut EntityStore<Card>, dt: f32) -> Option<MatchOutcome> {
        let timer = self.revert_timer.as_mut()?;
        *timer -= dt;
        if *timer > 0.0 {
            return None;
        }
        self.revert_timer = None;
        let (a, b) = (self.pending[0], self.pending[1]);
        for id in [a, b] {
            if let Some(e) = store.get_mut(id) {
                e.payload.state = CardState::Hidden;
            }
        }
        self.pending.clear();
        Some(MatchOutcome::Reverted(a, b))
    }
}
