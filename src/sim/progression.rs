//! Level / round progression

use serde::{Deserialize, Serialize};

/// Result of advancing past the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStep {
    /// Moved to the given (1-based) level
    Next(u32),
    /// Final level cleared
    Victory,
}

/// Level counter with a fixed cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    level: u32,
    max_level: u32,
}

impl Progression {
    pub fn new(max_level: u32) -> Self {
        Self {
            level: 1,
            max_level: max_level.max(1),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn reset(&mut self) {
        self.level = 1;
    }

    /// Advance one level. Past `max_level` the session is won and the level
    /// stays at the cap.
    pub fn advance_level(&mut self) -> LevelStep {
        if self.level >= self.max_level {
            return LevelStep::Victory;
        }
        self.level += 1;
        LevelStep::Next(self.level)
    }
}

/// Linear difficulty curve clamped at a maximum: `base + per_level * (level - 1)`
pub fn scaled(base: f32, per_level: f32, max: f32, level: u32) -> f32 {
    (base + per_level * level.saturating_sub(1) as f32).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_victory_only_after_max() {
        let mut p = Progression::new(3);
        assert_eq!(p.advance_level(), LevelStep::Next(2));
        assert_eq!(p.advance_level(), LevelStep::Next(3));
        assert_eq!(p.advance_level(), LevelStep::Victory);
        assert_eq!(p.level(), 3);
    }

    #[test]
    fn test_single_level() {
        let mut p = Progression::new(0);
        assert_eq!(p.max_level(), 1);
        assert_eq!(p.advance_level(), LevelStep::Victory);
    }

    proptest! {
        #[test]
        fn prop_scaled_is_non_decreasing(
            base in 0.0f32..500.0,
            per_level in 0.0f32..100.0,
            extra in 0.0f32..1000.0,
            level in 1u32..100,
        ) {
            let max = base + extra;
            let here = scaled(base, per_level, max, level);
            let next = scaled(base, per_level, max, level + 1);
            prop_assert!(next >= here);
            prop_assert!(next <= max);
        }
    }
}
