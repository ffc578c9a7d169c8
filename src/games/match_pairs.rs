//! Match-pairs memory game
//!
//! Cards are dealt face down in a grid. Turning up two cards with the same
//! shape and colour matches them; a mismatch flips both back after a short
//! delay. Matching every card clears the level and deals a larger deck. The
//! round timer gains a few seconds per match.

use glam::Vec2;
use rand::seq::SliceRandom;

use crate::audio::Cue;
use crate::render::{Frame, SpriteInstance, colors, sprite_kind};
use crate::sim::matching::{Card, CardFace, CardState, MatchOutcome, PairMatcher};
use crate::sim::progression::{LevelStep, Progression};
use crate::sim::{EntityId, EntityStore, Game, InputEvent, Outcome, Rect, TickContext};
use crate::tuning::MatchPairsTuning;

#[derive(Debug, Clone)]
pub struct MatchPairs {
    tuning: MatchPairsTuning,
    cards: EntityStore<Card>,
    matcher: PairMatcher,
    progression: Progression,
    /// Cards matched this level
    matched: usize,
    cols: usize,
    rows: usize,
}

impl Default for MatchPairs {
    fn default() -> Self {
        Self::new(MatchPairsTuning::default())
    }
}

impl MatchPairs {
    pub fn new(tuning: MatchPairsTuning) -> Self {
        Self {
            matcher: PairMatcher::new(tuning.mismatch_delay),
            progression: Progression::new(tuning.max_level),
            tuning,
            cards: EntityStore::new(),
            matched: 0,
            cols: 0,
            rows: 0,
        }
    }

    pub fn cards(&self) -> &EntityStore<Card> {
        &self.cards
    }

    pub fn matched_count(&self) -> usize {
        self.matched
    }

    pub fn pending(&self) -> &[EntityId] {
        self.matcher.pending()
    }

    pub fn level(&self) -> u32 {
        self.progression.level()
    }

    /// Centre of a card in surface coordinates, for pointer hit-testing
    pub fn card_center(&self, id: EntityId) -> Option<Vec2> {
        self.cards.get(id).map(|e| e.rect.center())
    }

    /// Area covered by the card grid including its outer gap
    pub fn bounds(&self) -> Rect {
        let pitch = self.tuning.card_size + self.tuning.card_gap;
        Rect::new(
            0.0,
            0.0,
            self.cols as f32 * pitch + self.tuning.card_gap,
            self.rows as f32 * pitch + self.tuning.card_gap,
        )
    }

    /// Deal a fresh shuffled deck for the current level and restart the timer
    fn deal(&mut self, ctx: &mut TickContext<'_>) {
        let mut faces = CardFace::all();
        faces.shuffle(ctx.rng);
        let pairs = (self.tuning.pairs_for_level(self.progression.level()) as usize)
            .clamp(1, faces.len());
        faces.truncate(pairs);

        let mut deck: Vec<CardFace> = faces.iter().chain(faces.iter()).copied().collect();
        deck.shuffle(ctx.rng);

        let count = deck.len();
        self.cols = (count as f32).sqrt().ceil() as usize;
        self.rows = count.div_ceil(self.cols);

        let size = self.tuning.card_size;
        let pitch = size + self.tuning.card_gap;
        self.cards.clear();
        for (i, face) in deck.into_iter().enumerate() {
            let col = (i % self.cols) as f32;
            let row = (i / self.cols) as f32;
            let rect = Rect::new(
                self.tuning.card_gap + col * pitch,
                self.tuning.card_gap + row * pitch,
                size,
                size,
            );
            self.cards.spawn(rect, Vec2::ZERO, Card::new(face));
        }

        self.matcher.reset();
        self.matched = 0;
        ctx.session.start_round(self.tuning.round_seconds);
        log::debug!(
            "Dealt {} cards ({}x{}) for level {}",
            count,
            self.cols,
            self.rows,
            self.progression.level()
        );
    }

    fn select_at(&mut self, point: Vec2) {
        let Some(id) = self.cards.pick_at(point) else {
            return;
        };
        if let Some(MatchOutcome::Revealed(id)) = self.matcher.select(&mut self.cards, id) {
            log::trace!("Card {} revealed", id);
        }
    }

    fn clear_level(&mut self, ctx: &mut TickContext<'_>) {
        match self.progression.advance_level() {
            LevelStep::Next(level) => {
                log::info!("Match pairs reached level {}", level);
                ctx.level_up(level);
                self.deal(ctx);
            }
            LevelStep::Victory => {
                ctx.session.finish(Outcome::Victory);
            }
        }
    }
}

impl Game for MatchPairs {
    fn name(&self) -> &'static str {
        "match-pairs"
    }

    fn initial_lives(&self) -> u32 {
        0
    }

    fn reset(&mut self, ctx: &mut TickContext<'_>) {
        self.progression.reset();
        ctx.session.level = self.progression.level();
        self.deal(ctx);
    }

    fn handle_input(&mut self, input: &InputEvent, _ctx: &mut TickContext<'_>) {
        if let InputEvent::Select(point) = *input {
            self.select_at(point);
        }
    }

    fn update(&mut self, dt: f32, _ctx: &mut TickContext<'_>) {
        for card in self.cards.iter_mut() {
            card.payload.animate(dt, self.tuning.flip_speed);
        }
        if let Some(MatchOutcome::Reverted(a, b)) = self.matcher.update(&mut self.cards, dt) {
            log::trace!("Cards {} and {} flipped back", a, b);
        }
    }

    fn evaluate(&mut self, ctx: &mut TickContext<'_>) {
        match self.matcher.evaluate(&mut self.cards) {
            Some(MatchOutcome::Matched(a, b)) => {
                log::debug!("Matched cards {} and {}", a, b);
                self.matched += 2;
                ctx.session.credit(self.tuning.match_reward);
                ctx.session.add_time(self.tuning.time_bonus_per_match);
                ctx.cue(Cue::Correct);
            }
            Some(MatchOutcome::Mismatched(..)) => {
                ctx.session.penalize(self.tuning.mismatch_penalty);
                ctx.cue(Cue::Incorrect);
            }
            _ => {}
        }

        if !self.cards.is_empty() && self.matched >= self.cards.len() {
            self.clear_level(ctx);
        }
    }

    fn render(&self, frame: &mut Frame) {
        frame.push(SpriteInstance::new(
            &self.bounds(),
            colors::BACKGROUND,
            sprite_kind::BACKGROUND,
        ));
        for entity in self.cards.iter() {
            let card = &entity.payload;
            let sprite = if card.flip < 0.5 {
                SpriteInstance::new(&entity.rect, colors::CARD_BACK, sprite_kind::CARD_BACK)
            } else {
                let mut color = card.face.color.rgba();
                if card.state == CardState::Matched {
                    for (c, t) in color.iter_mut().zip(colors::MATCHED_TINT) {
                        *c *= t;
                    }
                }
                SpriteInstance::new(
                    &entity.rect,
                    color,
                    sprite_kind::CARD_FACE + card.face.shape.index(),
                )
            };
            frame.push(sprite.with_param(card.flip));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{DriverPhase, GameEvent, LoopDriver};

    fn started(tuning: MatchPairsTuning) -> LoopDriver<MatchPairs> {
        let mut driver = LoopDriver::new(MatchPairs::new(tuning), 17);
        driver.start();
        driver
    }

    fn two_pairs() -> MatchPairsTuning {
        MatchPairsTuning {
            base_pairs: 2,
            max_level: 1,
            ..Default::default()
        }
    }

    /// Hidden cards grouped into (a, b) pairs of equal faces
    fn hidden_pairs(game: &MatchPairs) -> Vec<(EntityId, EntityId)> {
        let hidden: Vec<_> = game
            .cards()
            .iter()
            .filter(|e| e.payload.state == CardState::Hidden)
            .collect();
        let mut pairs = Vec::new();
        for (i, a) in hidden.iter().enumerate() {
            for b in &hidden[i + 1..] {
                if a.payload.face == b.payload.face {
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }

    fn click(driver: &mut LoopDriver<MatchPairs>, ids: &[EntityId]) -> Vec<GameEvent> {
        for &id in ids {
            if let Some(center) = driver.game().card_center(id) {
                driver.push_input(InputEvent::Select(center));
            }
        }
        driver.tick(SIM_DT);
        driver.drain_events()
    }

    fn state(driver: &LoopDriver<MatchPairs>, id: EntityId) -> Option<CardState> {
        driver.game().cards().get(id).map(|e| e.payload.state)
    }

    #[test]
    fn test_deal_lays_out_pairs() {
        let driver = started(MatchPairsTuning::default());
        let game = driver.game();
        assert_eq!(game.cards().len(), 4);
        assert_eq!(hidden_pairs(game).len(), 2);
        assert_eq!(driver.session().time_remaining(), Some(60.0));
        // 2x2 grid of 64 px cards with 8 px gaps
        assert_eq!(game.bounds(), Rect::new(0.0, 0.0, 152.0, 152.0));
    }

    #[test]
    fn test_matching_every_pair_wins() {
        let mut driver = started(two_pairs());
        let pairs = hidden_pairs(driver.game());

        let events = click(&mut driver, &[pairs[0].0, pairs[0].1]);
        assert!(events.contains(&GameEvent::Cue(Cue::Correct)));
        assert_eq!(driver.game().matched_count(), 2);
        assert_eq!(driver.session().score, 10);
        assert_eq!(state(&driver, pairs[0].0), Some(CardState::Matched));
        assert_eq!(driver.phase(), DriverPhase::Running);

        let events = click(&mut driver, &[pairs[1].0, pairs[1].1]);
        assert!(events.contains(&GameEvent::Ended(Outcome::Victory)));
        assert_eq!(driver.session().score, 20);
        assert_eq!(driver.phase(), DriverPhase::Ended(Outcome::Victory));
    }

    #[test]
    fn test_matched_card_cannot_be_reselected() {
        let mut driver = started(two_pairs());
        let pairs = hidden_pairs(driver.game());
        click(&mut driver, &[pairs[0].0, pairs[0].1]);
        click(&mut driver, &[pairs[0].0]);
        assert!(driver.game().pending().is_empty());
        assert_eq!(driver.session().score, 10);
    }

    #[test]
    fn test_mismatch_flips_back_after_delay() {
        let mut driver = started(two_pairs());
        let pairs = hidden_pairs(driver.game());
        let (a, b) = (pairs[0].0, pairs[1].0);

        let events = click(&mut driver, &[a, b]);
        assert!(events.contains(&GameEvent::Cue(Cue::Incorrect)));
        assert_eq!(state(&driver, a), Some(CardState::Revealed));

        // A third card is refused while the pair is showing
        click(&mut driver, &[pairs[0].1]);
        assert_eq!(state(&driver, pairs[0].1), Some(CardState::Hidden));

        for _ in 0..60 {
            driver.tick(SIM_DT);
        }
        assert_eq!(state(&driver, a), Some(CardState::Hidden));
        assert_eq!(state(&driver, b), Some(CardState::Hidden));
        assert!(driver.game().pending().is_empty());

        // Selectable again
        click(&mut driver, &[a]);
        assert_eq!(state(&driver, a), Some(CardState::Revealed));
    }

    #[test]
    fn test_mismatch_penalty_saturates() {
        let mut driver = started(MatchPairsTuning {
            mismatch_penalty: 5,
            ..two_pairs()
        });
        let pairs = hidden_pairs(driver.game());
        click(&mut driver, &[pairs[0].0, pairs[1].0]);
        assert_eq!(driver.session().score, 0);
    }

    #[test]
    fn test_cleared_level_deals_larger_deck() {
        let mut driver = started(MatchPairsTuning {
            max_level: 2,
            ..Default::default()
        });
        for (a, b) in hidden_pairs(driver.game()) {
            click(&mut driver, &[a, b]);
        }
        assert_eq!(driver.session().level, 2);
        assert_eq!(driver.game().cards().len(), 8);
        assert_eq!(driver.game().matched_count(), 0);
        // Timer restarted for the new deck
        assert_eq!(driver.session().time_remaining(), Some(60.0));
    }

    #[test]
    fn test_match_extends_timer() {
        let mut driver = started(two_pairs());
        let pairs = hidden_pairs(driver.game());
        click(&mut driver, &[pairs[0].0, pairs[0].1]);
        let remaining = driver.session().time_remaining().unwrap_or(0.0);
        assert!((remaining - (62.0 - SIM_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_timer_expiry_is_time_up() {
        let mut driver = started(MatchPairsTuning {
            round_seconds: Some(1.0),
            ..Default::default()
        });
        for _ in 0..70 {
            driver.tick(SIM_DT);
        }
        assert_eq!(driver.phase(), DriverPhase::Ended(Outcome::TimeUp));
    }

    #[test]
    fn test_flip_animation_reaches_face() {
        let mut driver = started(two_pairs());
        let pairs = hidden_pairs(driver.game());
        click(&mut driver, &[pairs[0].0]);
        for _ in 0..30 {
            driver.tick(SIM_DT);
        }
        let face_sprites = driver
            .frame()
            .sprites
            .iter()
            .filter(|s| s.kind >= sprite_kind::CARD_FACE)
            .count();
        assert_eq!(face_sprites, 1);
    }
}
