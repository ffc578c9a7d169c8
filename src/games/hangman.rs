//! Hangman word guessing
//!
//! Each round is one word. Lives are the misses left on the current word and
//! are refilled when a new word is dealt. Solving the configured number of
//! words wins the session.

use super::words::{WordEntry, WordList, WordSource};
use crate::audio::Cue;
use crate::render::{Frame, SpriteInstance, colors, sprite_kind};
use crate::sim::{Game, InputEvent, Outcome, Rect, TickContext};
use crate::tuning::HangmanTuning;

const SURFACE: Rect = Rect::new(0.0, 0.0, 400.0, 400.0);

/// Base, post, beam and rope
const GALLOWS_FRAME: [Rect; 4] = [
    Rect::new(40.0, 300.0, 140.0, 8.0),
    Rect::new(70.0, 60.0, 8.0, 240.0),
    Rect::new(70.0, 60.0, 110.0, 8.0),
    Rect::new(170.0, 60.0, 4.0, 30.0),
];

/// Head, body, arms, legs; one piece per miss
const FIGURE: [Rect; 6] = [
    Rect::new(157.0, 90.0, 30.0, 30.0),
    Rect::new(168.0, 120.0, 8.0, 70.0),
    Rect::new(140.0, 135.0, 28.0, 6.0),
    Rect::new(176.0, 135.0, 28.0, 6.0),
    Rect::new(150.0, 190.0, 18.0, 50.0),
    Rect::new(176.0, 190.0, 18.0, 50.0),
];

const SLOT_WIDTH: f32 = 22.0;
const SLOT_GAP: f32 = 6.0;
const SLOT_Y: f32 = 350.0;

#[derive(Debug, Clone)]
pub struct Hangman<W: WordSource = WordList> {
    tuning: HangmanTuning,
    words: W,
    current: WordEntry,
    guessed: Vec<char>,
    misses: u32,
    round: u32,
}

impl<W: WordSource> Hangman<W> {
    pub fn new(tuning: HangmanTuning, words: W) -> Self {
        Self {
            tuning,
            words,
            current: WordEntry::new("", ""),
            guessed: Vec::new(),
            misses: 0,
            round: 1,
        }
    }

    pub fn word(&self) -> &str {
        &self.current.word
    }

    pub fn hint(&self) -> &str {
        &self.current.hint
    }

    pub fn guessed(&self) -> &[char] {
        &self.guessed
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Word with unguessed letters replaced by `_`, space separated
    pub fn masked(&self) -> String {
        self.current
            .word
            .chars()
            .map(|c| if self.guessed.contains(&c) { c } else { '_' })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_solved(&self) -> bool {
        !self.current.word.is_empty()
            && self.current.word.chars().all(|c| self.guessed.contains(&c))
    }

    /// A word always allows at least one miss
    fn max_lives(&self) -> u32 {
        self.tuning.max_misses.max(1)
    }

    fn deal(&mut self, ctx: &mut TickContext<'_>) {
        self.current = self.words.next_word(ctx.rng);
        self.guessed.clear();
        self.misses = 0;
        ctx.session.lives = self.max_lives();
        ctx.session.start_round(self.tuning.round_seconds);
        log::debug!(
            "Round {}: {} letters",
            self.round,
            self.current.word.len()
        );
    }

    fn guess(&mut self, letter: char, ctx: &mut TickContext<'_>) {
        if !letter.is_ascii_alphabetic() {
            return;
        }
        let letter = letter.to_ascii_lowercase();
        if self.guessed.contains(&letter) {
            return;
        }
        self.guessed.push(letter);

        let hits = self.current.word.chars().filter(|&c| c == letter).count() as u64;
        if hits > 0 {
            ctx.session.credit(self.tuning.letter_reward * hits);
            ctx.cue(Cue::Correct);
            // Later letters in the same tick belong to the next word
            self.settle(ctx);
        } else {
            self.misses += 1;
            ctx.cue(Cue::Incorrect);
            ctx.lose_life();
        }
    }

    /// Bank a solved word and deal the next one, or finish on the last round
    fn settle(&mut self, ctx: &mut TickContext<'_>) {
        if !self.is_solved() || ctx.session.is_over() {
            return;
        }
        ctx.session.credit(self.tuning.word_bonus);
        if self.round >= self.tuning.rounds {
            ctx.session.finish(Outcome::Victory);
            return;
        }
        self.round += 1;
        ctx.level_up(self.round);
        self.deal(ctx);
    }
}

impl<W: WordSource> Game for Hangman<W> {
    fn name(&self) -> &'static str {
        "hangman"
    }

    fn initial_lives(&self) -> u32 {
        self.max_lives()
    }

    fn reset(&mut self, ctx: &mut TickContext<'_>) {
        self.round = 1;
        ctx.session.level = 1;
        self.deal(ctx);
    }

    fn handle_input(&mut self, input: &InputEvent, ctx: &mut TickContext<'_>) {
        if let InputEvent::Letter(letter) = *input {
            self.guess(letter, ctx);
        }
    }

    fn update(&mut self, _dt: f32, _ctx: &mut TickContext<'_>) {}

    fn evaluate(&mut self, ctx: &mut TickContext<'_>) {
        self.settle(ctx);
    }

    fn render(&self, frame: &mut Frame) {
        frame.hud.caption = Some(self.masked());
        frame.hud.hint = Some(self.current.hint.clone());

        frame.push(SpriteInstance::new(
            &SURFACE,
            colors::BACKGROUND,
            sprite_kind::BACKGROUND,
        ));
        for piece in GALLOWS_FRAME.iter().chain(FIGURE.iter().take(self.misses as usize)) {
            frame.push(SpriteInstance::new(piece, colors::GALLOWS, sprite_kind::GALLOWS));
        }

        let letters = self.current.word.len() as f32;
        let row = letters * SLOT_WIDTH + (letters - 1.0).max(0.0) * SLOT_GAP;
        let left = (SURFACE.size.x - row) / 2.0;
        for (i, c) in self.current.word.chars().enumerate() {
            let x = left + i as f32 * (SLOT_WIDTH + SLOT_GAP);
            let revealed = if self.guessed.contains(&c) { 1.0 } else { 0.0 };
            frame.push(
                SpriteInstance::new(
                    &Rect::new(x, SLOT_Y, SLOT_WIDTH, 4.0),
                    colors::LETTER_SLOT,
                    sprite_kind::LETTER_SLOT,
                )
                .with_param(revealed),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{DriverPhase, GameEvent, LoopDriver};
    use rand_pcg::Pcg32;

    /// Deals the given words in order, cycling
    struct FixedWords {
        words: Vec<&'static str>,
        next: usize,
    }

    impl FixedWords {
        fn new(words: &[&'static str]) -> Self {
            Self {
                words: words.to_vec(),
                next: 0,
            }
        }
    }

    impl WordSource for FixedWords {
        fn next_word(&mut self, _rng: &mut Pcg32) -> WordEntry {
            let word = self.words[self.next % self.words.len()];
            self.next += 1;
            WordEntry::new(word, "hint")
        }
    }

    fn driver(words: &[&'static str], tuning: HangmanTuning) -> LoopDriver<Hangman<FixedWords>> {
        let mut driver = LoopDriver::new(Hangman::new(tuning, FixedWords::new(words)), 1);
        driver.start();
        driver
    }

    fn guess(driver: &mut LoopDriver<Hangman<FixedWords>>, letters: &str) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for c in letters.chars() {
            driver.push_input(InputEvent::Letter(c));
            driver.tick(SIM_DT);
            events.extend(driver.drain_events());
        }
        events
    }

    #[test]
    fn test_correct_guess_credits_each_occurrence() {
        let mut d = driver(&["banana"], HangmanTuning::default());
        let events = guess(&mut d, "a");
        assert_eq!(d.session().score, 3);
        assert_eq!(d.session().lives, 6);
        assert_eq!(d.game().masked(), "_ a _ a _ a");
        assert!(events.contains(&GameEvent::Cue(Cue::Correct)));
    }

    #[test]
    fn test_miss_costs_a_life() {
        let mut d = driver(&["banana"], HangmanTuning::default());
        let events = guess(&mut d, "z");
        assert_eq!(d.session().lives, 5);
        assert_eq!(d.game().misses(), 1);
        assert!(events.contains(&GameEvent::Cue(Cue::Incorrect)));
        assert!(events.contains(&GameEvent::LifeLost { remaining: 5 }));
    }

    #[test]
    fn test_repeated_and_invalid_guesses_are_noops() {
        let mut d = driver(&["banana"], HangmanTuning::default());
        guess(&mut d, "zZ1 ");
        assert_eq!(d.session().lives, 5);
        assert_eq!(d.game().guessed(), &['z']);

        guess(&mut d, "aA");
        assert_eq!(d.session().score, 3);
    }

    #[test]
    fn test_solved_word_starts_next_round() {
        let mut d = driver(&["cab", "dog"], HangmanTuning::default());
        guess(&mut d, "x");
        assert_eq!(d.session().lives, 5);

        let events = guess(&mut d, "cab");
        assert!(events.contains(&GameEvent::LevelUp(2)));
        assert_eq!(d.game().round(), 2);
        assert_eq!(d.session().level, 2);
        assert_eq!(d.game().word(), "dog");
        assert_eq!(d.game().masked(), "_ _ _");
        // 3 letters + word bonus
        assert_eq!(d.session().score, 13);
        // Lives refilled for the new word
        assert_eq!(d.session().lives, 6);
    }

    #[test]
    fn test_last_round_is_victory() {
        let mut d = driver(
            &["hi"],
            HangmanTuning {
                rounds: 1,
                ..Default::default()
            },
        );
        let events = guess(&mut d, "hi");
        assert_eq!(d.phase(), DriverPhase::Ended(Outcome::Victory));
        assert!(events.contains(&GameEvent::Ended(Outcome::Victory)));
        assert_eq!(d.session().score, 12);
    }

    #[test]
    fn test_running_out_of_misses_is_game_over() {
        let mut d = driver(&["hi"], HangmanTuning::default());
        let events = guess(&mut d, "abcdefg");
        assert_eq!(d.phase(), DriverPhase::Ended(Outcome::GameOver));
        assert_eq!(d.session().lives, 0);
        // The seventh letter arrived after the session ended
        assert_eq!(d.game().misses(), 6);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Ended(_)))
                .count(),
            1
        );
    }

    #[test]
    fn test_letters_after_solve_go_to_next_word() {
        let mut d = driver(
            &["hi", "zoo"],
            HangmanTuning {
                max_misses: 2,
                ..Default::default()
            },
        );
        guess(&mut d, "x");
        assert_eq!(d.session().lives, 1);

        // Solving letters and the next guess arrive in one tick
        for c in "hiz".chars() {
            d.push_input(InputEvent::Letter(c));
        }
        d.tick(SIM_DT);

        assert_eq!(d.phase(), DriverPhase::Running);
        assert_eq!(d.game().word(), "zoo");
        assert_eq!(d.game().guessed(), &['z']);
        assert_eq!(d.game().round(), 2);
        assert_eq!(d.session().lives, 2);
        // h, i, word bonus, z
        assert_eq!(d.session().score, 13);
    }

    #[test]
    fn test_zero_max_misses_allows_one() {
        let mut d = driver(
            &["hi"],
            HangmanTuning {
                max_misses: 0,
                ..Default::default()
            },
        );
        assert_eq!(d.session().lives, 1);
        guess(&mut d, "z");
        assert_eq!(d.phase(), DriverPhase::Ended(Outcome::GameOver));
        assert_eq!(d.game().misses(), 1);
    }

    #[test]
    fn test_render_caption_and_figure() {
        let mut d = driver(&["cab"], HangmanTuning::default());
        guess(&mut d, "ax");
        let frame = d.frame();
        assert_eq!(frame.hud.caption.as_deref(), Some("_ a _"));
        assert_eq!(frame.hud.hint.as_deref(), Some("hint"));
        let gallows = frame
            .sprites
            .iter()
            .filter(|s| s.kind == sprite_kind::GALLOWS)
            .count();
        assert_eq!(gallows, GALLOWS_FRAME.len() + 1);
        let revealed = frame
            .sprites
            .iter()
            .filter(|s| s.kind == sprite_kind::LETTER_SLOT && s.param == 1.0)
            .count();
        assert_eq!(revealed, 1);
    }
}
