//! Loop driver
//!
//! Owns the session, the RNG and the game variant, and runs one
//! update → evaluate → render cycle per `tick`. The external scheduler may
//! deliver stale callbacks after a pause; `tick` checks the paused flag on
//! entry instead of relying on cancellation.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::GameEvent;
use super::input::InputEvent;
use super::session::{Outcome, SessionState};
use crate::audio::{AudioGate, AudioSink, Cue, NullAudio};
use crate::render::{Display, Frame, HudSnapshot, NullDisplay};
use crate::settings::Settings;

/// Mutable view handed to a game variant during a tick
pub struct TickContext<'a> {
    pub session: &'a mut SessionState,
    pub rng: &'a mut Pcg32,
    events: &'a mut Vec<GameEvent>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        session: &'a mut SessionState,
        rng: &'a mut Pcg32,
        events: &'a mut Vec<GameEvent>,
    ) -> Self {
        Self {
            session,
            rng,
            events,
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn cue(&mut self, cue: Cue) {
        self.events.push(GameEvent::Cue(cue));
    }

    /// Lose a life and report it; returns true on the transition to zero
    pub fn lose_life(&mut self) -> bool {
        if self.session.lives == 0 {
            return false;
        }
        let ended = self.session.lose_life();
        self.events.push(GameEvent::LifeLost {
            remaining: self.session.lives,
        });
        ended
    }

    pub fn level_up(&mut self, level: u32) {
        self.session.level = level;
        self.events.push(GameEvent::LevelUp(level));
        self.events.push(GameEvent::Cue(Cue::LevelUp));
    }
}

/// A game variant driven by the loop
pub trait Game {
    fn name(&self) -> &'static str;

    /// Lives at session start (0 for variants without lives)
    fn initial_lives(&self) -> u32;

    /// Reset entities and player state, and configure the first round
    fn reset(&mut self, ctx: &mut TickContext<'_>);

    /// Apply one queued input event
    fn handle_input(&mut self, input: &InputEvent, ctx: &mut TickContext<'_>);

    /// Spawn, advance and prune entities
    fn update(&mut self, dt: f32, ctx: &mut TickContext<'_>);

    /// Collision / match evaluation and its score effects
    fn evaluate(&mut self, ctx: &mut TickContext<'_>);

    /// Paint entities and player into the frame
    fn render(&self, frame: &mut Frame);
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn initial_lives(&self) -> u32 {
        (**self).initial_lives()
    }
    fn reset(&mut self, ctx: &mut TickContext<'_>) {
        (**self).reset(ctx)
    }
    fn handle_input(&mut self, input: &InputEvent, ctx: &mut TickContext<'_>) {
        (**self).handle_input(input, ctx)
    }
    fn update(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        (**self).update(dt, ctx)
    }
    fn evaluate(&mut self, ctx: &mut TickContext<'_>) {
        (**self).evaluate(ctx)
    }
    fn render(&self, frame: &mut Frame) {
        (**self).render(frame)
    }
}

/// Lifecycle of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// Not started yet
    Idle,
    /// Accepting ticks (may be paused)
    Running,
    /// Terminal outcome reached; ticks are ignored until `start`
    Ended(Outcome),
}

pub struct LoopDriver<G: Game, D: Display = NullDisplay, A: AudioSink = NullAudio> {
    game: G,
    display: D,
    audio: AudioGate<A>,
    session: SessionState,
    rng: Pcg32,
    seed: u64,
    phase: DriverPhase,
    inputs: VecDeque<InputEvent>,
    /// Events from the most recent tick
    events: Vec<GameEvent>,
    frame: Frame,
    ticks: u64,
}

impl<G: Game> LoopDriver<G> {
    /// Headless driver with no display or audio
    pub fn new(game: G, seed: u64) -> Self {
        Self::with_shell(game, NullDisplay, NullAudio, &Settings::default(), seed)
    }
}

impl<G: Game, D: Display, A: AudioSink> LoopDriver<G, D, A> {
    pub fn with_shell(game: G, display: D, audio: A, settings: &Settings, seed: u64) -> Self {
        Self {
            session: SessionState::new(game.initial_lives()),
            game,
            display,
            audio: AudioGate::new(audio, settings),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            phase: DriverPhase::Idle,
            inputs: VecDeque::new(),
            events: Vec::new(),
            frame: Frame::default(),
            ticks: 0,
        }
    }

    /// Reset session, entities and RNG, then begin accepting ticks
    pub fn start(&mut self) {
        self.session = SessionState::new(self.game.initial_lives());
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.inputs.clear();
        self.events.clear();
        self.ticks = 0;
        {
            let mut ctx = TickContext::new(&mut self.session, &mut self.rng, &mut self.events);
            self.game.reset(&mut ctx);
        }
        self.phase = DriverPhase::Running;
        self.audio.want_music(true);
        log::info!("{} started (seed {})", self.game.name(), self.seed);
        self.request_render();
    }

    /// Restart with a new seed
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.start();
    }

    pub fn pause(&mut self) {
        if self.phase != DriverPhase::Running || self.session.paused {
            return;
        }
        self.session.paused = true;
        self.audio.want_music(false);
        log::debug!("{} paused", self.game.name());
        self.request_render();
    }

    pub fn resume(&mut self) {
        if self.phase != DriverPhase::Running || !self.session.paused {
            return;
        }
        self.session.paused = false;
        self.audio.want_music(true);
        log::debug!("{} resumed", self.game.name());
        self.request_render();
    }

    pub fn toggle_pause(&mut self) {
        if self.session.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Queue an input for the next tick. Dropped unless running and unpaused.
    pub fn push_input(&mut self, input: InputEvent) {
        if self.is_running() {
            self.inputs.push_back(input);
        } else {
            log::trace!("Dropped input {:?}", input);
        }
    }

    /// Advance by `dt` seconds. Returns false when the tick was ignored.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.is_running() {
            return false;
        }
        let dt = dt.max(0.0);
        self.ticks += 1;
        self.events.clear();
        self.session.advance_clock(dt);

        {
            let mut ctx = TickContext::new(&mut self.session, &mut self.rng, &mut self.events);
            while let Some(input) = self.inputs.pop_front() {
                if ctx.session.is_over() {
                    break;
                }
                self.game.handle_input(&input, &mut ctx);
            }
            if !ctx.session.is_over() {
                self.game.update(dt, &mut ctx);
                self.game.evaluate(&mut ctx);
            }
        }
        self.inputs.clear();

        let outcome = self.session.outcome();
        if let Some(outcome) = outcome {
            self.events.push(GameEvent::Ended(outcome));
            self.events.push(GameEvent::Cue(match outcome {
                Outcome::Victory => Cue::Win,
                Outcome::GameOver | Outcome::TimeUp => Cue::GameOver,
            }));
        }

        for event in &self.events {
            if let GameEvent::Cue(cue) = event {
                self.audio.play(*cue);
            }
        }

        self.request_render();

        if let Some(outcome) = outcome {
            self.phase = DriverPhase::Ended(outcome);
            self.audio.want_music(false);
            log::info!(
                "{} ended: {} (score {}, level {})",
                self.game.name(),
                outcome.as_str(),
                self.session.score,
                self.session.level
            );
            self.display.on_ended(outcome, &self.session);
        }
        true
    }

    fn request_render(&mut self) {
        self.frame.clear();
        self.frame.hud = HudSnapshot::from_session(&self.session);
        self.game.render(&mut self.frame);
        self.display.render(&self.frame);
    }

    pub fn set_sound(&mut self, on: bool) {
        self.audio.set_sound(on);
    }

    pub fn set_music(&mut self, on: bool) {
        self.audio.set_music(on);
    }

    /// Events produced by the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == DriverPhase::Running && !self.session.paused
    }

    pub fn is_paused(&self) -> bool {
        self.session.paused
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn audio(&self) -> &AudioGate<A> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioGate<A> {
        &mut self.audio
    }

    /// Last frame sent to the display
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
