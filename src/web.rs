//! Browser binding
//!
//! A page owns one `ArcadeHandle`, calls `frame` from its
//! `requestAnimationFrame` callback and forwards keyboard and pointer events.
//! After each frame it reads `hud_json` and `sprites` to draw. Sound cues,
//! music state and the end of a session come back through JS callbacks.

use js_sys::{Function, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::audio::{AudioSink, Cue};
use crate::consts::SIM_DT;
use crate::games::{GameKind, WordList};
use crate::render::{Display, Frame, SpriteInstance};
use crate::settings::Settings;
use crate::sim::{DriverPhase, FixedStep, Game, InputEvent, LoopDriver, Outcome, SessionState};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Forwards cues and music state to page callbacks
#[derive(Default)]
struct JsAudio {
    on_cue: Option<Function>,
    on_music: Option<Function>,
}

impl AudioSink for JsAudio {
    fn play_cue(&mut self, cue: Cue) {
        if let Some(callback) = &self.on_cue {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(cue.as_str())) {
                log::warn!("Cue callback failed: {:?}", e);
            }
        }
    }

    fn set_music(&mut self, playing: bool) {
        if let Some(callback) = &self.on_music {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_bool(playing)) {
                log::warn!("Music callback failed: {:?}", e);
            }
        }
    }
}

/// The page pulls frames itself; only the end of a session is pushed
#[derive(Default)]
struct JsDisplay {
    on_end: Option<Function>,
}

impl Display for JsDisplay {
    fn render(&mut self, _frame: &Frame) {}

    fn on_ended(&mut self, outcome: Outcome, session: &SessionState) {
        let Some(callback) = &self.on_end else {
            return;
        };
        let result = callback.call2(
            &JsValue::NULL,
            &JsValue::from_str(outcome.as_str()),
            &JsValue::from_f64(session.score as f64),
        );
        if let Err(e) = result {
            log::warn!("End callback failed: {:?}", e);
        }
    }
}

#[wasm_bindgen]
pub struct ArcadeHandle {
    driver: LoopDriver<Box<dyn Game>, JsDisplay, JsAudio>,
    kind: GameKind,
    tuning: Tuning,
    words: WordList,
    pacing: FixedStep,
}

#[wasm_bindgen]
impl ArcadeHandle {
    /// Create a handle for `variant` ("lane-dodge", "falling-dodge",
    /// "match-pairs", "hangman"). `tuning` and `settings` are optional JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(
        variant: &str,
        seed: f64,
        tuning: Option<String>,
        settings: Option<String>,
    ) -> Result<ArcadeHandle, JsValue> {
        let kind = GameKind::from_str(variant)
            .ok_or_else(|| js_error(format!("unknown game variant '{}'", variant)))?;
        let seed = normalize_seed(seed)?;
        let tuning = Tuning::load(tuning.as_deref());
        let settings = Settings::load(settings.as_deref());
        let words = WordList::fallback();
        let game = kind.build(&tuning, words.clone());
        log::info!("Created {} handle", kind.as_str());
        Ok(Self {
            driver: LoopDriver::with_shell(
                game,
                JsDisplay::default(),
                JsAudio::default(),
                &settings,
                seed,
            ),
            kind,
            tuning,
            words,
            pacing: FixedStep::new(),
        })
    }

    pub fn start(&mut self) {
        self.pacing.reset();
        self.driver.start();
    }

    pub fn restart(&mut self, seed: f64) -> Result<(), JsValue> {
        let seed = normalize_seed(seed)?;
        self.pacing.reset();
        self.driver.restart(seed);
        Ok(())
    }

    pub fn pause(&mut self) {
        self.driver.pause();
    }

    pub fn resume(&mut self) {
        // The gap spent paused must not count as play time
        self.pacing.reset();
        self.driver.resume();
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        if self.driver.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Animation-frame callback. Runs whole fixed steps and returns how many.
    pub fn frame(&mut self, timestamp_ms: f64) -> u32 {
        if !self.driver.is_running() {
            self.pacing.reset();
            return 0;
        }
        let mut substeps = 0;
        for _ in 0..self.pacing.frame(timestamp_ms) {
            if !self.driver.tick(SIM_DT) {
                break;
            }
            substeps += 1;
        }
        substeps
    }

    /// Forward a `KeyboardEvent.key`. Escape toggles pause. Returns whether the
    /// key was used.
    pub fn key(&mut self, name: &str) -> bool {
        if name == "Escape" {
            self.toggle_pause();
            return true;
        }
        match InputEvent::from_key(name) {
            Some(input) => {
                self.driver.push_input(input);
                true
            }
            None => false,
        }
    }

    /// Pointer moved (surface coordinates)
    pub fn pointer(&mut self, x: f32, y: f32) {
        self.driver
            .push_input(InputEvent::Pointer(glam::Vec2::new(x, y)));
    }

    /// Tap or click (surface coordinates)
    pub fn tap(&mut self, x: f32, y: f32) {
        self.driver
            .push_input(InputEvent::Select(glam::Vec2::new(x, y)));
    }

    #[wasm_bindgen(js_name = setSound)]
    pub fn set_sound(&mut self, on: bool) {
        self.driver.set_sound(on);
    }

    #[wasm_bindgen(js_name = setMusic)]
    pub fn set_music(&mut self, on: bool) {
        self.driver.set_music(on);
    }

    /// Flip the sound toggle and return the new state
    #[wasm_bindgen(js_name = toggleSound)]
    pub fn toggle_sound(&mut self) -> bool {
        let on = self.driver.audio().settings().toggle_sound();
        self.driver.set_sound(on);
        on
    }

    #[wasm_bindgen(js_name = toggleMusic)]
    pub fn toggle_music(&mut self) -> bool {
        let on = self.driver.audio().settings().toggle_music();
        self.driver.set_music(on);
        on
    }

    /// Menu button text, e.g. "Sound: On"
    #[wasm_bindgen(js_name = soundLabel)]
    pub fn sound_label(&self) -> String {
        self.driver.audio().settings().sound_label().to_string()
    }

    #[wasm_bindgen(js_name = musicLabel)]
    pub fn music_label(&self) -> String {
        self.driver.audio().settings().music_label().to_string()
    }

    /// Current toggles as JSON, for the page to persist
    #[wasm_bindgen(js_name = settingsJson)]
    pub fn settings_json(&self) -> String {
        self.driver.audio().settings().to_json()
    }

    /// Replace the hangman word list (JSON array of `{word, hint}`). A running
    /// session restarts with the new words.
    #[wasm_bindgen(js_name = setWords)]
    pub fn set_words(&mut self, json: &str) -> Result<(), JsValue> {
        self.words = WordList::from_json(json).map_err(js_error)?;
        log::info!("Loaded {} words", self.words.len());
        self.rebuild();
        Ok(())
    }

    /// Replace the tuning (JSON). A running session restarts.
    #[wasm_bindgen(js_name = setTuning)]
    pub fn set_tuning(&mut self, json: &str) -> Result<(), JsValue> {
        self.tuning = Tuning::from_json(json).map_err(js_error)?;
        self.rebuild();
        Ok(())
    }

    #[wasm_bindgen(js_name = onCue)]
    pub fn on_cue(&mut self, callback: Option<Function>) {
        self.driver.audio_mut().sink_mut().on_cue = callback;
    }

    #[wasm_bindgen(js_name = onMusic)]
    pub fn on_music(&mut self, callback: Option<Function>) {
        self.driver.audio_mut().sink_mut().on_music = callback;
    }

    #[wasm_bindgen(js_name = onEnd)]
    pub fn on_end(&mut self, callback: Option<Function>) {
        self.driver.display_mut().on_end = callback;
    }

    /// HUD snapshot of the last rendered frame as JSON
    #[wasm_bindgen(js_name = hudJson)]
    pub fn hud_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.driver.frame().hud).map_err(js_error)
    }

    /// "Score: 12" for the HUD
    #[wasm_bindgen(js_name = scoreLabel)]
    pub fn score_label(&self) -> String {
        self.driver.frame().hud.score_label()
    }

    #[wasm_bindgen(js_name = livesLabel)]
    pub fn lives_label(&self) -> String {
        self.driver.frame().hud.lives_label()
    }

    /// Sprite instances of the last rendered frame, packed as
    /// `spriteStride()`-byte records
    pub fn sprites(&self) -> Uint8Array {
        Uint8Array::from(self.driver.frame().sprite_bytes())
    }

    #[wasm_bindgen(js_name = spriteStride)]
    pub fn sprite_stride() -> u32 {
        std::mem::size_of::<SpriteInstance>() as u32
    }

    pub fn variant(&self) -> String {
        self.kind.as_str().to_string()
    }

    /// "idle", "running", "paused" or the outcome name
    pub fn phase(&self) -> String {
        match self.driver.phase() {
            DriverPhase::Idle => "idle".to_string(),
            DriverPhase::Running if self.driver.is_paused() => "paused".to_string(),
            DriverPhase::Running => "running".to_string(),
            DriverPhase::Ended(outcome) => outcome.as_str().to_string(),
        }
    }
}

impl ArcadeHandle {
    fn rebuild(&mut self) {
        let was_running = self.driver.phase() == DriverPhase::Running;
        *self.driver.game_mut() = self.kind.build(&self.tuning, self.words.clone());
        if was_running {
            self.start();
        }
    }
}

fn normalize_seed(seed: f64) -> Result<u64, JsValue> {
    if !seed.is_finite() || seed < 0.0 {
        return Err(js_error("seed must be a finite, non-negative number"));
    }
    Ok(seed.floor() as u64)
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}
