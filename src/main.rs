//! Casual Arcade headless runner
//!
//! Plays one session of a variant with a simple autopilot at a fixed 60 Hz
//! step and logs the result. The browser build is driven through
//! `casual_arcade::web` instead.
//!
//! Usage: `casual-arcade [variant] [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::seq::IndexedRandom;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use casual_arcade::audio::{AudioSink, Cue};
    use casual_arcade::consts::SIM_DT;
    use casual_arcade::games::{FallingDodge, GameKind, Hangman, LaneDodge, MatchPairs, WordList};
    use casual_arcade::render::NullDisplay;
    use casual_arcade::settings::Settings;
    use casual_arcade::sim::{CardState, Direction, DriverPhase, Game, InputEvent, LoopDriver};
    use casual_arcade::tuning::Tuning;

    /// Give up after ten minutes of simulated play
    const MAX_TICKS: u64 = 60 * 600;

    /// Letters in rough English frequency order
    const LETTER_ORDER: &str = "etaoinshrdlcumwfgypbvkjxqz";

    /// Logs cues instead of playing them
    struct LogAudio;

    impl AudioSink for LogAudio {
        fn play_cue(&mut self, cue: Cue) {
            log::debug!("cue: {}", cue.as_str());
        }

        fn set_music(&mut self, playing: bool) {
            log::debug!("music: {}", if playing { "on" } else { "off" });
        }
    }

    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let kind = match args.next() {
            Some(name) => match GameKind::from_str(&name) {
                Some(kind) => kind,
                None => {
                    log::warn!("Unknown variant '{}', playing lane dodge", name);
                    GameKind::LaneDodge
                }
            },
            None => GameKind::LaneDodge,
        };
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
        let tuning_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                None
            }
        });
        let tuning = Tuning::load(tuning_json.as_deref());

        log::info!("Casual Arcade (headless) playing {} with seed {}", kind.as_str(), seed);

        let mut pilot_rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
        match kind {
            GameKind::LaneDodge => play(LaneDodge::new(tuning.lane_dodge), seed, lane_pilot),
            GameKind::FallingDodge => {
                play(FallingDodge::new(tuning.falling_dodge), seed, falling_pilot)
            }
            GameKind::MatchPairs => play(MatchPairs::new(tuning.match_pairs), seed, |game, tick| {
                match_pilot(game, tick, &mut pilot_rng)
            }),
            GameKind::Hangman => play(
                Hangman::new(tuning.hangman, WordList::fallback()),
                seed,
                hangman_pilot,
            ),
        }
    }

    fn play<G: Game>(game: G, seed: u64, mut pilot: impl FnMut(&G, u64) -> Option<InputEvent>) {
        let mut driver =
            LoopDriver::with_shell(game, NullDisplay, LogAudio, &Settings::default(), seed);
        driver.start();

        while driver.ticks() < MAX_TICKS {
            if let Some(input) = pilot(driver.game(), driver.ticks()) {
                driver.push_input(input);
            }
            if !driver.tick(SIM_DT) {
                break;
            }
        }

        let session = driver.session();
        match driver.phase() {
            DriverPhase::Ended(outcome) => log::info!(
                "Finished: {} after {:.1}s, score {}, level {}",
                outcome.as_str(),
                session.total_elapsed,
                session.score,
                session.level
            ),
            _ => log::info!(
                "Stopped after {:.1}s without an outcome, score {}, level {}",
                session.total_elapsed,
                session.score,
                session.level
            ),
        }
    }

    /// Move to the nearest lane with no obstacle about to land
    fn lane_pilot(game: &LaneDodge, _tick: u64) -> Option<InputEvent> {
        let player = game.player_rect();
        let danger_from = player.pos.y - 200.0;
        let threatened = |lane: usize| {
            game.obstacles().iter().any(|o| {
                o.alive
                    && o.payload.lane == Some(lane as u8)
                    && o.rect.max().y > danger_from
                    && o.rect.pos.y < player.max().y
            })
        };

        let current = game.player_lane();
        if !threatened(current) {
            return None;
        }
        if current > 0 && !threatened(current - 1) {
            Some(InputEvent::Move(Direction::Left))
        } else if current + 1 < game.lanes() && !threatened(current + 1) {
            Some(InputEvent::Move(Direction::Right))
        } else {
            None
        }
    }

    /// Step away from the closest obstacle above the player
    fn falling_pilot(game: &FallingDodge, tick: u64) -> Option<InputEvent> {
        // One step every few ticks, like a human tapping keys
        if tick % 6 != 0 {
            return None;
        }
        let player = game.player_rect();
        let threat = game
            .obstacles()
            .iter()
            .filter(|o| o.alive && o.rect.max().y > player.pos.y - 150.0)
            .filter(|o| o.rect.max().x > player.pos.x - 10.0 && o.rect.pos.x < player.max().x + 10.0)
            .max_by(|a, b| a.rect.pos.y.total_cmp(&b.rect.pos.y))?;

        let bounds = game.bounds();
        let go_left = threat.rect.center().x >= player.center().x;
        let dir = if go_left && player.pos.x > bounds.pos.x {
            Direction::Left
        } else if !go_left && player.max().x < bounds.max().x {
            Direction::Right
        } else if go_left {
            Direction::Right
        } else {
            Direction::Left
        };
        Some(InputEvent::Move(dir))
    }

    /// Turn cards over: usually finds the partner of a face-up card, sometimes
    /// guesses
    fn match_pilot(game: &MatchPairs, tick: u64, rng: &mut Pcg32) -> Option<InputEvent> {
        if tick % 20 != 0 || game.pending().len() >= 2 {
            return None;
        }
        let hidden: Vec<_> = game
            .cards()
            .iter()
            .filter(|e| e.payload.state == CardState::Hidden)
            .collect();

        let partner = game.pending().first().and_then(|&id| {
            let face = game.cards().get(id)?.payload.face;
            hidden.iter().find(|e| e.payload.face == face)
        });
        let choice = match partner {
            Some(card) if rng.random_bool(0.7) => Some(*card),
            _ => hidden.choose(rng).copied(),
        }?;
        game.card_center(choice.id).map(InputEvent::Select)
    }

    /// Guess the most common letter not tried yet, a few times per second
    fn hangman_pilot(game: &Hangman, tick: u64) -> Option<InputEvent> {
        if tick % 15 != 0 {
            return None;
        }
        LETTER_ORDER
            .chars()
            .find(|c| !game.guessed().contains(c))
            .map(InputEvent::Letter)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is casual_arcade::web::init, this is just to satisfy the compiler
}
