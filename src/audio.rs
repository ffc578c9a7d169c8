//! Audio cues
//!
//! The core never plays sound itself. It names a cue and hands it to an
//! `AudioSink` supplied by the shell, gated by the sound/music toggles.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Player hit by an obstacle
    Hit,
    /// Obstacle dodged
    Dodge,
    /// Correct guess / matched pair
    Correct,
    /// Wrong guess / mismatched pair
    Incorrect,
    /// Level or round cleared
    LevelUp,
    /// Session won
    Win,
    /// Session lost
    GameOver,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Hit => "hit",
            Cue::Dodge => "dodge",
            Cue::Correct => "correct",
            Cue::Incorrect => "incorrect",
            Cue::LevelUp => "level_up",
            Cue::Win => "win",
            Cue::GameOver => "game_over",
        }
    }
}

/// Shell-side audio collaborator
pub trait AudioSink {
    /// Play a one-shot cue
    fn play_cue(&mut self, cue: Cue);
    /// Play or pause the background loop
    fn set_music(&mut self, playing: bool);
}

/// Discards everything (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_cue(&mut self, _cue: Cue) {}
    fn set_music(&mut self, _playing: bool) {}
}

/// Applies the sound/music toggles in front of a sink
#[derive(Debug)]
pub struct AudioGate<A: AudioSink> {
    sink: A,
    sound_on: bool,
    music_on: bool,
    /// Whether the shell wants music running (session active and unpaused)
    music_wanted: bool,
}

impl<A: AudioSink> AudioGate<A> {
    pub fn new(sink: A, settings: &Settings) -> Self {
        Self {
            sink,
            sound_on: settings.sound_on,
            music_on: settings.music_on,
            music_wanted: false,
        }
    }

    pub fn play(&mut self, cue: Cue) {
        if self.sound_on {
            self.sink.play_cue(cue);
        }
    }

    /// Request music on/off according to session state
    pub fn want_music(&mut self, wanted: bool) {
        self.music_wanted = wanted;
        self.sink.set_music(wanted && self.music_on);
    }

    pub fn set_sound(&mut self, on: bool) {
        self.sound_on = on;
    }

    pub fn set_music(&mut self, on: bool) {
        self.music_on = on;
        self.sink.set_music(self.music_wanted && on);
    }

    pub fn sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn music_on(&self) -> bool {
        self.music_on
    }

    /// Current toggles, for the shell to persist
    pub fn settings(&self) -> Settings {
        Settings {
            sound_on: self.sound_on,
            music_on: self.music_on,
        }
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut A {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        cues: Vec<Cue>,
        music: Vec<bool>,
    }

    impl AudioSink for Recorder {
        fn play_cue(&mut self, cue: Cue) {
            self.cues.push(cue);
        }
        fn set_music(&mut self, playing: bool) {
            self.music.push(playing);
        }
    }

    #[test]
    fn test_sound_toggle_gates_cues() {
        let mut gate = AudioGate::new(Recorder::default(), &Settings::default());
        gate.play(Cue::Hit);
        gate.set_sound(false);
        gate.play(Cue::Dodge);
        assert_eq!(gate.sink().cues, vec![Cue::Hit]);
    }

    #[test]
    fn test_music_toggle_respects_session() {
        let mut gate = AudioGate::new(Recorder::default(), &Settings::default());
        gate.want_music(true);
        gate.set_music(false);
        gate.set_music(true);
        gate.want_music(false);
        // Turning music on while the session is idle keeps it silent
        gate.set_music(true);
        assert_eq!(gate.sink().music, vec![true, false, true, false, false]);
    }
}
