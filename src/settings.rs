//! Shell-forwarded preferences
//!
//! The menu's sound and music buttons only flip these flags; the core reads
//! them when deciding whether to forward audio cues.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play one-shot sound cues
    pub sound_on: bool,
    /// Play the background music loop
    pub music_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_on: true,
            music_on: true,
        }
    }
}

impl Settings {
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_on = !self.sound_on;
        self.sound_on
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music_on = !self.music_on;
        self.music_on
    }

    /// Label for the menu button ("Sound: On")
    pub fn sound_label(&self) -> &'static str {
        if self.sound_on { "Sound: On" } else { "Sound: Off" }
    }

    pub fn music_label(&self) -> &'static str {
        if self.music_on { "Music: On" } else { "Music: Off" }
    }

    /// Parse settings saved by the shell, falling back to defaults
    pub fn load(json: Option<&str>) -> Self {
        if let Some(json) = json {
            match serde_json::from_str(json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }
        log::info!("Using default settings");
        Self::default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
