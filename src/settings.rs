//! Game settings and preferences
//!
//! Persisted separately from the player profile.

use serde::{Deserialize, Serialize};

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Retro,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Retro];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Retro => "Retro",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Sound effects on tap/bounce/game over
    pub sound: bool,
    /// Vibration on tap/game over
    pub vibration: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
            theme: Theme::Dark,
        }
    }
}

impl Settings {
    pub fn toggle_sound(&mut self) {
        self.sound = !self.sound;
    }

    pub fn toggle_vibration(&mut self) {
        self.vibration = !self.vibration;
    }
}
