//! Feedback cues (sound + vibration)
//!
//! The simulation only ever talks to a [`FeedbackSink`]. The app injects a
//! [`Feedback`] that drives Web Audio and the vibration API, tests inject a
//! `Vec<Cue>` recorder or [`NullFeedback`].

use crate::audio::{AudioManager, SoundEffect};
use crate::haptics::{Haptics, VibrationPattern};
use crate::settings::Settings;

/// Discrete feedback events raised by gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Player tapped the box
    Tap,
    /// Box hit a wall (one per axis)
    Bounce,
    /// Box entered a corner zone
    GameOver,
    /// A run unlocked at least one achievement
    Achievement,
}

impl Cue {
    pub fn sound(&self) -> SoundEffect {
        match self {
            Cue::Tap => SoundEffect::Tap,
            Cue::Bounce => SoundEffect::Bounce,
            Cue::GameOver => SoundEffect::GameOver,
            Cue::Achievement => SoundEffect::Achievement,
        }
    }

    /// Vibration pattern in ms (on, off, on, ...); bounces don't buzz
    pub fn vibration(&self) -> Option<VibrationPattern> {
        match self {
            Cue::Tap => Some(&[10]),
            Cue::Bounce => None,
            Cue::GameOver => Some(&[100, 50, 100]),
            Cue::Achievement => Some(&[50, 30, 50, 30, 50]),
        }
    }
}

/// Anything that can receive gameplay cues
pub trait FeedbackSink {
    fn emit(&mut self, cue: Cue);

    /// Apply user toggles; sinks without channels ignore this
    fn configure(&mut self, _settings: &Settings) {}
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn emit(&mut self, _cue: Cue) {}
}

/// Records cues in order (used by tests and the headless demo)
impl FeedbackSink for Vec<Cue> {
    fn emit(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// Sound and vibration channels with independent toggles
pub struct Feedback {
    audio: AudioManager,
    haptics: Haptics,
    sound_enabled: bool,
    vibration_enabled: bool,
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new()
    }
}

impl Feedback {
    pub fn new() -> Self {
        Self {
            audio: AudioManager::new(),
            haptics: Haptics::new(),
            sound_enabled: true,
            vibration_enabled: true,
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn vibration_enabled(&self) -> bool {
        self.vibration_enabled
    }

    /// Resume audio output (browsers require a user gesture first)
    pub fn resume(&self) {
        self.audio.resume();
    }
}

impl FeedbackSink for Feedback {
    fn emit(&mut self, cue: Cue) {
        log::debug!("cue {:?}", cue);
        if self.sound_enabled {
            self.audio.play(cue.sound());
        }
        if self.vibration_enabled {
            if let Some(pattern) = cue.vibration() {
                self.haptics.vibrate(pattern);
            }
        }
    }

    fn configure(&mut self, settings: &Settings) {
        self.sound_enabled = settings.sound;
        self.vibration_enabled = settings.vibration;
    }
}
