//! Catch Interference - a bouncing-logo arcade game
//!
//! Core modules:
//! - `sim`: Box physics, collisions and game state
//! - `session`: Run lifecycle, scoring and progression hand-off
//! - `progression`: Player profile, leveling and achievements
//! - `persistence`: Key-value storage of player, scores and settings
//! - `feedback`: Sound and vibration cues
//! - `renderer`: Scene description and WebGPU rendering pipeline
//! - `shell`: Screen navigation state machine

pub mod audio;
pub mod feedback;
pub mod haptics;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod progression;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod shell;
pub mod sim;

pub use feedback::{Cue, Feedback, FeedbackSink, NullFeedback};
pub use highscores::{Leaderboard, ScoreRecord};
pub use persistence::{KeyValueStore, MemoryStore, Storage};
pub use progression::{Achievement, AchievementId, Player, RunOutcome};
pub use session::GameSession;
pub use settings::{Settings, Theme};
pub use shell::{Screen, Shell, ShellAction};

/// Game configuration constants
pub mod consts {
    /// Logical drawing surface (all physics happens in these units)
    pub const SURFACE_WIDTH: f32 = 600.0;
    pub const SURFACE_HEIGHT: f32 = 450.0;

    /// Edge length of the bouncing box
    pub const BOX_SIZE: f32 = 40.0;
    /// Speed at run start, in units per reference frame
    pub const INITIAL_SPEED: f32 = 3.0;
    /// Velocity is expressed per this many milliseconds
    pub const REFERENCE_FRAME_MS: f64 = 16.0;

    /// Radius of the circular danger zone around each surface corner
    pub const CORNER_DANGER_ZONE: f32 = 50.0;

    /// Experience needed per level (threshold = level * EXP_PER_LEVEL)
    pub const EXP_PER_LEVEL: u32 = 100;
    /// Experience awarded per survived second
    pub const EXP_PER_SECOND: u32 = 2;
}

/// Format whole seconds as `m:ss`
pub fn format_survival_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Format accumulated play time as `Hh Mm`, or `Mm` under an hour
pub fn format_play_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}
