//! Screen navigation
//!
//! A small state machine over the five screens. User actions arrive as
//! [`ShellAction`]s; the shell forwards game actions to the session and keeps
//! settings persisted and applied to the feedback channels.

use glam::Vec2;

use crate::feedback::FeedbackSink;
use crate::persistence::KeyValueStore;
use crate::session::GameSession;
use crate::settings::{Settings, Theme};
use crate::sim::GameStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Menu,
    Game,
    Profile,
    Leaderboard,
    Settings,
}

/// Everything the player can do from any screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShellAction {
    Play,
    OpenProfile,
    OpenLeaderboard,
    OpenSettings,
    /// Return to the menu (abandons a run in progress)
    Back,
    Pause,
    Resume,
    /// Start over from the pause or game-over overlay
    Restart,
    /// Settings button on the pause overlay; the run is abandoned
    PauseToSettings,
    ToggleSound,
    ToggleVibration,
    SetTheme(Theme),
    SelectAvatar(u32),
    /// Pointer down on the game surface, in surface units
    TapAt(Vec2),
}

pub struct Shell<F: FeedbackSink, S: KeyValueStore> {
    screen: Screen,
    settings: Settings,
    session: GameSession<F, S>,
}

impl<F: FeedbackSink, S: KeyValueStore> Shell<F, S> {
    pub fn new(mut session: GameSession<F, S>) -> Self {
        let settings = session.storage_mut().settings();
        session.feedback_mut().configure(&settings);
        Self {
            screen: Screen::Menu,
            settings,
            session,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &GameSession<F, S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession<F, S> {
        &mut self.session
    }

    /// Apply a user action at wall time `wall_ms`. Returns false if the action
    /// doesn't apply to the current screen or state
    pub fn apply(&mut self, action: ShellAction, wall_ms: f64) -> bool {
        let status = self.session.status();
        let handled = match (self.screen, action) {
            (Screen::Menu, ShellAction::Play) => {
                self.screen = Screen::Game;
                self.session.reset();
                self.session.start(wall_ms)
            }
            (Screen::Menu, ShellAction::OpenProfile) => self.go(Screen::Profile),
            (Screen::Menu, ShellAction::OpenLeaderboard) => self.go(Screen::Leaderboard),
            (Screen::Menu, ShellAction::OpenSettings) => self.go(Screen::Settings),

            (Screen::Game, ShellAction::Pause) => self.session.pause(),
            (Screen::Game, ShellAction::Resume) => self.session.resume(),
            (Screen::Game, ShellAction::Restart)
                if matches!(status, GameStatus::Paused | GameStatus::GameOver) =>
            {
                self.session.reset();
                self.session.start(wall_ms)
            }
            (Screen::Game, ShellAction::PauseToSettings) if status == GameStatus::Paused => {
                self.session.reset();
                self.go(Screen::Settings)
            }
            (Screen::Game, ShellAction::TapAt(point)) => self.session.tap_at(point),
            (Screen::Game, ShellAction::Back) => {
                self.session.reset();
                self.go(Screen::Menu)
            }

            (Screen::Profile, ShellAction::SelectAvatar(id)) => {
                self.session.select_avatar(id);
                true
            }

            (Screen::Settings, ShellAction::ToggleSound) => {
                self.change_settings(Settings::toggle_sound)
            }
            (Screen::Settings, ShellAction::ToggleVibration) => {
                self.change_settings(Settings::toggle_vibration)
            }
            (Screen::Settings, ShellAction::SetTheme(theme)) => {
                self.change_settings(|s| s.theme = theme)
            }

            (Screen::Profile | Screen::Leaderboard | Screen::Settings, ShellAction::Back) => {
                self.go(Screen::Menu)
            }
            _ => false,
        };
        if !handled {
            log::debug!("{:?} ignored on {:?} ({:?})", action, self.screen, status);
        }
        handled
    }

    /// The host lost visibility or focus mid-run
    pub fn auto_pause(&mut self) -> bool {
        self.screen == Screen::Game && self.session.pause()
    }

    fn go(&mut self, screen: Screen) -> bool {
        log::debug!("Screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
        true
    }

    fn change_settings(&mut self, change: impl FnOnce(&mut Settings)) -> bool {
        change(&mut self.settings);
        self.session.feedback_mut().configure(&self.settings);
        let settings = self.settings;
        self.session.storage_mut().save_settings(&settings);
        true
    }
}
