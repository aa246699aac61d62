//! Game session: the run state machine plus everything a run touches
//!
//! Owns the simulation state, the seeded generator, the feedback sink and the
//! storage. The host drives it with `update` once per display frame and
//! `tap` for pointer input.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::feedback::{Cue, FeedbackSink};
use crate::highscores::{Leaderboard, ScoreRecord};
use crate::persistence::{KeyValueStore, Storage, new_record_id};
use crate::progression::{Player, RunOutcome};
use crate::sim::{GameState, GameStatus, advance, redirect};

pub struct GameSession<F: FeedbackSink, S: KeyValueStore> {
    state: GameState,
    /// Taps during the current run
    taps: u32,
    /// Timestamp of the previous frame; None means the next frame is a baseline
    last_frame: Option<f64>,
    rng: Pcg32,
    player: Player,
    feedback: F,
    storage: Storage<S>,
    last_outcome: Option<RunOutcome>,
}

impl<F: FeedbackSink, S: KeyValueStore> GameSession<F, S> {
    pub fn new(feedback: F, store: S, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut storage = Storage::new(store);
        let player = storage.player(&mut rng);
        log::info!(
            "Session ready for {} (level {}, {} games)",
            player.name,
            player.level,
            player.games_played
        );
        Self {
            state: GameState::idle(),
            taps: 0,
            last_frame: None,
            rng,
            player,
            feedback,
            storage,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn taps(&self) -> u32 {
        self.taps
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage<S> {
        &mut self.storage
    }

    pub fn leaderboard(&mut self) -> Leaderboard {
        self.storage.scores()
    }

    /// Summary of the most recent finished run
    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.last_outcome.as_ref()
    }

    /// Begin a new run. Rejected while a run is already playing
    pub fn start(&mut self, wall_ms: f64) -> bool {
        if self.state.is_playing() {
            log::debug!("Start ignored, run already in progress");
            return false;
        }
        // Progression is applied to the profile as stored at run start
        self.player = self.storage.player(&mut self.rng);
        self.state = GameState::playing(wall_ms, &mut self.rng);
        self.taps = 0;
        self.last_frame = None;
        self.last_outcome = None;
        log::info!(
            "Run started: heading {:.2} rad, color {}",
            self.state.game_box.vel.to_angle(),
            self.state.game_box.color.as_str()
        );
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state.status != GameStatus::Playing {
            return false;
        }
        self.state.status = GameStatus::Paused;
        log::info!("Paused at {}s", self.state.score);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state.status != GameStatus::Paused {
            return false;
        }
        self.state.status = GameStatus::Playing;
        // The gap while paused must not move the box
        self.last_frame = None;
        log::info!("Resumed");
        true
    }

    /// Back to the inert idle display
    pub fn reset(&mut self) {
        self.state = GameState::idle();
        self.taps = 0;
        self.last_frame = None;
    }

    /// Box tapped. Only counts while playing
    pub fn tap(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.taps += 1;
        self.feedback.emit(Cue::Tap);
        redirect(&mut self.state.game_box, &mut self.rng);
        log::debug!("Tap #{}", self.taps);
        true
    }

    /// Pointer at `point` (surface units); taps the box if it was hit
    pub fn tap_at(&mut self, point: glam::Vec2) -> bool {
        self.state.is_playing() && self.state.game_box.contains(point) && self.tap()
    }

    /// Advance one display frame.
    ///
    /// `frame_ms` is the monotonic frame timestamp used for motion, `wall_ms`
    /// the wall clock used for the score. Returns the run summary on the frame
    /// the run ends.
    pub fn update(&mut self, frame_ms: f64, wall_ms: f64) -> Option<RunOutcome> {
        if !self.state.is_playing() {
            return None;
        }

        let elapsed = self.last_frame.map_or(0.0, |prev| frame_ms - prev);
        self.last_frame = Some(frame_ms);

        let report = advance(&mut self.state, elapsed, &mut self.rng, &mut self.feedback);
        self.state.score = self.state.elapsed_seconds(wall_ms);

        if report.corner_hit {
            return Some(self.finish(wall_ms));
        }
        None
    }

    fn finish(&mut self, wall_ms: f64) -> RunOutcome {
        self.feedback.emit(Cue::GameOver);
        self.state.status = GameStatus::GameOver;

        let score = self.state.score;
        let mut outcome = self.player.apply_run(score, self.taps, wall_ms);
        self.storage.save_player(&self.player);

        outcome.rank = self.storage.save_score(ScoreRecord {
            id: new_record_id(&mut self.rng),
            score,
            date: wall_ms,
            level: self.player.level,
        });

        if !outcome.unlocked.is_empty() {
            self.feedback.emit(Cue::Achievement);
        }

        log::info!(
            "Game over: {}s, {} taps, +{} exp{}",
            score,
            self.taps,
            outcome.exp_gained,
            if outcome.leveled_up { ", level up" } else { "" }
        );
        for id in &outcome.unlocked {
            log::info!("Achievement unlocked: {}", id.name());
        }

        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Read-modify-write of the stored player
    pub fn update_player(&mut self, change: impl FnOnce(&mut Player)) {
        let mut player = self.storage.player(&mut self.rng);
        change(&mut player);
        self.storage.save_player(&player);
        self.player = player;
    }

    pub fn select_avatar(&mut self, avatar: u32) {
        self.update_player(|p| p.avatar = crate::progression::avatar(avatar).id);
    }
}
