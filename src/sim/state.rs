//! Game state and core simulation types

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Inert display state, nothing moves
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Run suspended, frames are ignored
    Paused,
    /// Run ended by a corner hit
    GameOver,
}

/// The four logo colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxColor {
    #[default]
    Red,
    Yellow,
    Green,
    Blue,
}

impl BoxColor {
    pub const ALL: [BoxColor; 4] = [
        BoxColor::Red,
        BoxColor::Yellow,
        BoxColor::Green,
        BoxColor::Blue,
    ];

    /// Pick one of the four colors uniformly
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoxColor::Red => "red",
            BoxColor::Yellow => "yellow",
            BoxColor::Green => "green",
            BoxColor::Blue => "blue",
        }
    }
}

/// The bouncing logo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameBox {
    /// Top-left corner in surface units
    pub pos: Vec2,
    pub size: f32,
    /// Units per reference frame
    pub vel: Vec2,
    pub color: BoxColor,
}

impl GameBox {
    /// Resting box shown while idle: centered on its top-left corner, fixed diagonal velocity
    pub fn resting() -> Self {
        Self {
            pos: Vec2::new(SURFACE_WIDTH / 2.0, SURFACE_HEIGHT / 2.0),
            size: BOX_SIZE,
            vel: Vec2::splat(INITIAL_SPEED),
            color: BoxColor::Red,
        }
    }

    /// Box for a fresh run: centered, random heading at initial speed, random color
    pub fn launch<R: Rng>(rng: &mut R) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        Self {
            pos: Vec2::new(
                (SURFACE_WIDTH - BOX_SIZE) / 2.0,
                (SURFACE_HEIGHT - BOX_SIZE) / 2.0,
            ),
            size: BOX_SIZE,
            vel: Vec2::from_angle(angle) * INITIAL_SPEED,
            color: BoxColor::random(rng),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Inclusive point-in-square test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.pos.x + self.size
            && point.y >= self.pos.y
            && point.y <= self.pos.y + self.size
    }
}

/// Complete state of the game screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    /// Whole seconds survived so far
    pub score: u32,
    /// Wall clock (ms) when the run started
    pub start_time: f64,
    #[serde(rename = "box")]
    pub game_box: GameBox,
}

impl Default for GameState {
    fn default() -> Self {
        Self::idle()
    }
}

impl GameState {
    pub fn idle() -> Self {
        Self {
            status: GameStatus::Idle,
            score: 0,
            start_time: 0.0,
            game_box: GameBox::resting(),
        }
    }

    /// Fresh playing state starting at `now_ms`
    pub fn playing<R: Rng>(now_ms: f64, rng: &mut R) -> Self {
        Self {
            status: GameStatus::Playing,
            score: 0,
            start_time: now_ms,
            game_box: GameBox::launch(rng),
        }
    }

    /// Whole seconds elapsed between run start and `now_ms`
    pub fn elapsed_seconds(&self, now_ms: f64) -> u32 {
        ((now_ms - self.start_time) / 1000.0).floor().max(0.0) as u32
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_launch_is_centered_at_initial_speed() {
        let mut rng = Pcg32::seed_from_u64(7);
        let b = GameBox::launch(&mut rng);
        assert_eq!(b.center(), Vec2::new(SURFACE_WIDTH / 2.0, SURFACE_HEIGHT / 2.0));
        assert!((b.speed() - INITIAL_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_resting_box_is_inert_layout() {
        let b = GameBox::resting();
        assert_eq!(b.pos, Vec2::new(300.0, 225.0));
        assert_eq!(b.vel, Vec2::new(3.0, 3.0));
        assert_eq!(b.color, BoxColor::Red);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let b = GameBox {
            pos: Vec2::new(100.0, 100.0),
            ..GameBox::resting()
        };
        assert!(b.contains(Vec2::new(100.0, 100.0)));
        assert!(b.contains(Vec2::new(140.0, 140.0)));
        assert!(!b.contains(Vec2::new(140.1, 120.0)));
        assert!(!b.contains(Vec2::new(99.9, 120.0)));
    }

    #[test]
    fn test_elapsed_seconds_floors() {
        let state = GameState {
            start_time: 1_000.0,
            ..GameState::idle()
        };
        assert_eq!(state.elapsed_seconds(1_999.0), 0);
        assert_eq!(state.elapsed_seconds(3_500.0), 2);
        assert_eq!(state.elapsed_seconds(500.0), 0);
    }

    #[test]
    fn test_random_color_covers_palette() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let c = BoxColor::random(&mut rng);
            seen[BoxColor::ALL.iter().position(|x| *x == c).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
