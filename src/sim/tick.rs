//! Variable-timestep frame advance
//!
//! Velocities are stored per reference frame (16 ms), so a frame of any
//! length scales motion by `elapsed / REFERENCE_FRAME_MS`.

use glam::Vec2;
use rand::Rng;

use super::collision::{WallHits, in_corner_zone, resolve_walls};
use super::state::{BoxColor, GameBox, GameState};
use crate::consts::*;
use crate::feedback::{Cue, FeedbackSink};

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub walls: WallHits,
    /// Box center entered a corner danger zone
    pub corner_hit: bool,
}

pub fn surface_bounds() -> Vec2 {
    Vec2::new(SURFACE_WIDTH, SURFACE_HEIGHT)
}

/// Advance the box by `elapsed_ms` and resolve collisions.
///
/// Does nothing unless the state is playing. Walls are resolved before the
/// corner check, so the box is always back on the surface when this returns.
pub fn advance<R: Rng>(
    state: &mut GameState,
    elapsed_ms: f64,
    rng: &mut R,
    fx: &mut dyn FeedbackSink,
) -> FrameReport {
    if !state.is_playing() {
        return FrameReport::default();
    }

    let b = &mut state.game_box;
    let scale = (elapsed_ms.max(0.0) / REFERENCE_FRAME_MS) as f32;
    b.pos += b.vel * scale;

    let walls = resolve_walls(b, surface_bounds());
    // One recolor per frame even if both axes bounced
    if walls.any() {
        b.color = BoxColor::random(rng);
    }
    for _ in 0..walls.count() {
        fx.emit(Cue::Bounce);
    }

    FrameReport {
        walls,
        corner_hit: in_corner_zone(b, surface_bounds(), CORNER_DANGER_ZONE),
    }
}

/// Point the box in a uniformly random direction, keeping its speed
pub fn redirect<R: Rng>(b: &mut GameBox, rng: &mut R) {
    let speed = b.speed();
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    b.vel = Vec2::from_angle(angle) * speed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameStatus;
    use proptest::prelude::*;
    use rand::{RngCore, SeedableRng};
    use rand_pcg::Pcg32;

    fn playing_with(pos: Vec2, vel: Vec2) -> GameState {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = GameState::playing(0.0, &mut rng);
        state.game_box.pos = pos;
        state.game_box.vel = vel;
        state
    }

    #[test]
    fn test_motion_scales_with_elapsed() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = playing_with(Vec2::new(200.0, 200.0), Vec2::new(3.0, -1.5));
        let mut cues: Vec<Cue> = Vec::new();

        advance(&mut state, 32.0, &mut rng, &mut cues);
        assert_eq!(state.game_box.pos, Vec2::new(206.0, 197.0));
        assert!(cues.is_empty());
    }

    #[test]
    fn test_zero_elapsed_is_baseline() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = playing_with(Vec2::new(200.0, 200.0), Vec2::new(3.0, 3.0));
        let report = advance(&mut state, 0.0, &mut rng, &mut Vec::<Cue>::new());
        assert_eq!(state.game_box.pos, Vec2::new(200.0, 200.0));
        assert_eq!(report, FrameReport::default());
    }

    #[test]
    fn test_not_playing_is_noop() {
        let mut rng = Pcg32::seed_from_u64(1);
        for status in [GameStatus::Idle, GameStatus::Paused, GameStatus::GameOver] {
            let mut state = playing_with(Vec2::new(200.0, 200.0), Vec2::new(3.0, 3.0));
            state.status = status;
            let before = state.game_box;
            advance(&mut state, 160.0, &mut rng, &mut Vec::<Cue>::new());
            assert_eq!(state.game_box, before);
        }
    }

    #[test]
    fn test_bounce_emits_cue_per_axis() {
        let mut rng = Pcg32::seed_from_u64(9);
        // Crosses the right and top walls in the same frame
        let mut state = playing_with(Vec2::new(558.0, 1.0), Vec2::new(3.0, -3.0));
        let mut cues: Vec<Cue> = Vec::new();

        let report = advance(&mut state, 16.0, &mut rng, &mut cues);
        assert_eq!(report.walls.count(), 2);
        assert_eq!(cues, vec![Cue::Bounce, Cue::Bounce]);
        assert_eq!(state.game_box.vel, Vec2::new(-3.0, 3.0));
    }

    #[test]
    fn test_double_bounce_recolors_once() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut expected = rng.clone();
        let mut state = playing_with(Vec2::new(558.0, 1.0), Vec2::new(3.0, -3.0));

        advance(&mut state, 16.0, &mut rng, &mut Vec::<Cue>::new());
        assert_eq!(state.game_box.color, BoxColor::random(&mut expected));
        // Exactly one color draw consumed from the generator
        assert_eq!(rng.next_u32(), expected.next_u32());
    }

    #[test]
    fn test_corner_hit_reported() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut state = playing_with(Vec2::new(5.0, 5.0), Vec2::new(-1.0, -1.0));
        let report = advance(&mut state, 16.0, &mut rng, &mut Vec::<Cue>::new());
        assert!(report.corner_hit);
    }

    #[test]
    fn test_redirect_keeps_speed() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut b = GameBox::launch(&mut rng);
        b.vel = Vec2::new(4.0, -2.5);
        let speed = b.speed();
        redirect(&mut b, &mut rng);
        assert!((b.speed() - speed).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_box_stays_on_surface(
            seed in any::<u64>(),
            frames in prop::collection::vec(0.0f64..120.0, 1..200),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = GameState::playing(0.0, &mut rng);
            // Faster than default so walls are hit often
            state.game_box.vel *= 8.0;
            for dt in frames {
                advance(&mut state, dt, &mut rng, &mut crate::feedback::NullFeedback);
                let b = state.game_box;
                prop_assert!(b.pos.x >= 0.0 && b.pos.x + b.size <= SURFACE_WIDTH);
                prop_assert!(b.pos.y >= 0.0 && b.pos.y + b.size <= SURFACE_HEIGHT);
            }
        }

        #[test]
        fn prop_wall_flips_only_colliding_axis(
            x in -30.0f32..0.0,
            y in 100.0f32..300.0,
            vx in -6.0f32..-0.1,
            vy in -6.0f32..6.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(5);
            let mut state = playing_with(Vec2::new(x, y), Vec2::new(vx, vy));
            advance(&mut state, 0.0, &mut rng, &mut crate::feedback::NullFeedback);
            prop_assert!(state.game_box.vel.x > 0.0);
            prop_assert_eq!(state.game_box.vel.y, vy);
        }

        #[test]
        fn prop_redirect_preserves_speed(seed in any::<u64>(), vx in -10.0f32..10.0, vy in -10.0f32..10.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut b = GameBox::resting();
            b.vel = Vec2::new(vx, vy);
            let speed = b.speed();
            redirect(&mut b, &mut rng);
            prop_assert!((b.speed() - speed).abs() <= 1e-4 * speed.max(1.0));
        }
    }
}
