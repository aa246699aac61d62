//! Wall and corner collision for the axis-aligned box
//!
//! Walls reflect: the offending axis is clamped back onto the surface and its
//! velocity flips. Corners are lethal: entering any corner's danger circle
//! ends the run.

use glam::Vec2;

use super::state::GameBox;

/// Which axes hit a wall during one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub x: bool,
    pub y: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.x || self.y
    }

    /// Number of bounces this update produced (one per axis)
    pub fn count(&self) -> usize {
        self.x as usize + self.y as usize
    }
}

/// Resolve one axis: returns true and fixes position/velocity if the box left `[0, limit]`
fn resolve_axis(pos: &mut f32, vel: &mut f32, size: f32, limit: f32) -> bool {
    if *pos < 0.0 {
        *pos = 0.0;
    } else if *pos + size > limit {
        *pos = limit - size;
    } else {
        return false;
    }
    *vel = -*vel;
    true
}

/// Clamp the box back inside `bounds` and reflect each axis that crossed a wall
pub fn resolve_walls(b: &mut GameBox, bounds: Vec2) -> WallHits {
    WallHits {
        x: resolve_axis(&mut b.pos.x, &mut b.vel.x, b.size, bounds.x),
        y: resolve_axis(&mut b.pos.y, &mut b.vel.y, b.size, bounds.y),
    }
}

/// The four surface corners, clockwise from the origin
pub fn corners(bounds: Vec2) -> [Vec2; 4] {
    [
        Vec2::ZERO,
        Vec2::new(bounds.x, 0.0),
        bounds,
        Vec2::new(0.0, bounds.y),
    ]
}

/// Per-corner flag: is `point` strictly inside that corner's danger circle
pub fn danger_mask(point: Vec2, bounds: Vec2, radius: f32) -> [bool; 4] {
    corners(bounds).map(|c| point.distance(c) < radius)
}

/// True if the box center is inside any corner's danger circle
pub fn in_corner_zone(b: &GameBox, bounds: Vec2, radius: f32) -> bool {
    danger_mask(b.center(), bounds, radius).iter().any(|hit| *hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::BoxColor;

    fn bounds() -> Vec2 {
        Vec2::new(SURFACE_WIDTH, SURFACE_HEIGHT)
    }

    fn box_at(center: Vec2, vel: Vec2) -> GameBox {
        GameBox {
            pos: center - Vec2::splat(BOX_SIZE / 2.0),
            size: BOX_SIZE,
            vel,
            color: BoxColor::Red,
        }
    }

    #[test]
    fn test_corner_predicate_boundary() {
        // 50 * sqrt(2) ~= 70.7 away from the origin: safe
        let safe = box_at(Vec2::new(50.0, 50.0), Vec2::ZERO);
        assert!(!in_corner_zone(&safe, bounds(), CORNER_DANGER_ZONE));

        // ~14.1 away: hit
        let hit = box_at(Vec2::new(10.0, 10.0), Vec2::ZERO);
        assert!(in_corner_zone(&hit, bounds(), CORNER_DANGER_ZONE));
    }

    #[test]
    fn test_every_corner_is_dangerous() {
        for corner in corners(bounds()) {
            let toward_center = (bounds() / 2.0 - corner).normalize() * 30.0;
            let b = box_at(corner + toward_center, Vec2::ZERO);
            assert!(in_corner_zone(&b, bounds(), CORNER_DANGER_ZONE));
        }
    }

    #[test]
    fn test_danger_mask_marks_only_nearby_corner() {
        let mask = danger_mask(Vec2::new(590.0, 440.0), bounds(), CORNER_DANGER_ZONE);
        assert_eq!(mask, [false, false, true, false]);
    }

    #[test]
    fn test_left_wall_flips_x_only() {
        let mut b = box_at(Vec2::new(15.0, 200.0), Vec2::new(-3.0, 2.0));
        let hits = resolve_walls(&mut b, bounds());
        assert_eq!(hits, WallHits { x: true, y: false });
        assert_eq!(b.pos.x, 0.0);
        assert_eq!(b.vel, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn test_bottom_wall_clamps_to_trailing_edge() {
        let mut b = box_at(Vec2::new(300.0, 440.0), Vec2::new(1.0, 3.0));
        let hits = resolve_walls(&mut b, bounds());
        assert_eq!(hits, WallHits { x: false, y: true });
        assert_eq!(b.pos.y, SURFACE_HEIGHT - BOX_SIZE);
        assert_eq!(b.vel, Vec2::new(1.0, -3.0));
    }

    #[test]
    fn test_both_axes_in_one_update() {
        let mut b = box_at(Vec2::new(595.0, -5.0), Vec2::new(2.0, -2.0));
        let hits = resolve_walls(&mut b, bounds());
        assert_eq!(hits.count(), 2);
        assert_eq!(b.pos, Vec2::new(SURFACE_WIDTH - BOX_SIZE, 0.0));
        assert_eq!(b.vel, Vec2::new(-2.0, 2.0));
    }

    #[test]
    fn test_touching_wall_is_not_a_hit() {
        let mut b = box_at(Vec2::new(20.0, 200.0), Vec2::new(-3.0, 0.0));
        assert!(!resolve_walls(&mut b, bounds()).any());
        assert_eq!(b.vel.x, -3.0);
    }
}
