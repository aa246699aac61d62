//! What to draw, independent of the GPU
//!
//! A [`Scene`] is a pure function of the game state and theme. The pipeline
//! only uploads it; everything testable about rendering lives here.

use glam::Vec2;

use crate::consts::*;
use crate::settings::Theme;
use crate::sim::{BoxColor, GameState, GameStatus, danger_mask, surface_bounds};

/// Linear-ish RGBA in 0..1
pub type Rgba = [f32; 4];

const fn hex(rgb: u32, alpha: f32) -> Rgba {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

pub fn box_rgba(color: BoxColor) -> Rgba {
    match color {
        BoxColor::Red => hex(0xdc2626, 1.0),
        BoxColor::Yellow => hex(0xfbbf24, 1.0),
        BoxColor::Green => hex(0x16a34a, 1.0),
        BoxColor::Blue => hex(0x2563eb, 1.0),
    }
}

/// Theme colors. The page colors fill the letterbox around the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub page_primary: Rgba,
    pub page_secondary: Rgba,
    /// Surface gradient edge and middle
    pub surface_edge: Rgba,
    pub surface_mid: Rgba,
    pub zone_idle: Rgba,
    pub zone_hot: Rgba,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        let (page_primary, page_secondary) = match theme {
            Theme::Retro => (hex(0xd6c7a8, 1.0), hex(0xe8dcc5, 1.0)),
            Theme::Light | Theme::Dark => (hex(0xfef3c7, 1.0), hex(0xfefce8, 1.0)),
        };
        Self {
            page_primary,
            page_secondary,
            surface_edge: hex(0xd6c7a8, 1.0),
            surface_mid: hex(0xb8a88a, 1.0),
            zone_idle: [80.0 / 255.0, 70.0 / 255.0, 60.0 / 255.0, 0.08],
            zone_hot: [153.0 / 255.0, 27.0 / 255.0, 27.0 / 255.0, 0.25],
        }
    }
}

/// One frame's drawable content in surface units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub surface: Vec2,
    pub box_min: Vec2,
    pub box_size: f32,
    pub box_color: Rgba,
    pub danger_radius: f32,
    /// Zones containing the box center, in corner order TL, TR, BR, BL
    pub danger_mask: [bool; 4],
    pub status: GameStatus,
    pub palette: Palette,
}

impl Scene {
    pub fn from_state(state: &GameState, theme: Theme) -> Self {
        let b = &state.game_box;
        Self {
            surface: surface_bounds(),
            box_min: b.pos,
            box_size: b.size,
            box_color: box_rgba(b.color),
            danger_radius: CORNER_DANGER_ZONE,
            danger_mask: danger_mask(b.center(), surface_bounds(), CORNER_DANGER_ZONE),
            status: state.status,
            palette: Palette::for_theme(theme),
        }
    }

    pub fn danger_bits(&self) -> u32 {
        self.danger_mask
            .iter()
            .enumerate()
            .fold(0, |bits, (i, hot)| bits | (u32::from(*hot) << i))
    }
}

/// Map a point relative to the canvas' client rect into surface units
pub fn client_to_surface(offset: Vec2, client_size: Vec2) -> Option<Vec2> {
    if client_size.x <= 0.0 || client_size.y <= 0.0 {
        return None;
    }
    Some(offset * surface_bounds() / client_size)
}

/// Largest centered rectangle with the surface aspect ratio inside `viewport`.
/// Returns (origin, size) in viewport pixels
pub fn letterbox(viewport: Vec2) -> (Vec2, Vec2) {
    let scale = (viewport / surface_bounds()).min_element();
    let size = surface_bounds() * scale;
    ((viewport - size) / 2.0, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_idle_scene_has_no_hot_zone() {
        let scene = Scene::from_state(&GameState::idle(), Theme::Dark);
        assert_eq!(scene.danger_bits(), 0);
        assert_eq!(scene.box_color, box_rgba(BoxColor::Red));
        assert_eq!(scene.box_min, Vec2::new(300.0, 225.0));
    }

    #[test]
    fn test_zone_highlight_follows_box_center() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = GameState::playing(0.0, &mut rng);
        // Center at (575, 430), inside the bottom-right zone
        state.game_box.pos = Vec2::new(555.0, 410.0);
        let scene = Scene::from_state(&state, Theme::Light);
        assert_eq!(scene.danger_mask, [false, false, true, false]);
        assert_eq!(scene.danger_bits(), 0b0100);
    }

    #[test]
    fn test_client_scaling() {
        let p = client_to_surface(Vec2::new(150.0, 112.5), Vec2::new(300.0, 225.0));
        assert_eq!(p, Some(Vec2::new(300.0, 225.0)));
        assert_eq!(client_to_surface(Vec2::ONE, Vec2::ZERO), None);
    }

    #[test]
    fn test_letterbox_keeps_aspect() {
        let (origin, size) = letterbox(Vec2::new(1200.0, 600.0));
        assert_eq!(size, Vec2::new(800.0, 600.0));
        assert_eq!(origin, Vec2::new(200.0, 0.0));
    }

    #[test]
    fn test_retro_palette_differs() {
        assert_ne!(
            Palette::for_theme(Theme::Retro).page_primary,
            Palette::for_theme(Theme::Dark).page_primary
        );
        assert_eq!(
            Palette::for_theme(Theme::Light),
            Palette::for_theme(Theme::Dark)
        );
    }

    #[test]
    fn test_hex_channels() {
        assert_eq!(box_rgba(BoxColor::Red)[0], 220.0 / 255.0);
        assert_eq!(box_rgba(BoxColor::Blue)[3], 1.0);
    }
}
