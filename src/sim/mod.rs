//! Box simulation
//!
//! All gameplay physics lives here:
//! - Variable timestep scaled to a 16 ms reference frame
//! - Randomness only through the caller's generator
//! - Feedback only through the caller's sink
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{WallHits, corners, danger_mask, in_corner_zone, resolve_walls};
pub use state::{BoxColor, GameBox, GameState, GameStatus};
pub use tick::{FrameReport, advance, redirect, surface_bounds};
