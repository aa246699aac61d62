//! Rendering
//!
//! `scene` turns game state into a drawable description; `sdf_pipeline`
//! draws it with WebGPU using signed distance fields in the fragment shader.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::{Palette, Scene, box_rgba, client_to_surface, letterbox};
pub use sdf_pipeline::SdfRenderState;
