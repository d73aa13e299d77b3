// ============================================================================
// TREE ENGINE - Particle Christmas tree with depth sort and depth-of-field
// ============================================================================
//
// Pipeline per frame: animate (sim::animate) -> project (world::projection)
// -> sort and paint (render). Everything draws through surface::Surface, so
// the same scene runs on a browser canvas or the CPU rasterizer.

pub mod error;
pub mod palette;
pub mod render;
pub mod rng;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod surface;
pub mod world;

#[cfg(target_arch = "wasm32")]
mod driver;

#[cfg(target_arch = "wasm32")]
pub use driver::{SceneHandle, SnowHandle, start_scene, start_snowfall};

pub use error::{Result, SceneError};
pub use render::Compositor;
pub use settings::{SceneSettings, TreeColor};
pub use sim::{Layer, Snowfield, TreeWorld};
pub use surface::{RasterSurface, Surface};
