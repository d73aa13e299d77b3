// surface/ - 2D drawing boundary
//
// The compositor only needs a canvas-2D-like subset: rect fills, simple
// paths, a fill style, global alpha and a glow (shadow blur). Backends:
//   canvas.rs - browser CanvasRenderingContext2d (wasm32)
//   raster.rs - CPU rasterizer for headless renders and tests

#[cfg(target_arch = "wasm32")]
mod canvas;
mod raster;

#[cfg(test)]
pub(crate) mod record;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use raster::RasterSurface;

use crate::error::Result;
use crate::palette::Color;

pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Reset every pixel to transparent
    fn clear(&mut self);

    /// Fill a rectangle, ignoring the current path
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);

    /// Add a full circle to the current path
    fn arc(&mut self, x: f32, y: f32, r: f32) -> Result<()>;

    fn set_fill(&mut self, color: Color);
    fn set_alpha(&mut self, alpha: f32);

    /// Glow applied to subsequent fills; blur <= 0 disables it
    fn set_glow(&mut self, blur: f32, color: Color);

    /// Fill the current path with the current style
    fn fill(&mut self);
}
