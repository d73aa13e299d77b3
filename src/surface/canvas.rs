// canvas.rs - Browser 2D context backend

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use crate::error::{Result, SceneError};
use crate::palette::Color;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| SceneError::SurfaceUnavailable)?
            .ok_or(SceneError::SurfaceUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SceneError::SurfaceUnavailable)?;

        Ok(Self {
            canvas: canvas.clone(),
            ctx,
        })
    }

    /// Match the backing store to a new size (clears the canvas)
    pub fn set_size(&self, w: u32, h: u32) {
        self.canvas.set_width(w);
        self.canvas.set_height(h);
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.set_fill(color);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn arc(&mut self, x: f32, y: f32, r: f32) -> Result<()> {
        self.ctx
            .arc(x as f64, y as f64, r as f64, 0.0, TAU)
            .map_err(|e| SceneError::Draw(format!("{e:?}")))
    }

    fn set_fill(&mut self, color: Color) {
        #[allow(deprecated)]
        self.ctx.set_fill_style(&JsValue::from_str(&color.css()));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn set_glow(&mut self, blur: f32, color: Color) {
        self.ctx.set_shadow_blur(blur.max(0.0) as f64);
        self.ctx.set_shadow_color(&color.css());
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }
}
