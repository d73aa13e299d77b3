// record.rs - Surface double that logs every call

use super::Surface;
use crate::error::{Result, SceneError};
use crate::palette::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear,
    FillRect(f32, f32, f32, f32, Color),
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    ClosePath,
    Arc(f32, f32, f32),
    SetFill(Color),
    SetAlpha(f32),
    SetGlow(f32, Color),
    Fill,
}

/// State captured at each fill, for asserting paint rules
#[derive(Debug, Clone, PartialEq)]
pub struct FillState {
    pub color: Color,
    pub alpha: f32,
    pub glow: f32,
    pub glow_color: Color,
    pub path: Vec<Op>,
}

pub struct RecordingSurface {
    w: f32,
    h: f32,
    pub ops: Vec<Op>,
    pub fill_states: Vec<FillState>,
    path: Vec<Op>,
    color: Color,
    alpha: f32,
    glow: f32,
    glow_color: Color,
}

impl RecordingSurface {
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            w,
            h,
            ops: Vec::new(),
            fill_states: Vec::new(),
            path: Vec::new(),
            color: Color::BLACK,
            alpha: 1.0,
            glow: 0.0,
            glow_color: Color::TRANSPARENT,
        }
    }

    pub fn fills(&self) -> usize {
        self.fill_states.len()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.w
    }

    fn height(&self) -> f32 {
        self.h
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ops.push(Op::FillRect(x, y, w, h, color));
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.ops.push(Op::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.push(Op::MoveTo(x, y));
        self.ops.push(Op::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.push(Op::LineTo(x, y));
        self.ops.push(Op::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.path.push(Op::ClosePath);
        self.ops.push(Op::ClosePath);
    }

    fn arc(&mut self, x: f32, y: f32, r: f32) -> Result<()> {
        if r < 0.0 {
            return Err(SceneError::Draw(format!("negative radius {r}")));
        }
        self.path.push(Op::Arc(x, y, r));
        self.ops.push(Op::Arc(x, y, r));
        Ok(())
    }

    fn set_fill(&mut self, color: Color) {
        self.color = color;
        self.ops.push(Op::SetFill(color));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
        self.ops.push(Op::SetAlpha(alpha));
    }

    fn set_glow(&mut self, blur: f32, color: Color) {
        self.glow = blur;
        self.glow_color = color;
        self.ops.push(Op::SetGlow(blur, color));
    }

    fn fill(&mut self) {
        self.fill_states.push(FillState {
            color: self.color,
            alpha: self.alpha,
            glow: self.glow,
            glow_color: self.glow_color,
            path: self.path.clone(),
        });
        self.ops.push(Op::Fill);
    }
}
