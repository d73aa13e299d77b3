// snow.rs - Foreground snowfall
//
// Flat 2D flakes on their own surface, independent of the tree. Fully
// cleared every frame (no trails), unlike the tree layer.

use std::f32::consts::TAU;

use super::Layer;
use crate::error::Result;
use crate::palette::Color;
use crate::rng::SceneRng;
use crate::scene::SNOW_COUNT;
use crate::surface::Surface;

const PINK: Color = Color::rgba(255.0, 192.0, 203.0, 1.0);
const SWAY_STEP: f32 = 0.005;
const RESPAWN_Y: f32 = -10.0;
const EDGE: f32 = 5.0;

#[derive(Debug, Clone)]
pub struct Flake {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
    pub pink: bool,
    pub sway_offset: f32,
}

impl Flake {
    fn color(&self) -> Color {
        let base = if self.pink { PINK } else { Color::WHITE };
        base.with_alpha(self.alpha)
    }
}

pub struct Snowfield {
    w: f32,
    h: f32,
    angle: f32,
    flakes: Vec<Flake>,
    rng: SceneRng,
}

impl Snowfield {
    pub fn new(w: f32, h: f32, seed: u32) -> Self {
        let mut field = Self {
            w,
            h,
            angle: 0.0,
            flakes: Vec::with_capacity(SNOW_COUNT),
            rng: SceneRng::new(seed),
        };
        field.scatter();
        field
    }

    fn scatter(&mut self) {
        let rng = &mut self.rng;
        let (w, h) = (self.w.max(0.0), self.h.max(0.0));
        self.flakes.clear();
        self.flakes.extend((0..SNOW_COUNT).map(|_| Flake {
            pink: rng.next_f32() > 0.6,
            x: rng.next_f32() * w,
            y: rng.next_f32() * h,
            radius: rng.range(0.5, 3.0),
            alpha: rng.range(0.2, 0.8),
            sway_offset: rng.next_f32() * TAU,
        }));
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    /// Fall, sway, then recycle flakes that left the surface.
    pub fn step(&mut self) {
        self.angle += SWAY_STEP;

        for f in self.flakes.iter_mut() {
            f.y += f.radius * 0.3 + 0.4;
            f.x += (self.angle + f.sway_offset).sin() * 0.5;

            if f.y > self.h {
                f.x = self.rng.next_f32() * self.w;
                f.y = RESPAWN_Y;
                f.alpha = self.rng.range(0.2, 0.8);
            }

            if f.x > self.w + EDGE {
                f.x = -EDGE;
            }
            if f.x < -EDGE {
                f.x = self.w + EDGE;
            }
        }
    }

    pub fn paint<S: Surface>(&self, surface: &mut S) -> Result<()> {
        surface.clear();
        for f in &self.flakes {
            surface.set_fill(f.color());
            surface.begin_path();
            surface.arc(f.x, f.y, f.radius)?;
            surface.fill();
        }
        Ok(())
    }
}

impl Layer for Snowfield {
    fn name(&self) -> &'static str {
        "snow"
    }

    fn resize(&mut self, w: f32, h: f32) {
        self.w = w;
        self.h = h;
        self.scatter();
    }

    fn tick<S: Surface>(&mut self, surface: &mut S, _now: f64) -> Result<()> {
        // Draw then move, so a fresh field shows its scattered state first
        self.paint(surface)?;
        self.step();
        Ok(())
    }
}
