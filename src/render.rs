// render.rs - Paint the particle store onto a surface
//
// Frame layout:
//   1. translucent overlay (motion trails, never a full clear)
//   2. background stars, unculled
//   3. particles back to front, one paint rule per category
//
// There is no depth buffer. Order comes from a z-descending index sort that
// is rebuilt every frame, so overlap is resolved by painting far first.

use crate::error::Result;
use crate::palette::Color;
use crate::rng::SceneRng;
use crate::settings::SceneSettings;
use crate::sim::{Category, Particle, ParticleStore, Star};
use crate::surface::Surface;
use crate::world::{DepthCue, Projected, SceneMetrics, project, project_unculled, screen_center};

pub const TRAIL_FADE: Color = Color::rgba(2.0, 6.0, 23.0, 0.2);

// Per-frame sparkle draw must exceed this (about 2% of disks)
const SPARKLE_THRESHOLD: f32 = 0.98;
const STAR_GLOW: f32 = 4.0;
const HAZE_SCALE: f32 = 3.0;
const DIAMOND_SCALE: f32 = 1.5;

pub struct Compositor {
    order: Vec<usize>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self { order: Vec::new() }
    }

    /// Indices into the particle list, back to front, from the last frame
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn frame<S: Surface>(
        &mut self,
        surface: &mut S,
        store: &ParticleStore,
        m: &SceneMetrics,
        settings: &SceneSettings,
        now: f64,
        rng: &mut SceneRng,
    ) -> Result<()> {
        surface.fill_rect(0.0, 0.0, surface.width(), surface.height(), TRAIL_FADE);

        let center = screen_center(m.width, m.height);
        self.paint_stars(surface, &store.stars, center, now)?;

        self.sort(&store.particles);

        let pulse = ((now * 0.002).sin() * 0.2 + 0.9) as f32;
        for &i in &self.order {
            let p = &store.particles[i];
            let Some(at) = project(p.x, p.y_offset, p.z, center) else {
                continue;
            };
            let cue = DepthCue::at(p.z);

            match p.category {
                Category::Ornament => paint_diamond(surface, p, at, cue, settings.glow_intensity),
                _ => paint_disk(surface, p, at, cue, settings.glow_intensity, pulse, rng)?,
            }

            surface.set_glow(0.0, Color::TRANSPARENT);
            surface.set_alpha(1.0);
        }
        Ok(())
    }

    fn sort(&mut self, particles: &[Particle]) {
        self.order.clear();
        self.order.extend(0..particles.len());
        // Stable: equal depths keep generation order
        self.order.sort_by(|&a, &b| particles[b].z.total_cmp(&particles[a].z));
    }

    fn paint_stars<S: Surface>(
        &self,
        surface: &mut S,
        stars: &[Star],
        center: (f32, f32),
        now: f64,
    ) -> Result<()> {
        for (i, s) in stars.iter().enumerate() {
            let at = project_unculled(s.x, s.y, s.z, center);
            let mut radius = s.radius * at.scale;

            if i % 3 == 0 {
                let v = (now * 0.002 + s.phase as f64).sin() as f32;
                radius *= 1.05 + 0.25 * v;
                surface.set_alpha(0.75 + 0.25 * v);
            }
            if at.scale < 0.5 {
                surface.set_glow(STAR_GLOW, s.color);
            }

            surface.set_fill(s.color);
            surface.begin_path();
            surface.arc(at.x, at.y, radius.max(0.0))?;
            surface.fill();

            surface.set_alpha(1.0);
            surface.set_glow(0.0, Color::TRANSPARENT);
        }
        Ok(())
    }
}

fn paint_diamond<S: Surface>(surface: &mut S, p: &Particle, at: Projected, cue: DepthCue, glow: f32) {
    let half = p.radius * at.scale * DIAMOND_SCALE;

    surface.set_glow((glow + cue.blur * 10.0) * at.scale * DIAMOND_SCALE, p.color);
    surface.set_alpha(cue.dof_alpha);
    surface.set_fill(p.color);

    surface.begin_path();
    surface.move_to(at.x, at.y - half);
    surface.line_to(at.x + half, at.y);
    surface.line_to(at.x, at.y + half);
    surface.line_to(at.x - half, at.y);
    surface.close_path();
    surface.fill();
}

/// Base, topper and tree: a bokeh disk that widens with defocus.
fn paint_disk<S: Surface>(
    surface: &mut S,
    p: &Particle,
    at: Projected,
    cue: DepthCue,
    glow: f32,
    pulse: f32,
    rng: &mut SceneRng,
) -> Result<()> {
    let radius = p.radius * at.scale * (1.0 + cue.blur * 0.5);

    let (alpha, g) = match p.category {
        Category::Base => {
            surface.set_glow(0.0, Color::TRANSPARENT);
            surface.set_alpha(1.0);
            surface.set_fill(Color::rgba(0.0, 0.0, 0.0, 0.05 * cue.dist_alpha));
            surface.begin_path();
            // Haze ignores defocus widening
            surface.arc(at.x, at.y, p.radius * at.scale * HAZE_SCALE)?;
            surface.fill();
            surface.begin_path();

            (cue.dist_alpha * 0.7 * cue.dof_alpha, glow * 0.8)
        }
        Category::Topper => (1.0, glow * 1.2),
        _ => (cue.dist_alpha * cue.dof_alpha, glow * pulse),
    };

    if rng.next_f32() > SPARKLE_THRESHOLD {
        surface.set_fill(Color::WHITE);
        surface.set_glow(g * 2.0, Color::WHITE);
        surface.set_alpha(1.0);
    } else {
        surface.set_fill(p.color);
        surface.set_glow((g + cue.blur * 5.0) * at.scale, p.color);
        surface.set_alpha(alpha);
    }

    surface.begin_path();
    surface.arc(at.x, at.y, radius)?;
    surface.fill();

    if let Some(occ) = p.occlusion.filter(|&o| o > 0.0) {
        surface.set_glow(0.0, Color::TRANSPARENT);
        surface.set_fill(Color::rgba(0.0, 0.0, 0.0, occ));
        surface.fill();
    }
    Ok(())
}
