// geometry.rs - Procedural particle populations
//
// Builds the whole store from (settings, canvas metrics). Called at start,
// on resize and when the density setting changes; the caller throws the
// previous store away.

use std::f32::consts::{PI, TAU};

use super::occlusion;
use super::{Category, Particle, ParticleStore, Star};
use crate::palette::{particle_color, star_color};
use crate::rng::SceneRng;
use crate::scene::Counts;
use crate::settings::SceneSettings;
use crate::world::SceneMetrics;

// Tree body
const TREE_LAYERS: f32 = 16.0;
const GOLDEN_ANGLE: f32 = 2.39996;
const TIP_TAPER: f32 = 0.92;
const SURFACE_SHARE: f32 = 0.8;
const DROOP: f32 = 45.0;

// Galaxy base
const ARM_COUNT: usize = 3;
const SPIRAL_TURNS: f32 = 8.0 * PI;

// Heart topper
const HEART_SIZE: f32 = 5.5;
const HEART_LIFT: f32 = 15.0;

/// Build a fresh store and bake base occlusion.
pub fn build(settings: &SceneSettings, m: &SceneMetrics, rng: &mut SceneRng) -> ParticleStore {
    let counts = Counts::for_density(settings.particle_count);
    let mut particles = Vec::with_capacity(counts.particles());

    particles.extend(tree_body(counts.tree, settings, m, rng).into_iter().map(|s| s.particle));
    particles.extend(galaxy_base(counts.base, settings, m, rng));
    particles.extend(heart_topper(counts.topper, settings, m, rng));
    particles.extend(ornaments(counts.ornament, settings, m, rng));

    occlusion::bake(&mut particles);

    ParticleStore {
        particles,
        stars: stars(counts.star, m, rng),
    }
}

/// A tree particle together with the radial bound of its height band.
#[derive(Debug, Clone)]
pub struct TreeSample {
    pub particle: Particle,
    pub max_r: f32,
}

/// Layered, lobed cone. Density is biased toward the base, most particles
/// sit near the branch tips and the tips droop.
pub fn tree_body(n: usize, settings: &SceneSettings, m: &SceneMetrics, rng: &mut SceneRng) -> Vec<TreeSample> {
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let t = i as f32 / n as f32;
        let h = t.powf(0.8);
        let y_base = m.tree_bottom_y - h * m.tree_height;

        let envelope = m.max_tree_radius * (1.0 - h * TIP_TAPER);
        let layer = 0.75 + 0.25 * (h * TREE_LAYERS * TAU).sin();

        let angle = i as f32 * GOLDEN_ANGLE + h * TAU;
        let lobes = 4.0 + ((1.0 - h) * 4.0).floor();
        let radial = 0.85 + 0.15 * (angle * lobes + h * 5.0).cos() + rng.jitter(0.05);

        let max_r = envelope * layer * radial;

        let r_scale = if rng.next_f32() < SURFACE_SHARE {
            0.75 + 0.25 * rng.next_f32().sqrt()
        } else {
            rng.next_f32() * 0.75
        };
        let r = max_r * r_scale;

        let x = angle.cos() * r;
        let z = angle.sin() * r;
        let droop = (r / m.max_tree_radius) * DROOP;
        let y = y_base + droop + rng.jitter(4.0);

        let radius = rng.range(0.8, 2.8);
        let color = particle_color(Category::Tree, settings.tree_color, rng);

        out.push(TreeSample {
            particle: Particle::new(Category::Tree, x, y, z, radius, color).with_orbit(r, angle),
            max_r,
        });
    }

    out
}

/// Three-armed spiral floor just under the tree.
pub fn galaxy_base(n: usize, settings: &SceneSettings, m: &SceneMetrics, rng: &mut SceneRng) -> Vec<Particle> {
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let t = i as f32 / n as f32;
        let theta = t * SPIRAL_TURNS;
        let arm_offset = (i % ARM_COUNT) as f32 * (TAU / ARM_COUNT as f32);

        let spiral_r = m.max_tree_radius * 0.4 + t * m.width * 0.8;
        let arm_width = 20.0 + t * 100.0;
        let r = spiral_r + (rng.next_f32() - 0.5) * arm_width;

        let a = theta + arm_offset;
        let x = a.cos() * r;
        let z = a.sin() * r;
        let y = m.tree_bottom_y + 25.0 + rng.next_f32() * 4.0;

        let radius = rng.range(1.0, 3.0);
        let color = particle_color(Category::Base, settings.tree_color, rng);

        out.push(
            Particle::new(Category::Base, x, y, z, radius, color)
                .with_orbit(x.hypot(z), z.atan2(x))
                .with_speed(rng.range(0.0001, 0.0003)),
        );
    }

    out
}

/// Parametric heart, denser toward its center, floating above the tip.
pub fn heart_topper(n: usize, settings: &SceneSettings, m: &SceneMetrics, rng: &mut SceneRng) -> Vec<Particle> {
    let heart_y = m.tree_top_y - HEART_LIFT;
    let mut out = Vec::with_capacity(n);

    for _ in 0..n {
        let t = rng.angle();
        let s = rng.next_f32().powf(0.3);

        let hx = 16.0 * t.sin().powi(3);
        let hy = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
        let hz = rng.jitter(3.0);

        let x = hx * HEART_SIZE * s;
        let y = heart_y + hy * HEART_SIZE * s;
        let z = hz * s;

        let radius = rng.range(1.0, 3.0);
        let color = particle_color(Category::Topper, settings.tree_color, rng);

        out.push(Particle::new(Category::Topper, x, y, z, radius, color));
    }

    out
}

/// Ornaments start anywhere inside the tree's span and fall through it.
pub fn ornaments(n: usize, settings: &SceneSettings, m: &SceneMetrics, rng: &mut SceneRng) -> Vec<Particle> {
    let mut out = Vec::with_capacity(n);

    for _ in 0..n {
        let r = rng.next_f32() * m.max_tree_radius * 0.9;
        let angle = rng.angle();
        let x = angle.cos() * r;
        let z = angle.sin() * r;
        let y = m.tree_top_y + rng.next_f32() * m.tree_height;

        let radius = rng.range(1.0, 2.5);
        let color = particle_color(Category::Ornament, settings.tree_color, rng);

        out.push(
            Particle::new(Category::Ornament, x, y, z, radius, color)
                .with_orbit(r, angle)
                .with_speed(rng.range(0.3, 0.7)),
        );
    }

    out
}

/// Far-field stars scattered over 2.5x the canvas.
pub fn stars(n: usize, m: &SceneMetrics, rng: &mut SceneRng) -> Vec<Star> {
    let spread_x = m.width * 2.5;
    let spread_y = m.height * 2.5;

    (0..n)
        .map(|_| Star {
            x: (rng.next_f32() - 0.5) * spread_x,
            y: (rng.next_f32() - 0.5) * spread_y,
            z: rng.range(1000.0, 3000.0),
            radius: rng.range(0.5, 2.0),
            color: star_color(rng),
            speed: rng.jitter(0.05),
            phase: rng.angle(),
        })
        .collect()
}
