// particle.rs - Particle store records
//
// Plain data. Behavior lives in geometry.rs (creation), animate.rs (motion)
// and render.rs (paint). Category is fixed at creation and picks both the
// motion rule and the paint rule.

use crate::palette::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Tree,
    Base,
    Topper,
    Ornament,
}

#[derive(Debug, Clone)]
pub struct Particle {
    // Derived (rotated) position. Never the basis for the next rotation.
    pub x: f32,
    pub y: f32,
    pub z: f32,

    pub radius: f32,
    pub color: Color,

    // Authoritative local-space coordinates
    pub original_x: f32,
    pub original_z: f32,

    /// Vertical position after local animation; `y` is the baseline
    pub y_offset: f32,

    /// Orbital drift for base particles, fall rate for ornaments
    pub speed: f32,
    pub initial_angle: f32,
    pub orbit_radius: f32,

    pub category: Category,

    /// Precomputed darkening, base particles only
    pub occlusion: Option<f32>,
}

impl Particle {
    pub fn new(category: Category, x: f32, y: f32, z: f32, radius: f32, color: Color) -> Self {
        Self {
            x,
            y,
            z,
            radius,
            color,
            original_x: x,
            original_z: z,
            y_offset: y,
            speed: 0.0,
            initial_angle: 0.0,
            orbit_radius: 0.0,
            category,
            occlusion: None,
        }
    }

    pub fn with_orbit(mut self, orbit_radius: f32, initial_angle: f32) -> Self {
        self.orbit_radius = orbit_radius;
        self.initial_angle = initial_angle;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Distance of the local position from the trunk axis
    #[inline]
    pub fn local_radius(&self) -> f32 {
        self.original_x.hypot(self.original_z)
    }
}

/// Background star. Drifts sideways, twinkles, never rotates with the tree.
#[derive(Debug, Clone)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
    pub color: Color,
    pub speed: f32,
    pub phase: f32,
}

/// Everything one generation cycle produces. Rebuilt whole, never patched.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
}

impl ParticleStore {
    pub fn count(&self, category: Category) -> usize {
        self.particles.iter().filter(|p| p.category == category).count()
    }

    pub fn of(&self, category: Category) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(move |p| p.category == category)
    }
}
