// sim/ - Tree scene simulation
//
// Records in particle.rs, creation in geometry.rs, motion in animate.rs,
// baked shading in occlusion.rs. TreeWorld ties them to a canvas size and
// a settings snapshot; Snowfield is the independent overlay.

pub mod animate;
pub mod geometry;
pub mod occlusion;
mod particle;
mod snow;

pub use particle::{Category, Particle, ParticleStore, Star};
pub use snow::{Flake, Snowfield};

use crate::error::Result;
use crate::palette::particle_color;
use crate::render::Compositor;
use crate::rng::SceneRng;
use crate::settings::SceneSettings;
use crate::surface::Surface;
use crate::world::SceneMetrics;

/// One animated layer bound to a surface. The driver owns one loop per layer.
pub trait Layer {
    fn name(&self) -> &'static str;

    /// Rebuild for a new surface size
    fn resize(&mut self, w: f32, h: f32);

    /// Advance and paint one frame at wall-clock time `now` (ms)
    fn tick<S: Surface>(&mut self, surface: &mut S, now: f64) -> Result<()>;
}

/// Tree scene world
pub struct TreeWorld {
    metrics: SceneMetrics,
    settings: SceneSettings,

    store: ParticleStore,

    // Accumulated rotation about the trunk (radians)
    rotation: f32,

    compositor: Compositor,
    rng: SceneRng,
    frame: u64,
}

impl TreeWorld {
    pub fn new(w: f32, h: f32, settings: SceneSettings, seed: u32) -> Self {
        let mut world = Self {
            metrics: SceneMetrics::new(w, h),
            settings,
            store: ParticleStore::default(),
            rotation: 0.0,
            compositor: Compositor::new(),
            rng: SceneRng::new(seed),
            frame: 0,
        };
        world.rebuild();
        world
    }

    /// Throw the store away and generate a new one for the current size.
    fn rebuild(&mut self) {
        self.store = geometry::build(&self.settings, &self.metrics, &mut self.rng);
        log::debug!(
            "rebuilt tree store: {} particles, {} stars at {}x{}",
            self.store.particles.len(),
            self.store.stars.len(),
            self.metrics.width,
            self.metrics.height
        );
    }

    /// Swap in new settings. Density changes rebuild the store, color changes
    /// recolor in place, everything else applies on the next frame.
    /// Returns true when the store was rebuilt.
    pub fn apply_settings(&mut self, next: SceneSettings) -> bool {
        let prev = std::mem::replace(&mut self.settings, next);

        if prev.needs_rebuild(&next) {
            log::info!("particle count {} -> {}, rebuilding", prev.particle_count, next.particle_count);
            self.rebuild();
            return true;
        }

        if prev.tree_color != next.tree_color {
            self.recolor();
        }
        false
    }

    fn recolor(&mut self) {
        let mode = self.settings.tree_color;
        for p in self.store.particles.iter_mut() {
            p.color = particle_color(p.category, mode, &mut self.rng);
        }
    }

    /// Advance the simulation to `now` without painting.
    pub fn step(&mut self, now: f64) {
        self.rotation += self.settings.rotation_speed;
        animate::step_stars(&mut self.store.stars, self.metrics.width);
        animate::step_particles(
            &mut self.store.particles,
            &self.metrics,
            self.rotation,
            now,
            &mut self.rng,
        );
        self.frame += 1;
    }

    pub fn paint<S: Surface>(&mut self, surface: &mut S, now: f64) -> Result<()> {
        self.compositor.frame(
            surface,
            &self.store,
            &self.metrics,
            &self.settings,
            now,
            &mut self.rng,
        )
    }

    pub fn particles(&self) -> &[Particle] {
        &self.store.particles
    }

    pub fn stars(&self) -> &[Star] {
        &self.store.stars
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn metrics(&self) -> &SceneMetrics {
        &self.metrics
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Back-to-front paint order from the last painted frame
    pub fn paint_order(&self) -> &[usize] {
        self.compositor.order()
    }
}

impl Layer for TreeWorld {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn resize(&mut self, w: f32, h: f32) {
        self.metrics = SceneMetrics::new(w, h);
        self.rebuild();
    }

    fn tick<S: Surface>(&mut self, surface: &mut S, now: f64) -> Result<()> {
        self.step(now);
        self.paint(surface, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Counts;
    use crate::settings::TreeColor;
    use crate::surface::record::RecordingSurface;

    fn settings(count: u32) -> SceneSettings {
        SceneSettings {
            particle_count: count,
            ..SceneSettings::default()
        }
    }

    fn assert_counts(world: &TreeWorld, counts: Counts) {
        let store = world.store();
        assert_eq!(store.count(Category::Tree), counts.tree);
        assert_eq!(store.count(Category::Base), counts.base);
        assert_eq!(store.count(Category::Topper), counts.topper);
        assert_eq!(store.count(Category::Ornament), counts.ornament);
        assert_eq!(store.stars.len(), counts.star);
    }

    #[test]
    fn resize_keeps_population_split() {
        let mut world = TreeWorld::new(800.0, 600.0, settings(2000), 7);
        assert_counts(&world, Counts::for_density(2000));

        world.resize(1920.0, 1080.0);
        assert_counts(&world, Counts::for_density(2000));
        assert_eq!(world.metrics().width, 1920.0);

        world.resize(0.0, 0.0);
        assert_counts(&world, Counts::for_density(2000));
    }

    #[test]
    fn density_change_rebuilds() {
        let mut world = TreeWorld::new(800.0, 600.0, settings(1000), 7);
        let rebuilt = world.apply_settings(settings(3000));
        assert!(rebuilt);
        assert_counts(&world, Counts::for_density(3000));
    }

    #[test]
    fn color_change_recolors_in_place() {
        let mut world = TreeWorld::new(800.0, 600.0, settings(1000), 7);
        let before: Vec<(f32, f32, f32)> = world.particles().iter().map(|p| (p.x, p.y, p.z)).collect();
        let old_first = world.particles()[0].color;

        let rebuilt = world.apply_settings(SceneSettings { tree_color: TreeColor::Green, ..settings(1000) });
        assert!(!rebuilt);
        assert_eq!(world.settings().tree_color, TreeColor::Green);

        let after: Vec<(f32, f32, f32)> = world.particles().iter().map(|p| (p.x, p.y, p.z)).collect();
        assert_eq!(before, after);
        assert_ne!(world.particles()[0].color, old_first);
        let tree_first = &world.particles()[0];
        assert!(tree_first.color.g > tree_first.color.r);
    }

    #[test]
    fn rotation_accumulates_per_frame() {
        let mut world = TreeWorld::new(400.0, 400.0, settings(500), 1);
        let mut surface = RecordingSurface::new(400.0, 400.0);
        for i in 0..10 {
            world.tick(&mut surface, i as f64 * 16.0).unwrap();
        }
        assert!((world.rotation() - 0.03).abs() < 1e-5);
        assert_eq!(world.frame(), 10);
    }

    #[test]
    fn occlusion_survives_animation() {
        let mut world = TreeWorld::new(800.0, 600.0, settings(1000), 3);
        let baked: Vec<Option<f32>> = world.particles().iter().map(|p| p.occlusion).collect();
        for i in 0..20 {
            world.step(i as f64 * 16.0);
        }
        let after: Vec<Option<f32>> = world.particles().iter().map(|p| p.occlusion).collect();
        assert_eq!(baked, after);
    }
}
