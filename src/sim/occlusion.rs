// occlusion.rs - Baked ambient occlusion for the galaxy base
//
// Neighbor density in the local x/z plane darkens crowded spiral arms.
// O(n²) over base particles; runs once per generation, never per frame.
// At the 9000-particle cap that is 2700² distance checks.

use super::{Category, Particle};

pub const OCCLUSION_RADIUS: f32 = 25.0;
pub const NEIGHBORS_PER_STEP: f32 = 12.0;
pub const MAX_OCCLUSION: f32 = 0.6;

/// Map a neighbor count to a darkening factor in [0, MAX_OCCLUSION].
#[inline]
pub fn occlusion_factor(neighbors: usize) -> f32 {
    (neighbors as f32 / NEIGHBORS_PER_STEP).min(MAX_OCCLUSION)
}

/// For each point, how many other points lie strictly within the radius.
pub fn neighbor_counts(points: &[(f32, f32)]) -> Vec<usize> {
    let r2 = OCCLUSION_RADIUS * OCCLUSION_RADIUS;
    let mut counts = vec![0usize; points.len()];

    for i in 0..points.len() {
        let (xi, zi) = points[i];
        for j in (i + 1)..points.len() {
            let dx = xi - points[j].0;
            let dz = zi - points[j].1;
            if dx * dx + dz * dz < r2 {
                counts[i] += 1;
                counts[j] += 1;
            }
        }
    }

    counts
}

/// Assign occlusion to every base particle from its local position.
pub fn bake(particles: &mut [Particle]) {
    let points: Vec<(f32, f32)> = particles
        .iter()
        .filter(|p| p.category == Category::Base)
        .map(|p| (p.original_x, p.original_z))
        .collect();

    let counts = neighbor_counts(&points);

    let bases = particles.iter_mut().filter(|p| p.category == Category::Base);
    for (p, n) in bases.zip(counts) {
        p.occlusion = Some(occlusion_factor(n));
    }
}
