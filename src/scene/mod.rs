// scene/ - Fixed population sizes
//
// Only the tree body and galaxy base scale with the particle-count setting.
// Topper, ornaments and stars are fixed so the scene reads the same at any
// density.

pub const TREE_SHARE: f64 = 0.65;
pub const BASE_SHARE: f64 = 0.30;

pub const TOPPER_COUNT: usize = 1200;
pub const ORNAMENT_COUNT: usize = 150;
pub const STAR_COUNT: usize = 150;
pub const SNOW_COUNT: usize = 600;

/// Per-category population sizes for one generation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub tree: usize,
    pub base: usize,
    pub topper: usize,
    pub ornament: usize,
    pub star: usize,
}

impl Counts {
    pub fn for_density(particle_count: u32) -> Self {
        Self {
            tree: (particle_count as f64 * TREE_SHARE) as usize,
            base: (particle_count as f64 * BASE_SHARE) as usize,
            topper: TOPPER_COUNT,
            ornament: ORNAMENT_COUNT,
            star: STAR_COUNT,
        }
    }

    /// Particles in the main store (stars live separately)
    pub fn particles(&self) -> usize {
        self.tree + self.base + self.topper + self.ornament
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_ratios() {
        let c = Counts::for_density(1000);
        assert_eq!((c.tree, c.base), (650, 300));
        assert_eq!((c.topper, c.ornament, c.star), (1200, 150, 150));
        assert_eq!(c.particles(), 650 + 300 + 1200 + 150);

        let c = Counts::for_density(9000);
        assert_eq!((c.tree, c.base), (5850, 2700));
    }
}
