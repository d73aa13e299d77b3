// metrics.rs - Tree dimensions derived from the canvas size
//
// Generation and rendering must agree on these, so both go through
// SceneMetrics::new rather than recomputing the formulas.

/// Smallest canvas side we will size the tree from.
const MIN_SIDE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneMetrics {
    pub width: f32,
    pub height: f32,
    pub tree_height: f32,
    pub max_tree_radius: f32,
    pub tree_bottom_y: f32,
    pub tree_top_y: f32,
}

impl SceneMetrics {
    pub fn new(width: f32, height: f32) -> Self {
        let width = sanitize(width);
        let height = sanitize(height);

        let tree_height = width.min(height) * 0.95;
        let max_tree_radius = tree_height * 0.9;
        let tree_bottom_y = tree_height / 2.0 + 60.0;
        let tree_top_y = tree_bottom_y - tree_height;

        Self {
            width,
            height,
            tree_height,
            max_tree_radius,
            tree_bottom_y,
            tree_top_y,
        }
    }

    /// Ornaments below this line are recycled to the top
    #[inline]
    pub fn ornament_floor(&self) -> f32 {
        self.tree_bottom_y + 20.0
    }

    /// Where recycled ornaments re-enter
    #[inline]
    pub fn ornament_ceiling(&self) -> f32 {
        self.tree_top_y - 20.0
    }
}

#[inline]
fn sanitize(side: f32) -> f32 {
    if side.is_finite() { side.max(MIN_SIDE) } else { MIN_SIDE }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_canvas() {
        let m = SceneMetrics::new(800.0, 600.0);
        assert!((m.tree_height - 570.0).abs() < 1e-3);
        assert!((m.max_tree_radius - 513.0).abs() < 1e-3);
        assert!((m.tree_bottom_y - 345.0).abs() < 1e-3);
        assert!((m.tree_top_y - -225.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_sizes_stay_finite() {
        for (w, h) in [(0.0, 0.0), (-5.0, 300.0), (f32::NAN, 10.0), (f32::INFINITY, 1.0)] {
            let m = SceneMetrics::new(w, h);
            assert!(m.tree_height > 0.0);
            assert!(m.max_tree_radius > 0.0);
            assert!(m.tree_top_y.is_finite() && m.tree_bottom_y.is_finite());
        }
    }
}
