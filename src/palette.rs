// palette.rs - Colors and the per-category color policy
//
// Channels are kept as f32 (r/g/b in 0..=255, a in 0..=1) so the raster
// backend can blend without round-tripping through bytes.

use crate::rng::SceneRng;
use crate::settings::TreeColor;
use crate::sim::Category;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255.0, 255.0, 255.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Hue in degrees, saturation and lightness in percent
    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let h = h.rem_euclid(360.0) / 60.0;
        let s = (s / 100.0).clamp(0.0, 1.0);
        let l = (l / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self {
            r: (r + m) * 255.0,
            g: (g + m) * 255.0,
            b: (b + m) * 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    pub fn to_rgb(self) -> (u8, u8, u8) {
        (
            self.r.clamp(0.0, 255.0).round() as u8,
            self.g.clamp(0.0, 255.0).round() as u8,
            self.b.clamp(0.0, 255.0).round() as u8,
        )
    }

    /// CSS `rgba(..)` string for canvas styles
    pub fn css(&self) -> String {
        let (r, g, b) = self.to_rgb();
        format!("rgba({}, {}, {}, {})", r, g, b, self.a)
    }
}

// (hue, saturation %, lightness %)
const ORNAMENT_GOLD: (f32, f32, f32) = (45.0, 100.0, 70.0);
const TOPPER_PINK: (f32, f32, f32) = (340.0, 100.0, 95.0);

/// Resolve a particle color for its category under the given tree color.
pub fn particle_color(category: Category, mode: TreeColor, rng: &mut SceneRng) -> Color {
    if category == Category::Ornament {
        let (h, s, l) = if rng.next_f32() > 0.6 { ORNAMENT_GOLD } else { (0.0, 0.0, 100.0) };
        return Color::hsla(h, s, l, 1.0);
    }

    match mode {
        TreeColor::PinkGold => {
            let r = rng.next_f32();
            if category == Category::Topper {
                let (h, s, l) = TOPPER_PINK;
                return Color::hsla(h, s, l, 1.0);
            }
            let h = 320.0 + rng.next_f32() * 30.0;
            let (s, l) = if r > 0.8 {
                (100.0, 97.0)
            } else if r > 0.4 {
                (90.0, 88.0)
            } else {
                (85.0, 80.0)
            };
            Color::hsla(h, s, l, 1.0)
        }
        TreeColor::Gold => {
            let r = rng.next_f32();
            let h = 45.0 + rng.next_f32() * 10.0;
            Color::hsla(h, 100.0, if r > 0.8 { 95.0 } else { 80.0 }, 1.0)
        }
        TreeColor::Green => {
            let r = rng.next_f32();
            let h = 140.0 + rng.next_f32() * 30.0;
            Color::hsla(h, 80.0, if r > 0.9 { 95.0 } else { 70.0 }, 1.0)
        }
        TreeColor::Rainbow => Color::hsla(rng.next_f32() * 360.0, 90.0, 80.0, 1.0),
    }
}

/// Faint pink-white for background stars, each with its own opacity.
pub fn star_color(rng: &mut SceneRng) -> Color {
    Color::hsla(330.0, 100.0, 98.0, rng.range(0.2, 0.7))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.5
    }

    #[test]
    fn hsl_primaries() {
        let red = Color::hsla(0.0, 100.0, 50.0, 1.0);
        assert!(close(red.r, 255.0) && close(red.g, 0.0) && close(red.b, 0.0));

        let white = Color::hsla(0.0, 0.0, 100.0, 1.0);
        assert_eq!(white.to_rgb(), (255, 255, 255));

        let gold = Color::hsla(45.0, 100.0, 70.0, 1.0);
        assert!(close(gold.r, 255.0) && close(gold.g, 216.75) && close(gold.b, 102.0));
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(
            Color::hsla(360.0, 90.0, 80.0, 1.0).to_rgb(),
            Color::hsla(0.0, 90.0, 80.0, 1.0).to_rgb()
        );
    }

    #[test]
    fn css_format() {
        assert_eq!(Color::rgba(2.0, 6.0, 23.0, 0.2).css(), "rgba(2, 6, 23, 0.2)");
    }

    #[test]
    fn pink_topper_is_single_tone() {
        let mut rng = SceneRng::new(5);
        let first = particle_color(Category::Topper, TreeColor::PinkGold, &mut rng);
        for _ in 0..200 {
            assert_eq!(particle_color(Category::Topper, TreeColor::PinkGold, &mut rng), first);
        }
    }

    #[test]
    fn ornaments_are_gold_or_white() {
        let gold = Color::hsla(45.0, 100.0, 70.0, 1.0);
        let mut rng = SceneRng::new(11);
        let (mut golds, mut whites) = (0, 0);
        for _ in 0..2000 {
            let c = particle_color(Category::Ornament, TreeColor::Green, &mut rng);
            if c == Color::WHITE {
                whites += 1;
            } else {
                assert_eq!(c, gold);
                golds += 1;
            }
        }
        // 40% gold, 60% white
        assert!(golds > 600 && golds < 1000, "golds = {golds}");
        assert!(whites > golds);
    }

    #[test]
    fn green_hues_stay_green() {
        let mut rng = SceneRng::new(3);
        for _ in 0..500 {
            let c = particle_color(Category::Tree, TreeColor::Green, &mut rng);
            assert!(c.g > c.r && c.g > c.b);
        }
    }
}
