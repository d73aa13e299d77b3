// raster.rs - CPU surface for headless rendering
//
// Pixels are straight (non-premultiplied) Color values. Shapes are sampled
// at pixel centers: circles get a one pixel coverage ramp, polygons use the
// even-odd rule. Shadow blur is approximated by a linear halo around the
// shape's bounding circle.

use super::Surface;
use crate::error::{Result, SceneError};
use crate::palette::Color;

#[derive(Debug, Clone)]
enum Shape {
    Circle { x: f32, y: f32, r: f32 },
    Polygon(Vec<(f32, f32)>),
}

impl Shape {
    /// Center and radius of a circle enclosing the shape
    fn bounds(&self) -> (f32, f32, f32) {
        match self {
            Shape::Circle { x, y, r } => (*x, *y, *r),
            Shape::Polygon(pts) => {
                let n = pts.len().max(1) as f32;
                let cx = pts.iter().map(|p| p.0).sum::<f32>() / n;
                let cy = pts.iter().map(|p| p.1).sum::<f32>() / n;
                let r = pts
                    .iter()
                    .map(|p| (p.0 - cx).hypot(p.1 - cy))
                    .fold(0.0, f32::max);
                (cx, cy, r)
            }
        }
    }
}

#[derive(Clone)]
pub struct RasterSurface {
    w: u32,
    h: u32,
    px: Vec<Color>,

    path: Vec<Shape>,
    open: Vec<(f32, f32)>,

    fill: Color,
    alpha: f32,
    glow: f32,
    glow_color: Color,
}

impl RasterSurface {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Color::TRANSPARENT; (w as usize) * (h as usize)],
            path: Vec::new(),
            open: Vec::new(),
            fill: Color::BLACK,
            alpha: 1.0,
            glow: 0.0,
            glow_color: Color::TRANSPARENT,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.w && y < self.h {
            Some(self.px[self.index(x, y)])
        } else {
            None
        }
    }

    /// Source-over another layer of the same size onto this one.
    pub fn composite_over(&mut self, top: &RasterSurface) -> Result<()> {
        if (top.w, top.h) != (self.w, self.h) {
            return Err(SceneError::Draw(format!(
                "layer size {}x{} does not match {}x{}",
                top.w, top.h, self.w, self.h
            )));
        }
        for (dst, src) in self.px.iter_mut().zip(&top.px) {
            *dst = blend(*dst, *src, 1.0);
        }
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + x as usize
    }

    #[inline]
    fn blend_at(&mut self, x: i64, y: i64, src: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 || coverage <= 0.0 {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.px[idx] = blend(self.px[idx], src, coverage);
    }

    /// Pixel rows and columns whose centers may fall inside the box
    fn span(&self, cx: f32, cy: f32, r: f32) -> (i64, i64, i64, i64) {
        let x0 = ((cx - r - 1.0).floor() as i64).max(0);
        let y0 = ((cy - r - 1.0).floor() as i64).max(0);
        let x1 = ((cx + r + 1.0).ceil() as i64).min(self.w as i64 - 1);
        let y1 = ((cy + r + 1.0).ceil() as i64).min(self.h as i64 - 1);
        (x0, y0, x1, y1)
    }

    fn halo(&mut self, shape: &Shape) {
        let (cx, cy, r) = shape.bounds();
        let reach = self.glow;
        let color = self.glow_color;
        let strength = color.a * self.alpha * 0.5;
        if strength <= 0.0 {
            return;
        }

        let (x0, y0, x1, y1) = self.span(cx, cy, r + reach);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
                if d <= r || d >= r + reach {
                    continue;
                }
                let falloff = 1.0 - (d - r) / reach;
                self.blend_at(x, y, color.with_alpha(1.0), strength * falloff);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, src: Color) {
        let (x0, y0, x1, y1) = self.span(cx, cy, r);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
                let coverage = (r - d + 0.5).clamp(0.0, 1.0);
                self.blend_at(x, y, src, coverage);
            }
        }
    }

    fn fill_polygon(&mut self, pts: &[(f32, f32)], src: Color) {
        if pts.len() < 3 {
            return;
        }
        let (cx, cy, r) = Shape::Polygon(pts.to_vec()).bounds();
        let (x0, y0, x1, y1) = self.span(cx, cy, r);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if even_odd(pts, x as f32 + 0.5, y as f32 + 0.5) {
                    self.blend_at(x, y, src, 1.0);
                }
            }
        }
    }

    fn end_subpath(&mut self) {
        if self.open.len() >= 3 {
            self.path.push(Shape::Polygon(std::mem::take(&mut self.open)));
        } else {
            self.open.clear();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl RasterSurface {
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.w, self.h, |x, y| {
            let c = self.px[self.index(x, y)];
            let (r, g, b) = c.to_rgb();
            image::Rgba([r, g, b, (c.a.clamp(0.0, 1.0) * 255.0).round() as u8])
        })
    }

    pub fn save_png(&self, path: &std::path::Path) -> Result<()> {
        self.to_image().save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Straight-alpha source-over with partial coverage
fn blend(dst: Color, src: Color, coverage: f32) -> Color {
    let sa = src.a * coverage;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst.a * (1.0 - sa);
    let out = sa + da;
    if out <= 0.0 {
        return Color::TRANSPARENT;
    }
    Color {
        r: (src.r * sa + dst.r * da) / out,
        g: (src.g * sa + dst.g * da) / out,
        b: (src.b * sa + dst.b * da) / out,
        a: out,
    }
}

fn even_odd(pts: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (xi, yi) = pts[i];
        let (xj, yj) = pts[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl Surface for RasterSurface {
    fn width(&self) -> f32 {
        self.w as f32
    }

    fn height(&self) -> f32 {
        self.h as f32
    }

    fn clear(&mut self) {
        self.px.fill(Color::TRANSPARENT);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let src = color.with_alpha(color.a * self.alpha);
        let x0 = (x.round() as i64).max(0);
        let y0 = (y.round() as i64).max(0);
        let x1 = ((x + w).round() as i64).min(self.w as i64);
        let y1 = ((y + h).round() as i64).min(self.h as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_at(px, py, src, 1.0);
            }
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.open.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.end_subpath();
        self.open.push((x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.open.push((x, y));
    }

    fn close_path(&mut self) {
        self.end_subpath();
    }

    fn arc(&mut self, x: f32, y: f32, r: f32) -> Result<()> {
        if r.is_nan() || r < 0.0 || !x.is_finite() || !y.is_finite() {
            return Err(SceneError::Draw(format!("bad arc ({x}, {y}) r={r}")));
        }
        self.end_subpath();
        self.path.push(Shape::Circle { x, y, r });
        Ok(())
    }

    fn set_fill(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_glow(&mut self, blur: f32, color: Color) {
        self.glow = blur.max(0.0);
        self.glow_color = color;
    }

    fn fill(&mut self) {
        self.end_subpath();
        let shapes = std::mem::take(&mut self.path);
        let src = self.fill.with_alpha(self.fill.a * self.alpha);

        if self.glow > 0.0 {
            for shape in &shapes {
                self.halo(shape);
            }
        }

        for shape in &shapes {
            match shape {
                Shape::Circle { x, y, r } => self.fill_circle(*x, *y, *r, src),
                Shape::Polygon(pts) => self.fill_polygon(pts, src),
            }
        }

        // The path survives a fill, same as canvas
        self.path = shapes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{project, screen_center};

    const RED: Color = Color::rgba(255.0, 0.0, 0.0, 1.0);

    #[test]
    fn circle_lands_at_projected_pixel() {
        let mut s = RasterSurface::new(200, 200);
        let at = project(20.0, -10.0, 250.0, screen_center(200.0, 200.0)).unwrap();
        s.set_fill(RED);
        s.begin_path();
        s.arc(at.x, at.y, 3.0).unwrap();
        s.fill();

        let hit = s.pixel(at.x as u32, at.y as u32).unwrap();
        assert_eq!(hit.to_rgb(), (255, 0, 0));
        assert!(hit.a > 0.99);
        assert_eq!(s.pixel(at.x as u32 + 10, at.y as u32).unwrap().a, 0.0);
    }

    #[test]
    fn trail_overlay_darkens_without_clearing() {
        let mut s = RasterSurface::new(4, 4);
        s.fill_rect(0.0, 0.0, 4.0, 4.0, Color::WHITE);
        let fade = Color::rgba(2.0, 6.0, 23.0, 0.2);
        s.fill_rect(0.0, 0.0, 4.0, 4.0, fade);

        let p = s.pixel(1, 1).unwrap();
        assert!(p.r < 255.0 && p.r > 200.0);
        assert!((p.a - 1.0).abs() < 1e-6);
    }

    #[test]
    fn diamond_uses_even_odd_fill() {
        let mut s = RasterSurface::new(20, 20);
        s.set_fill(RED);
        s.begin_path();
        s.move_to(10.0, 4.0);
        s.line_to(16.0, 10.0);
        s.line_to(10.0, 16.0);
        s.line_to(4.0, 10.0);
        s.close_path();
        s.fill();

        assert_eq!(s.pixel(10, 10).unwrap().a, 1.0);
        assert_eq!(s.pixel(4, 4).unwrap().a, 0.0);
        assert_eq!(s.pixel(15, 15).unwrap().a, 0.0);
    }

    #[test]
    fn glow_reaches_past_the_edge() {
        let mut plain = RasterSurface::new(40, 40);
        let mut glowing = RasterSurface::new(40, 40);
        for (s, blur) in [(&mut plain, 0.0), (&mut glowing, 8.0)] {
            s.set_fill(RED);
            s.set_glow(blur, RED);
            s.begin_path();
            s.arc(20.0, 20.0, 3.0).unwrap();
            s.fill();
        }
        assert_eq!(plain.pixel(26, 20).unwrap().a, 0.0);
        assert!(glowing.pixel(26, 20).unwrap().a > 0.0);
    }

    #[test]
    fn global_alpha_scales_fill() {
        let mut s = RasterSurface::new(10, 10);
        s.set_alpha(0.5);
        s.set_fill(RED);
        s.begin_path();
        s.arc(5.0, 5.0, 4.0).unwrap();
        s.fill();
        assert!((s.pixel(5, 5).unwrap().a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn pixel_index_does_not_wrap_on_huge_canvases() {
        let s = RasterSurface {
            w: 70_000,
            h: 70_000,
            px: Vec::new(),
            ..RasterSurface::new(0, 0)
        };
        assert_eq!(s.index(69_999, 69_999), 69_999usize * 70_000 + 69_999);
        assert!(s.index(69_999, 69_999) > u32::MAX as usize);
    }

    #[test]
    fn rejects_negative_radius() {
        let mut s = RasterSurface::new(10, 10);
        assert!(matches!(s.arc(1.0, 1.0, -1.0), Err(SceneError::Draw(_))));
        assert!(s.arc(1.0, f32::NAN, 1.0).is_err());
    }

    #[test]
    fn composites_layers() {
        let mut bottom = RasterSurface::new(8, 8);
        bottom.fill_rect(0.0, 0.0, 8.0, 8.0, Color::BLACK);
        let mut top = RasterSurface::new(8, 8);
        top.fill_rect(0.0, 0.0, 4.0, 8.0, Color::WHITE);

        bottom.composite_over(&top).unwrap();
        assert_eq!(bottom.pixel(1, 1).unwrap().to_rgb(), (255, 255, 255));
        assert_eq!(bottom.pixel(6, 1).unwrap().to_rgb(), (0, 0, 0));

        assert!(bottom.composite_over(&RasterSurface::new(4, 4)).is_err());
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut s = RasterSurface::new(4, 4);
        s.fill_rect(0.0, 0.0, 4.0, 4.0, RED);
        s.clear();
        assert!((0..4).all(|x| s.pixel(x, 2).unwrap() == Color::TRANSPARENT));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn exports_rgba_image() {
        let mut s = RasterSurface::new(3, 2);
        s.fill_rect(0.0, 0.0, 3.0, 2.0, RED);
        let img = s.to_image();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [255, 0, 0, 255]);
    }
}
