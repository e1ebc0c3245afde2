//! A CPU [`Surface`] backed by a premultiplied RGBA buffer.
//!
//! Lines are 1 pixel wide and stepped with a DDA; discs cover every pixel
//! whose center lies inside the radius. No antialiasing. Both composite with
//! src-over, so overlapping translucent draws accumulate as on a canvas.

use glam::DVec2;
use plexus_core::{Rgba, Surface};

/// Premultiplied RGBA, each channel in [0, 1].
pub type Pixel = [f32; 4];

/// Transparent until drawn on; see the module docs for coverage rules.
#[derive(Debug, Clone, Default)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl RasterSurface {
    /// A transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let mut surface = Self::default();
        surface.resize(width, height);
        surface
    }

    /// Row-major premultiplied pixels.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Pixels with non-zero alpha.
    pub fn coverage(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0.0).count()
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let a = color.alpha as f32;
        let src = [
            color.color.r as f32 * a,
            color.color.g as f32 * a,
            color.color.b as f32 * a,
            a,
        ];
        let dst = &mut self.pixels[(y as u64 * self.width as u64 + x as u64) as usize];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s + *d * (1.0 - a);
        }
    }
}

impl Surface for RasterSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 4]; width as usize * height as usize];
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba) {
        if color.alpha == 0.0 || !from.is_finite() || !to.is_finite() {
            return;
        }
        let delta = to - from;
        let steps = delta.abs().max_element().ceil().max(1.0) as i64;
        let inc = delta / steps as f64;
        let mut last = None;
        for i in 0..=steps {
            let p = from + inc * i as f64;
            let cell = (p.x.floor() as i64, p.y.floor() as i64);
            // A pixel is blended once even if two steps land in it.
            if last != Some(cell) {
                self.blend(cell.0, cell.1, color);
                last = Some(cell);
            }
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if color.alpha == 0.0 || radius <= 0.0 || !center.is_finite() || !radius.is_finite() {
            return;
        }
        let r2 = radius * radius;
        let (x0, x1) = ((center.x - radius).floor() as i64, (center.x + radius).ceil() as i64);
        let (y0, y1) = ((center.y - radius).floor() as i64, (center.y + radius).ceil() as i64);
        for y in y0.max(0)..=y1.min(self.height as i64 - 1) {
            for x in x0.max(0)..=x1.min(self.width as i64 - 1) {
                let pixel_center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if pixel_center.distance_squared(center) <= r2 {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexus_core::Srgb;

    fn white(alpha: f64) -> Rgba {
        Srgb::from_u8(255, 255, 255).with_alpha(alpha)
    }

    #[test]
    fn new_surface_is_transparent() {
        let s = RasterSurface::new(4, 3);
        assert_eq!(s.size(), (4, 3));
        assert_eq!(s.pixels().len(), 12);
        assert_eq!(s.coverage(), 0);
    }

    #[test]
    fn horizontal_line_covers_each_pixel_once() {
        let mut s = RasterSurface::new(10, 3);
        s.stroke_line(DVec2::new(0.5, 1.5), DVec2::new(9.5, 1.5), white(0.5));
        assert_eq!(s.coverage(), 10);
        for x in 0..10 {
            assert_eq!(s.pixel(x, 1).unwrap()[3], 0.5);
        }
    }

    #[test]
    fn diagonal_line_is_connected() {
        let mut s = RasterSurface::new(8, 8);
        s.stroke_line(DVec2::new(0.5, 0.5), DVec2::new(7.5, 7.5), white(1.0));
        for i in 0..8 {
            assert_eq!(s.pixel(i, i).unwrap()[3], 1.0, "gap at {i}");
        }
    }

    #[test]
    fn lines_outside_the_surface_are_clipped() {
        let mut s = RasterSurface::new(4, 4);
        s.stroke_line(DVec2::new(-10.0, 2.0), DVec2::new(20.0, 2.0), white(1.0));
        assert_eq!(s.coverage(), 4);
    }

    #[test]
    fn circle_covers_roughly_its_area() {
        let mut s = RasterSurface::new(100, 100);
        s.fill_circle(DVec2::new(50.0, 50.0), 10.0, white(0.6));
        let area = std::f64::consts::PI * 100.0;
        let covered = s.coverage() as f64;
        assert!((covered - area).abs() < area * 0.1, "covered {covered}, expected ~{area}");
    }

    #[test]
    fn src_over_accumulates_alpha() {
        let mut s = RasterSurface::new(1, 1);
        s.fill_circle(DVec2::new(0.5, 0.5), 1.0, white(0.5));
        s.fill_circle(DVec2::new(0.5, 0.5), 1.0, white(0.5));
        assert!((s.pixel(0, 0).unwrap()[3] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn zero_alpha_and_degenerate_shapes_draw_nothing() {
        let mut s = RasterSurface::new(10, 10);
        s.fill_circle(DVec2::new(5.0, 5.0), 3.0, white(0.0));
        s.fill_circle(DVec2::new(5.0, 5.0), 0.0, white(1.0));
        s.stroke_line(DVec2::ZERO, DVec2::new(f64::NAN, 1.0), white(1.0));
        assert_eq!(s.coverage(), 0);
    }

    #[test]
    fn clear_and_resize_discard_contents() {
        let mut s = RasterSurface::new(10, 10);
        s.fill_circle(DVec2::new(5.0, 5.0), 3.0, white(1.0));
        s.clear();
        assert_eq!(s.coverage(), 0);
        s.fill_circle(DVec2::new(5.0, 5.0), 3.0, white(1.0));
        s.resize(6, 2);
        assert_eq!(s.pixels().len(), 12);
        assert_eq!(s.coverage(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arbitrary_lines_never_panic_and_stay_in_unit_range(
                ax in -50.0f64..150.0, ay in -50.0f64..150.0,
                bx in -50.0f64..150.0, by in -50.0f64..150.0,
                alpha in 0.0f64..=1.0,
            ) {
                let mut s = RasterSurface::new(64, 48);
                s.stroke_line(DVec2::new(ax, ay), DVec2::new(bx, by), white(alpha));
                s.stroke_line(DVec2::new(bx, by), DVec2::new(ax, ay), white(alpha));
                for p in s.pixels() {
                    prop_assert!(p.iter().all(|c| (0.0..=1.0 + 1e-6).contains(c)));
                }
            }
        }
    }
}
