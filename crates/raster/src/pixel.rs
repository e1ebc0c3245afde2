//! Flattening a [`RasterSurface`] onto an opaque background as RGBA8.
//!
//! Always available (no feature gate) so both the PNG path and any in-memory
//! consumer share one conversion.

use plexus_core::Srgb;

use crate::raster::RasterSurface;

/// Composites every premultiplied pixel over `background` and quantizes to 8 bits.
///
/// The buffer is row-major, `width * height * 4` bytes, alpha always 255.
pub fn to_rgba8(surface: &RasterSurface, background: Srgb) -> Vec<u8> {
    let bg = [background.r as f32, background.g as f32, background.b as f32];
    surface
        .pixels()
        .iter()
        .flat_map(|&[r, g, b, a]| {
            let over = |src: f32, dst: f32| ((src + dst * (1.0 - a)).clamp(0.0, 1.0) * 255.0).round() as u8;
            [over(r, bg[0]), over(g, bg[1]), over(b, bg[2]), 255u8]
        })
        .collect()
}
