//! PNG snapshots of a [`RasterSurface`].
//!
//! Feature-gated behind `png` (default on) so in-memory consumers need not
//! pull in the `image` crate.

use plexus_core::{PlexusError, Srgb, Surface};
use std::path::Path;

use crate::pixel::to_rgba8;
use crate::raster::RasterSurface;

/// Writes the surface flattened onto `background` as a PNG.
///
/// Returns `PlexusError::InvalidDimensions` for a zero-sized surface (PNG has
/// no empty images) and `PlexusError::Io` on write failure.
pub fn write_png(surface: &RasterSurface, background: Srgb, path: &Path) -> Result<(), PlexusError> {
    let (w, h) = surface.size();
    if w == 0 || h == 0 {
        return Err(PlexusError::InvalidDimensions);
    }
    let img = image::RgbaImage::from_raw(w, h, to_rgba8(surface, background))
        .ok_or_else(|| PlexusError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| PlexusError::Io(e.to_string()))
}
