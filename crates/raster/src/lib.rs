#![deny(unsafe_code)]
//! CPU rendering for the plexus point field.
//!
//! [`RasterSurface`] implements [`plexus_core::Surface`] on a plain RGBA buffer
//! so a field can be rendered headless, and [`snapshot::write_png`] saves it.

pub mod pixel;
pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::to_rgba8;
pub use raster::RasterSurface;
