#![deny(unsafe_code)]
//! Core types for the plexus point field.
//!
//! Provides the `Surface` drawing trait and a recording implementation,
//! `FieldConfig`, the `PlexusError` enum, `Srgb`/`Rgba` colors, planar
//! geometry (`distance_squared`, `Viewport`), the `Xorshift64` PRNG, and
//! JSON parameter helpers.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod params;
pub mod prng;
pub mod surface;

pub use color::{Rgba, Srgb};
pub use config::FieldConfig;
pub use error::PlexusError;
pub use geometry::{distance_squared, Viewport};
pub use glam::DVec2;
pub use prng::Xorshift64;
pub use surface::{DrawCommand, RecordingSurface, Surface};
