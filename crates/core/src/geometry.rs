//! Planar geometry shared by the field and its surfaces.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::PlexusError;

/// Squared Euclidean distance between two positions.
///
/// Used only for ranking and thresholding, so it is never square-rooted;
/// callers compare against pre-squared thresholds.
pub fn distance_squared(a: DVec2, b: DVec2) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Dimensions of the drawing area in surface units (CSS pixels in a browser).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Largest accepted side, the canvas size limit common to browsers.
    pub const MAX_SIDE: f64 = 32_767.0;

    /// Zero is allowed and means an empty field. Negative, non-finite, or
    /// larger than [`MAX_SIDE`](Self::MAX_SIDE) is not.
    pub fn new(width: f64, height: f64) -> Result<Self, PlexusError> {
        let valid = |side: f64| side.is_finite() && (0.0..=Self::MAX_SIDE).contains(&side);
        if !valid(width) || !valid(height) {
            return Err(PlexusError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    /// Geometric center, the default interaction target.
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Whole-pixel size for a backing buffer, rounding up partial pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.ceil() as u32, self.height.ceil() as u32)
    }
}
