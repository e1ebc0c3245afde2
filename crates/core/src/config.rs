//! Reproducible description of a field.
//!
//! A [`FieldConfig`] holds the surface size, the PRNG seed, and every tunable
//! constant of generation and motion. Two mounts with equal configs produce
//! identical animations under the same input and clock.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::color::Srgb;
use crate::error::PlexusError;
use crate::geometry::Viewport;
use crate::params::{param_f64, param_string, param_usize};

pub const DEFAULT_GRID_DIVISIONS: usize = 20;
pub const DEFAULT_NEIGHBORS: usize = 5;
pub const DEFAULT_DRIFT: f64 = 50.0;
pub const DEFAULT_MIN_DURATION: f64 = 1.0;
pub const DEFAULT_MAX_DURATION: f64 = 2.0;
pub const DEFAULT_RADIUS_MIN: f64 = 2.0;
pub const DEFAULT_RADIUS_SPREAD: f64 = 2.0;
pub const DEFAULT_COLOR: &str = "#9cd9f9";

/// Everything needed to generate and animate a field.
///
/// Together with the input sequence, a config reproduces a mount exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub width: f64,
    pub height: f64,
    pub seed: u64,
    /// Cells per axis of the jittered grid.
    pub grid_divisions: usize,
    /// Neighbors linked to each point.
    pub neighbors: usize,
    /// Half-extent of the box each point wanders in around its origin.
    pub drift: f64,
    /// Transition durations are drawn from `[min_duration, max_duration)` seconds.
    pub min_duration: f64,
    pub max_duration: f64,
    /// Marker radii are drawn from `[radius_min, radius_min + radius_spread)`.
    pub radius_min: f64,
    pub radius_spread: f64,
    /// Hue of lines and markers; alpha comes from activation.
    pub color: Srgb,
}

impl FieldConfig {
    /// Default parameters for a `width × height` surface.
    pub fn new(width: f64, height: f64, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            grid_divisions: DEFAULT_GRID_DIVISIONS,
            neighbors: DEFAULT_NEIGHBORS,
            drift: DEFAULT_DRIFT,
            min_duration: DEFAULT_MIN_DURATION,
            max_duration: DEFAULT_MAX_DURATION,
            radius_min: DEFAULT_RADIUS_MIN,
            radius_spread: DEFAULT_RADIUS_SPREAD,
            color: Srgb::from_u8(0x9c, 0xd9, 0xf9),
        }
    }

    /// Builds a config from JSON overrides; absent keys keep their defaults.
    ///
    /// The result is validated before it is returned.
    pub fn from_json(width: f64, height: f64, seed: u64, params: &Value) -> Result<Self, PlexusError> {
        let config = Self {
            width,
            height,
            seed,
            grid_divisions: param_usize(params, "grid_divisions", DEFAULT_GRID_DIVISIONS),
            neighbors: param_usize(params, "neighbors", DEFAULT_NEIGHBORS),
            drift: param_f64(params, "drift", DEFAULT_DRIFT),
            min_duration: param_f64(params, "min_duration", DEFAULT_MIN_DURATION),
            max_duration: param_f64(params, "max_duration", DEFAULT_MAX_DURATION),
            radius_min: param_f64(params, "radius_min", DEFAULT_RADIUS_MIN),
            radius_spread: param_f64(params, "radius_spread", DEFAULT_RADIUS_SPREAD),
            color: Srgb::from_hex(&param_string(params, "color", DEFAULT_COLOR))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// The configured size as a [`Viewport`].
    ///
    /// # Errors
    ///
    /// Returns [`PlexusError::InvalidDimensions`] when the size is out of range.
    pub fn viewport(&self) -> Result<Viewport, PlexusError> {
        Viewport::new(self.width, self.height)
    }

    /// Zero width or height is accepted: it produces an empty field.
    pub fn validate(&self) -> Result<(), PlexusError> {
        self.viewport()?;
        if self.grid_divisions == 0 {
            return Err(PlexusError::invalid_param("grid_divisions", "must be at least 1"));
        }
        if !(self.drift.is_finite() && self.drift >= 0.0) {
            return Err(PlexusError::invalid_param("drift", "must be finite and non-negative"));
        }
        if !(self.min_duration.is_finite() && self.min_duration > 0.0) {
            return Err(PlexusError::invalid_param("min_duration", "must be positive"));
        }
        if !(self.max_duration.is_finite() && self.max_duration >= self.min_duration) {
            return Err(PlexusError::invalid_param(
                "max_duration",
                "must be finite and not less than min_duration",
            ));
        }
        for (name, value) in [("radius_min", self.radius_min), ("radius_spread", self.radius_spread)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PlexusError::invalid_param(name, "must be finite and non-negative"));
            }
        }
        Ok(())
    }

    /// Current values, in the same shape [`FieldConfig::from_json`] reads.
    pub fn params(&self) -> Value {
        json!({
            "grid_divisions": self.grid_divisions,
            "neighbors": self.neighbors,
            "drift": self.drift,
            "min_duration": self.min_duration,
            "max_duration": self.max_duration,
            "radius_min": self.radius_min,
            "radius_spread": self.radius_spread,
            "color": self.color.to_hex(),
        })
    }

    /// Types, ranges, defaults, and descriptions of every tunable parameter.
    pub fn param_schema() -> Value {
        json!({
            "grid_divisions": {
                "type": "integer",
                "default": DEFAULT_GRID_DIVISIONS,
                "min": 1,
                "max": 200,
                "description": "Grid cells per axis; one jittered point per cell"
            },
            "neighbors": {
                "type": "integer",
                "default": DEFAULT_NEIGHBORS,
                "min": 0,
                "max": 32,
                "description": "Nearest neighbors each point links to"
            },
            "drift": {
                "type": "number",
                "default": DEFAULT_DRIFT,
                "min": 0.0,
                "max": 500.0,
                "description": "Half-extent of the wander box around each origin"
            },
            "min_duration": {
                "type": "number",
                "default": DEFAULT_MIN_DURATION,
                "min": 0.01,
                "max": 60.0,
                "description": "Shortest transition, in seconds"
            },
            "max_duration": {
                "type": "number",
                "default": DEFAULT_MAX_DURATION,
                "min": 0.01,
                "max": 60.0,
                "description": "Upper bound (exclusive) of transition duration, in seconds"
            },
            "radius_min": {
                "type": "number",
                "default": DEFAULT_RADIUS_MIN,
                "min": 0.0,
                "max": 50.0,
                "description": "Smallest marker radius"
            },
            "radius_spread": {
                "type": "number",
                "default": DEFAULT_RADIUS_SPREAD,
                "min": 0.0,
                "max": 50.0,
                "description": "Random extra marker radius"
            },
            "color": {
                "type": "string",
                "default": DEFAULT_COLOR,
                "description": "Hex hue of links and markers"
            }
        })
    }
}
