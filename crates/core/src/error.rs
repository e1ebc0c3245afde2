//! Error types for the plexus core.

use thiserror::Error;

/// Errors produced while configuring, mounting, or snapshotting a field.
///
/// Degenerate geometry (a zero-width or zero-height surface) is deliberately
/// absent: it yields an empty field, not an error.
#[derive(Debug, Error)]
pub enum PlexusError {
    /// The drawing surface or its 2D context could not be obtained.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Width or height was negative, non-finite, or overflowed a pixel buffer.
    #[error("invalid dimensions: width and height must be finite and non-negative")]
    InvalidDimensions,

    /// A configuration parameter held a value outside its valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Reading or writing a snapshot failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl PlexusError {
    /// Shorthand for [`PlexusError::InvalidParam`].
    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        PlexusError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
