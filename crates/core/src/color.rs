//! Color types for strokes and fills.
//!
//! A field is drawn in a single hue; only alpha varies with activation. [`Srgb`]
//! is the configured hue and [`Rgba`] is what reaches a [`Surface`](crate::Surface).

use crate::error::PlexusError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    /// Builds a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Srgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parses `"#9cd9f9"` or `"9cd9f9"` (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, PlexusError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PlexusError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| PlexusError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb::from_u8(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Channels quantized to 8 bits with rounding.
    pub fn to_u8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Lowercase `"#rrggbb"`, rounding each channel to 8 bits.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Attaches an alpha, clamped to [0, 1].
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            color: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A translucent color as handed to a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub color: Srgb,
    pub alpha: f64,
}

impl Rgba {
    /// CSS form accepted by a canvas `fillStyle`/`strokeStyle`, e.g. `rgba(156,217,249,0.3)`.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.color.to_u8();
        format!("rgba({r},{g},{b},{})", self.alpha)
    }
}
