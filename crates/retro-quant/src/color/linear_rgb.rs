//! Linear RGB color type
//!
//! Linear RGB is the color space where light addition is physically accurate
//! and the starting point of the sRGB to XYZ matrix transform.

use super::lut::to_linear;
use super::rgb::Color;

/// A color in linear RGB color space, channels normalized to 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    /// Red channel (linear light intensity)
    pub r: f64,
    /// Green channel (linear light intensity)
    pub g: f64,
    /// Blue channel (linear light intensity)
    pub b: f64,
}

impl LinearRgb {
    /// Create a new LinearRgb color from linear RGB values.
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for LinearRgb {
    /// Gamma-decode each 8-bit channel through the build-time LUT.
    fn from(color: Color) -> Self {
        Self {
            r: to_linear(color.r),
            g: to_linear(color.g),
            b: to_linear(color.b),
        }
    }
}
