//! CIE 1931 XYZ color type

use super::linear_rgb::LinearRgb;
use super::rgb::Color;

/// A color in CIE XYZ space relative to the D65 illuminant (Y of white = 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<LinearRgb> for Xyz {
    /// Apply the sRGB (ITU-R BT.709 primaries, D65) matrix.
    fn from(rgb: LinearRgb) -> Self {
        Self {
            x: 0.4124564 * rgb.r + 0.3575761 * rgb.g + 0.1804375 * rgb.b,
            y: 0.2126729 * rgb.r + 0.7151522 * rgb.g + 0.0721750 * rgb.b,
            z: 0.0193339 * rgb.r + 0.1191920 * rgb.g + 0.9503041 * rgb.b,
        }
    }
}

impl From<Color> for Xyz {
    fn from(color: Color) -> Self {
        Xyz::from(LinearRgb::from(color))
    }
}
