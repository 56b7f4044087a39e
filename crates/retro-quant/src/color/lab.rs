//! CIELAB color space
//!
//! CIELAB (L*a*b*) is the space in which CIEDE2000 is defined. It is derived
//! from XYZ by normalizing against a reference white and applying the CIE
//! cube-root compression.

use super::rgb::Color;
use super::xyz::Xyz;

/// D65 reference white, X component
pub const D65_XR: f64 = 0.95047;
/// D65 reference white, Y component
pub const D65_YR: f64 = 1.0;
/// D65 reference white, Z component
pub const D65_ZR: f64 = 1.08883;

/// Threshold between the cube-root and linear segments of the CIE f(t) function.
const EPSILON: f64 = 0.008856;

/// A color in CIELAB space.
///
/// # Components
///
/// - `l`: Lightness, 0.0 (black) to 100.0 (white)
/// - `a`: Green (negative) to red (positive), roughly -128..=128
/// - `b`: Blue (negative) to yellow (positive), roughly -128..=128
///
/// Values are derived on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    /// Create a new Lab color.
    ///
    /// # Example
    ///
    /// ```
    /// use retro_quant::Lab;
    ///
    /// let mid_gray = Lab::new(50.0, 0.0, 0.0);
    /// assert_eq!(mid_gray.chroma(), 0.0);
    /// ```
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Chroma magnitude `sqrt(a² + b²)`.
    #[inline]
    pub fn chroma(self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    /// CIEDE2000 distance to another color. See [`delta_e_2000`](super::delta_e_2000).
    #[inline]
    pub fn delta_e(self, other: Lab) -> f64 {
        super::delta_e_2000(self, other)
    }
}

/// CIE f(t): cube root above the threshold, linear segment below it.
#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

impl From<Xyz> for Lab {
    fn from(xyz: Xyz) -> Self {
        let fx = lab_f(xyz.x / D65_XR);
        let fy = lab_f(xyz.y / D65_YR);
        let fz = lab_f(xyz.z / D65_ZR);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<Color> for Lab {
    /// Full chain: gamma decode, XYZ matrix, Lab compression.
    fn from(color: Color) -> Self {
        Lab::from(Xyz::from(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Our matrix is the rounded published one while the palette crate derives
    /// its own from the primaries, so allow a small absolute Lab difference.
    const PALETTE_TOLERANCE: f64 = 0.02;

    #[test]
    fn test_lab_matches_palette_crate() {
        use palette::white_point::D65;
        use palette::{IntoColor, Lab as PaletteLab, Srgb as PaletteSrgb};

        let test_colors = [
            (255u8, 0u8, 0u8),
            (0, 255, 0),
            (0, 0, 255),
            (128, 128, 128),
            (255, 255, 255),
            (0, 0, 0),
            (15, 56, 15),
            (3, 2, 1),
            (255, 163, 0),
        ];

        for (r, g, b) in test_colors {
            let ours = Lab::from(Color::new(r, g, b));

            let reference: PaletteLab<D65, f64> = PaletteSrgb::new(
                r as f64 / 255.0,
                g as f64 / 255.0,
                b as f64 / 255.0,
            )
            .into_linear()
            .into_color();

            assert!(
                (ours.l - reference.l).abs() < PALETTE_TOLERANCE,
                "L mismatch for ({r}, {g}, {b}): ours={}, palette={}",
                ours.l,
                reference.l
            );
            assert!(
                (ours.a - reference.a).abs() < PALETTE_TOLERANCE,
                "a mismatch for ({r}, {g}, {b}): ours={}, palette={}",
                ours.a,
                reference.a
            );
            assert!(
                (ours.b - reference.b).abs() < PALETTE_TOLERANCE,
                "b mismatch for ({r}, {g}, {b}): ours={}, palette={}",
                ours.b,
                reference.b
            );
        }
    }

    #[test]
    fn test_white_and_black() {
        let white = Lab::from(Color::new(255, 255, 255));
        assert!((white.l - 100.0).abs() < 1e-3);
        assert!(white.a.abs() < 1e-3);
        assert!(white.b.abs() < 1e-3);

        let black = Lab::from(Color::new(0, 0, 0));
        assert!(black.l.abs() < 1e-9);
        assert!(black.a.abs() < 1e-9);
        assert!(black.b.abs() < 1e-9);
    }

    #[test]
    fn test_grays_are_achromatic() {
        for v in [1u8, 17, 64, 128, 200, 254] {
            let gray = Lab::from(Color::new(v, v, v));
            assert!(gray.chroma() < 1e-3, "gray {v} has chroma {}", gray.chroma());
        }
    }

    #[test]
    fn test_linear_segment_for_very_dark_colors() {
        // Y for sRGB 3 is far below the 0.008856 knee
        let dark = Lab::from(Color::new(3, 3, 3));
        let y = 0.2126729 + 0.7151522 + 0.0721750;
        let expected_fy = 7.787 * (crate::to_linear(3) * y) + 16.0 / 116.0;
        assert!((dark.l - (116.0 * expected_fy - 16.0)).abs() < 1e-9);
    }
}
