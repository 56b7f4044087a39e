//! Gamma lookup table access
//!
//! The table is generated at compile time by build.rs with one exact entry
//! per 8-bit channel value, so no interpolation is needed.

// Include the generated LUT from build.rs
include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Convert an 8-bit sRGB channel (0..=255) to a normalized linear-light value.
///
/// Equivalent to normalizing to 0.0..=1.0 and applying the sRGB piecewise
/// transfer function: `c / 12.92` at or below 0.04045, otherwise
/// `((c + 0.055) / 1.055)^2.4`.
///
/// # Example
///
/// ```
/// use retro_quant::to_linear;
///
/// assert_eq!(to_linear(0), 0.0);
/// assert!((to_linear(255) - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn to_linear(channel: u8) -> f64 {
    SRGB8_TO_LINEAR[channel as usize]
}
