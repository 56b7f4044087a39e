//! Color types and conversion utilities
//!
//! This module provides the 8-bit [`Color`] value type used for pixels and
//! palette entries, plus the chain of conversions needed to measure
//! perceptual distance between two colors.
//!
//! # Conversion Chain
//!
//! ```text
//! Color (8-bit sRGB)
//!     |  gamma decode (LUT, IEC 61966-2-1)
//!     v
//! LinearRgb
//!     |  sRGB D65 matrix (ITU-R BT.709 primaries)
//!     v
//! Xyz
//!     |  CIE f(t), D65 reference white
//!     v
//! Lab  ----> delta_e_2000(Lab, Lab)
//! ```
//!
//! # Example
//!
//! ```
//! use retro_quant::{delta_e_2000, Color, Lab};
//!
//! let red = Lab::from(Color::new(255, 0, 0));
//! let dark_red = Lab::from(Color::new(200, 0, 0));
//!
//! assert!(delta_e_2000(red, dark_red) > 0.0);
//! assert_eq!(delta_e_2000(red, red), 0.0);
//! ```

mod ciede2000;
mod lab;
mod linear_rgb;
mod lut;
mod rgb;
mod xyz;

pub use ciede2000::delta_e_2000;
pub use lab::Lab;
pub use linear_rgb::LinearRgb;
pub use lut::to_linear;
pub use rgb::Color;
pub use xyz::Xyz;
