// Generated LUT tables trip precision lints; channel loops read clearer indexed
#![allow(
    clippy::excessive_precision,
    clippy::needless_range_loop,
    clippy::module_inception
)]

//! retro-quant: palette quantization and pixel-art restoration
//!
//! This library reduces RGBA images to small retro palettes using a
//! perceptual color distance, derives palettes from image content, and
//! detects and reverses nearest-neighbour upscaling.
//!
//! # Quick Start
//!
//! ```
//! use retro_quant::{Color, PaletteKind, PaletteMatcher, PixelBuffer};
//!
//! let image = PixelBuffer::filled(4, 4, Color::new(140, 170, 20));
//! let matcher = PaletteMatcher::new(PaletteKind::GameBoy.palette());
//! let quantized = matcher.match_buffer(&image);
//!
//! let used = matcher.palette().used_in(&quantized);
//! assert_eq!(used.len(), 1);
//! ```
//!
//! # Components
//!
//! | Component | Entry point | Purpose |
//! |-----------|-------------|---------|
//! | Color space | [`Lab`], [`delta_e_2000()`] | sRGB to CIELAB and CIEDE2000 |
//! | Matching | [`PaletteMatcher`] | Nearest palette entry per pixel |
//! | Generation | [`generate_palette()`] | Median cut over image colors |
//! | Scale detection | [`detect_scale()`] | Recover pre-upscale resolution |
//!
//! # Color Distance
//!
//! Matching converts both the pixel and each palette entry to CIELAB (D65)
//! and compares them with CIEDE2000 (Sharma, Wu and Dalal 2005). Palette Lab
//! values are computed once; pixel conversions are memoized per call by
//! exact RGB triple, so cost scales with the number of distinct colors.
//!
//! # Determinism
//!
//! All operations are pure functions of their inputs. Equal distances pick
//! the lowest palette index, median cut has a fixed box order, and scale
//! detection sweeps a fixed grid of candidates.

pub mod api;
pub mod buffer;
pub mod color;
pub mod palette;
pub mod quantize;
pub mod scale;


pub use api::QuantizeError;
pub use buffer::{BufferError, PixelBuffer};
pub use color::{delta_e_2000, to_linear, Color, Lab, LinearRgb, Xyz};
pub use palette::{Palette, PaletteError, PaletteKind, ParseColorError};
pub use quantize::{generate_palette, remap_color, PaletteMatcher};
pub use scale::{detect_scale, ScaleEstimate};
