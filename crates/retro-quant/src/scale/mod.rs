//! Pixel-art upscale detection.
//!
//! [`detect_scale()`] recovers the resolution an image had before a
//! nearest-neighbour upscale. Pair it with
//! [`PixelBuffer::downscale_to()`](crate::PixelBuffer::downscale_to) to
//! restore the original pixels.

mod detector;
mod search;

pub use detector::{detect_scale, ScaleEstimate, MIN_SCALE, MISMATCH_TOLERANCE};
