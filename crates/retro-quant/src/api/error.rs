//! [`QuantizeError`] wraps every error type of the crate into a single enum
//! for `?` propagation in application code.

use crate::buffer::BufferError;
use crate::palette::{PaletteError, ParseColorError};
use std::fmt;

/// Unified error type for the retro-quant public API.
///
/// # Example
///
/// ```
/// use retro_quant::{PaletteMatcher, Palette, PixelBuffer, QuantizeError};
///
/// fn quantize(data: Vec<u8>) -> Result<PixelBuffer, QuantizeError> {
///     let palette = Palette::from_hex(&["#000000", "#FFFFFF"])?;
///     let buffer = PixelBuffer::new(1, 1, data)?;
///     Ok(PaletteMatcher::new(palette).match_buffer(&buffer))
/// }
///
/// assert!(quantize(vec![0, 0, 0, 255]).is_ok());
/// assert!(quantize(vec![0, 0, 0]).is_err());
/// ```
#[derive(Debug)]
pub enum QuantizeError {
    /// Palette is empty, malformed or unknown
    Palette(PaletteError),
    /// Pixel data does not fit its dimensions
    Buffer(BufferError),
    /// Color parsing error (invalid hex string)
    ParseColor(ParseColorError),
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::Palette(err) => write!(f, "palette error: {}", err),
            QuantizeError::Buffer(err) => write!(f, "buffer error: {}", err),
            QuantizeError::ParseColor(err) => write!(f, "color parse error: {}", err),
        }
    }
}

impl std::error::Error for QuantizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuantizeError::Palette(err) => Some(err),
            QuantizeError::Buffer(err) => Some(err),
            QuantizeError::ParseColor(err) => Some(err),
        }
    }
}

impl From<PaletteError> for QuantizeError {
    fn from(err: PaletteError) -> Self {
        QuantizeError::Palette(err)
    }
}

impl From<BufferError> for QuantizeError {
    fn from(err: BufferError) -> Self {
        QuantizeError::Buffer(err)
    }
}

impl From<ParseColorError> for QuantizeError {
    fn from(err: ParseColorError) -> Self {
        QuantizeError::ParseColor(err)
    }
}
