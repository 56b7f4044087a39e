//! Flat row-major RGBA8 image storage.

use super::error::BufferError;
use crate::color::Color;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A `width x height` grid of RGBA samples stored row-major, 4 bytes per
/// pixel.
///
/// The constructor enforces `data.len() == width * height * 4`, so every
/// method can index without re-checking. Zero-sized buffers are permitted.
///
/// # Example
///
/// ```
/// use retro_quant::{Color, PixelBuffer};
///
/// let buffer = PixelBuffer::filled(3, 2, Color::new(255, 0, 0));
/// assert_eq!(buffer.data().len(), 3 * 2 * 4);
/// assert_eq!(buffer.pixel(2, 1), [255, 0, 0, 255]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidLength`] when the byte count does not
    /// match the dimensions, or [`BufferError::TooLarge`] when the expected
    /// length overflows `usize`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(BufferError::InvalidLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from one [`Color`] per pixel. Transparent colors get alpha 0,
    /// everything else alpha 255.
    pub fn from_colors(width: u32, height: u32, colors: &[Color]) -> Result<Self, BufferError> {
        let expected = byte_len(width, height)?;
        if colors.len() * CHANNELS != expected {
            return Err(BufferError::InvalidLength {
                expected,
                actual: colors.len() * CHANNELS,
            });
        }
        let data = colors
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, if c.transparent { 0 } else { 255 }])
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer with every pixel set to `color` (opaque unless transparent).
    ///
    /// # Panics
    ///
    /// Panics if the dimensions overflow `usize`.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let count = width as usize * height as usize;
        let alpha = if color.transparent { 0 } else { 255 };
        Self {
            width,
            height,
            data: [color.r, color.g, color.b, alpha].repeat(count),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw bytes. The length cannot change through a slice, so the
    /// dimension invariant holds.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Iterate pixels as 4-byte RGBA slices in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(CHANNELS)
    }

    pub fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        self.data.chunks_exact_mut(CHANNELS)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// RGBA sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// RGB of the pixel at `(x, y)` as a [`Color`]; alpha 0 sets the
    /// transparent flag.
    pub fn color(&self, x: u32, y: u32) -> Color {
        let [r, g, b, a] = self.pixel(x, y);
        Color::new(r, g, b).with_transparent(a == 0)
    }

    /// True when every alpha sample is 255.
    pub fn is_opaque(&self) -> bool {
        self.pixels().all(|p| p[3] == 255)
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize, BufferError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(BufferError::TooLarge { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            PixelBuffer::new(2, 2, vec![0; 15]),
            Err(BufferError::InvalidLength {
                expected: 16,
                actual: 15
            })
        );
        assert!(PixelBuffer::new(0, 5, Vec::new()).is_ok());
    }

    #[test]
    fn test_from_colors_sets_alpha() {
        let buffer = PixelBuffer::from_colors(
            2,
            1,
            &[
                Color::new(1, 2, 3),
                Color::new(4, 5, 6).with_transparent(true),
            ],
        )
        .unwrap();
        assert_eq!(buffer.data(), &[1, 2, 3, 255, 4, 5, 6, 0]);
        assert!(!buffer.is_opaque());
        assert!(buffer.color(1, 0).transparent);
    }

    #[test]
    fn test_from_colors_wrong_count() {
        let result = PixelBuffer::from_colors(2, 2, &[Color::new(0, 0, 0)]);
        assert!(matches!(result, Err(BufferError::InvalidLength { .. })));
    }

    #[test]
    fn test_pixel_addressing_is_row_major() {
        let mut buffer = PixelBuffer::filled(3, 2, Color::new(0, 0, 0));
        buffer.set_pixel(1, 1, [9, 8, 7, 6]);
        assert_eq!(&buffer.data()[16..20], &[9, 8, 7, 6]);
        assert_eq!(buffer.pixel(1, 1), [9, 8, 7, 6]);
        assert_eq!(buffer.pixel_count(), 6);
        assert_eq!(buffer.pixels().count(), 6);
    }
}
