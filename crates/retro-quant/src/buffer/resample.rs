//! Nearest-neighbour resampling.
//!
//! All three operations copy whole RGBA samples, so no new colors are ever
//! introduced and palette-quantized images stay quantized.

use super::error::BufferError;
use super::pixel_buffer::{PixelBuffer, CHANNELS};
use crate::scale::ScaleEstimate;

/// Start offsets of `cells` cells partitioning `dim` pixels.
///
/// Every cell is `dim / cells` wide; the first `dim % cells` cells take one
/// extra pixel each. The returned vector has `cells + 1` entries, the last
/// being `dim`.
pub(crate) fn cell_starts(dim: u32, cells: u32) -> Vec<u32> {
    debug_assert!(cells > 0 && cells <= dim);
    let base = dim / cells;
    let extra = dim % cells;
    (0..=cells).map(|i| i * base + i.min(extra)).collect()
}

impl PixelBuffer {
    /// Resize to exactly `width x height`, sampling the source pixel whose
    /// area contains each destination pixel's origin.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidTarget`] for a zero target dimension or an
    /// empty source.
    pub fn resize_nearest(&self, width: u32, height: u32) -> Result<PixelBuffer, BufferError> {
        if width == 0 || height == 0 || self.is_empty() {
            return Err(BufferError::InvalidTarget { width, height });
        }
        if width == self.width() && height == self.height() {
            return Ok(self.clone());
        }

        let src_w = self.width() as u64;
        let src_h = self.height() as u64;
        let xs: Vec<u32> = (0..width as u64)
            .map(|x| (x * src_w / width as u64) as u32)
            .collect();

        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height as u64 {
            let sy = (y * src_h / height as u64) as u32;
            for &sx in &xs {
                data.extend_from_slice(&self.pixel(sx, sy));
            }
        }
        PixelBuffer::new(width, height, data)
    }

    /// Resize so the image fits inside `max_width x max_height` with its
    /// aspect ratio preserved. Each output side is at least one pixel.
    pub fn fit_within(&self, max_width: u32, max_height: u32) -> Result<PixelBuffer, BufferError> {
        if max_width == 0 || max_height == 0 || self.is_empty() {
            return Err(BufferError::InvalidTarget {
                width: max_width,
                height: max_height,
            });
        }
        let (w, h) = fit_dimensions(self.width(), self.height(), max_width, max_height);
        self.resize_nearest(w, h)
    }

    /// Undo a detected upscale by taking the top-left pixel of every cell.
    ///
    /// Cells are laid out exactly as during detection, so remainder pixels
    /// belong to the leading cells.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidTarget`] if the estimate is zero-sized or larger
    /// than this buffer.
    ///
    /// # Example
    ///
    /// ```
    /// use retro_quant::{detect_scale, Color, PixelBuffer};
    ///
    /// let small = PixelBuffer::from_colors(2, 1, &[Color::new(0, 0, 0), Color::new(255, 255, 255)]).unwrap();
    /// let big = small.resize_nearest(8, 4).unwrap();
    /// let estimate = detect_scale(&big).unwrap();
    /// assert_eq!(big.downscale_to(&estimate).unwrap(), small);
    /// ```
    pub fn downscale_to(&self, estimate: &ScaleEstimate) -> Result<PixelBuffer, BufferError> {
        let (width, height) = (estimate.width, estimate.height);
        if width == 0 || height == 0 || width > self.width() || height > self.height() {
            return Err(BufferError::InvalidTarget { width, height });
        }
        let xs = cell_starts(self.width(), width);
        let ys = cell_starts(self.height(), height);

        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for &sy in &ys[..height as usize] {
            for &sx in &xs[..width as usize] {
                data.extend_from_slice(&self.pixel(sx, sy));
            }
        }
        PixelBuffer::new(width, height, data)
    }
}

fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (w, h)
}
