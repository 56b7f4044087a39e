//! Upscale detection and grid validation.

use std::fmt;

use super::search::{column_runs, estimate_scale, quantize_key, row_runs};
use crate::buffer::{cell_starts, PixelBuffer};

/// Maximum share of pixels allowed to differ from their cell's reference
/// pixel before a candidate grid is rejected.
pub const MISMATCH_TOLERANCE: f64 = 0.015;

/// Scales at or below this on both axes count as "not scaled".
pub const MIN_SCALE: f64 = 1.02;

/// A detected pre-upscale resolution and the per-axis factors that produced
/// the analysed image from it.
///
/// `scale_x` is always `source_width / width` (and likewise for y), so an
/// exact integer upscale reports the exact integer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleEstimate {
    /// Detected original width
    pub width: u32,
    /// Detected original height
    pub height: u32,
    /// Horizontal upscale factor
    pub scale_x: f64,
    /// Vertical upscale factor
    pub scale_y: f64,
}

impl fmt::Display for ScaleEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} (scale {:.2}x{:.2})",
            self.width, self.height, self.scale_x, self.scale_y
        )
    }
}

/// Estimate the nearest-neighbour upscale that produced `buffer`.
///
/// Returns `None` when no scaling is found: uniform or noisy images, scales
/// of at most [`MIN_SCALE`] on both axes, or a candidate grid whose cells are
/// not homogeneous within [`MISMATCH_TOLERANCE`].
///
/// # Algorithm
///
/// 1. Pixels are reduced to 5-5-5 bit keys.
/// 2. Runs of identical columns (every row must match) and identical rows
///    are measured; a run covering the whole axis is ignored.
/// 3. Each axis gets a scale from its runs: the common value if all runs
///    agree, otherwise a 128-step coarse sweep followed by a 128-step
///    refinement within ±0.75 of the coarse optimum. An axis without
///    informative runs borrows the other axis's scale.
/// 4. The candidate size is `round(dim / scale)`; a candidate of zero
///    rejects, a candidate at or above `dim` leaves that axis unscaled.
/// 5. The grid is validated cell by cell against each cell's top-left pixel.
///
/// # Example
///
/// ```
/// use retro_quant::{detect_scale, Color, PixelBuffer};
///
/// let colors = [Color::new(0, 0, 0), Color::new(255, 255, 255)];
/// let small = PixelBuffer::from_colors(2, 1, &colors).unwrap();
/// let big = small.resize_nearest(6, 3).unwrap();
///
/// let estimate = detect_scale(&big).unwrap();
/// assert_eq!((estimate.width, estimate.height), (2, 1));
/// assert_eq!(estimate.scale_x, 3.0);
/// ```
pub fn detect_scale(buffer: &PixelBuffer) -> Option<ScaleEstimate> {
    let (width, height) = (buffer.width(), buffer.height());
    if width == 0 || height == 0 {
        return None;
    }
    let (w, h) = (width as usize, height as usize);
    let keys: Vec<u16> = buffer.pixels().map(quantize_key).collect();

    let scale_x = estimate_scale(&column_runs(&keys, w, h));
    let scale_y = estimate_scale(&row_runs(&keys, w, h));
    let (cells_x, cells_y) = match (scale_x, scale_y) {
        (Some(x), Some(y)) => (candidate_cells(width, x)?, candidate_cells(height, y)?),
        (Some(x), None) => (candidate_cells(width, x)?, borrowed_cells(height, x)),
        (None, Some(y)) => (borrowed_cells(width, y), candidate_cells(height, y)?),
        (None, None) => return None,
    };
    if cells_x == width && cells_y == height {
        return None;
    }

    if !grid_is_homogeneous(&keys, width, height, cells_x, cells_y) {
        return None;
    }

    let estimate = ScaleEstimate {
        width: cells_x,
        height: cells_y,
        scale_x: width as f64 / cells_x as f64,
        scale_y: height as f64 / cells_y as f64,
    };
    if estimate.scale_x <= MIN_SCALE && estimate.scale_y <= MIN_SCALE {
        return None;
    }
    Some(estimate)
}

/// Reduced size along one axis; `None` if it rounds to zero, `dim` if the
/// axis cannot shrink.
fn candidate_cells(dim: u32, scale: f64) -> Option<u32> {
    let cells = (dim as f64 / scale).round();
    if cells < 1.0 {
        return None;
    }
    Some((cells as u32).min(dim))
}

/// Reduced size along an axis without runs of its own, using the other
/// axis's scale. Never fewer than one cell.
fn borrowed_cells(dim: u32, scale: f64) -> u32 {
    candidate_cells(dim, scale).unwrap_or(1)
}

fn grid_is_homogeneous(keys: &[u16], width: u32, height: u32, cells_x: u32, cells_y: u32) -> bool {
    let xs = cell_starts(width, cells_x);
    let ys = cell_starts(height, cells_y);
    let w = width as usize;
    let limit = (width as f64 * height as f64 * MISMATCH_TOLERANCE).floor() as usize;

    let mut mismatches = 0usize;
    for cy in ys.windows(2) {
        for cx in xs.windows(2) {
            let reference = keys[cy[0] as usize * w + cx[0] as usize];
            for y in cy[0]..cy[1] {
                let row = &keys[y as usize * w..];
                mismatches += row[cx[0] as usize..cx[1] as usize]
                    .iter()
                    .filter(|&&k| k != reference)
                    .count();
            }
            if mismatches > limit {
                return false;
            }
        }
    }
    true
}
