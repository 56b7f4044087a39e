//! Ordered palette with precomputed Lab values and nearest-color matching.

use std::collections::HashSet;

use super::error::PaletteError;
use crate::buffer::PixelBuffer;
use crate::color::{Color, Lab};

/// An ordered list of colors used as a quantization target.
///
/// Insertion order is significant for display and round-trips but not for
/// match quality. Duplicate entries are legal; when two entries are equally
/// close to a pixel the lower index wins, so a later duplicate is never
/// selected by [`find_nearest()`](Palette::find_nearest).
///
/// # Precomputation
///
/// Every entry is converted to [`Lab`] once at construction time so the
/// per-pixel search only evaluates CIEDE2000.
///
/// # Example
///
/// ```
/// use retro_quant::{Color, Palette};
///
/// let palette = Palette::new(&[Color::new(0, 0, 0), Color::new(255, 255, 255)]).unwrap();
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
    labs: Vec<Lab>,
}

impl Palette {
    /// Create a palette from colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] if `colors` is empty.
    pub fn new(colors: &[Color]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self::from_nonempty(colors.to_vec()))
    }

    /// Build from a vector already known to be non-empty.
    pub(crate) fn from_nonempty(colors: Vec<Color>) -> Self {
        debug_assert!(!colors.is_empty(), "palette must not be empty");
        let labs = colors.iter().map(|&c| Lab::from(c)).collect();
        Self { colors, labs }
    }

    /// Create a palette from hex color strings such as `"#FF0000"` or `"F00"`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] naming the first invalid entry, or
    /// [`PaletteError::EmptyPalette`] for an empty list.
    ///
    /// # Example
    ///
    /// ```
    /// use retro_quant::Palette;
    ///
    /// let palette = Palette::from_hex(&["#0f380f", "#306230", "#8bac0f", "#9bbc0f"]).unwrap();
    /// assert_eq!(palette.len(), 4);
    /// ```
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .enumerate()
            .map(|(index, s)| {
                s.as_ref()
                    .parse::<Color>()
                    .map_err(|source| PaletteError::ParseColor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`: empty palettes are rejected at construction time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the color at the given index.
    #[inline]
    pub fn color(&self, idx: usize) -> Color {
        self.colors[idx]
    }

    /// Get the precomputed Lab value at the given index.
    #[inline]
    pub fn lab(&self, idx: usize) -> Lab {
        self.labs[idx]
    }

    /// All colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Consume the palette, returning its colors.
    pub fn into_colors(self) -> Vec<Color> {
        self.colors
    }

    /// Find the palette entry closest to `color` under CIEDE2000.
    ///
    /// Returns `(index, distance)`. Ties resolve to the lowest index; callers
    /// may rely on this ordering.
    ///
    /// # Example
    ///
    /// ```
    /// use retro_quant::{Color, Lab, Palette};
    ///
    /// let palette = Palette::new(&[Color::new(0, 0, 0), Color::new(255, 255, 255)]).unwrap();
    /// let (idx, _) = palette.find_nearest(Lab::from(Color::new(230, 230, 230)));
    /// assert_eq!(idx, 1);
    /// ```
    #[inline]
    pub fn find_nearest(&self, color: Lab) -> (usize, f64) {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;

        for (i, &entry) in self.labs.iter().enumerate() {
            let dist = color.delta_e(entry);
            // Strict comparison keeps the first of equally distant entries
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        (best_idx, best_dist)
    }

    /// Entries whose RGB value occurs in `buffer`, in palette order.
    ///
    /// Each distinct RGB value is reported once (first occurrence wins).
    pub fn used_in(&self, buffer: &PixelBuffer) -> Vec<Color> {
        let present: HashSet<[u8; 3]> = buffer.pixels().map(|p| [p[0], p[1], p[2]]).collect();
        let mut reported = HashSet::new();
        self.colors
            .iter()
            .filter(|c| present.contains(&c.to_bytes()) && reported.insert(c.to_bytes()))
            .copied()
            .collect()
    }
}
