//! Nearest-palette-entry remapping under CIEDE2000.

use std::collections::HashMap;

use crate::buffer::PixelBuffer;
use crate::color::{Color, Lab};
use crate::palette::{Palette, PaletteError};

/// Remaps pixels to the perceptually closest entry of a fixed palette.
///
/// Palette entries are converted to Lab once at construction. Each call
/// keeps its own memo of already-matched RGB triples, so the search runs once
/// per distinct color rather than once per pixel and the matcher itself
/// stays stateless and shareable across threads.
///
/// Alpha is never modified. When two entries are equally close, the one with
/// the lower index is chosen.
///
/// # Example
///
/// ```
/// use retro_quant::{Color, PaletteKind, PaletteMatcher, PixelBuffer};
///
/// let matcher = PaletteMatcher::new(PaletteKind::Mono.palette());
/// let input = PixelBuffer::filled(2, 2, Color::new(30, 30, 30));
/// let output = matcher.match_buffer(&input);
/// assert_eq!(output.pixel(0, 0), [0, 0, 0, 255]);
/// ```
#[derive(Debug, Clone)]
pub struct PaletteMatcher {
    palette: Palette,
}

impl PaletteMatcher {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Build directly from colors.
    ///
    /// # Errors
    ///
    /// [`PaletteError::EmptyPalette`] when `colors` is empty.
    pub fn from_colors(colors: &[Color]) -> Result<Self, PaletteError> {
        Palette::new(colors).map(Self::new)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Index of the closest palette entry for one color.
    pub fn nearest_index(&self, color: Color) -> usize {
        self.palette.find_nearest(Lab::from(color)).0
    }

    /// Return a remapped copy of `buffer`.
    pub fn match_buffer(&self, buffer: &PixelBuffer) -> PixelBuffer {
        let mut output = buffer.clone();
        self.match_in_place(&mut output);
        output
    }

    /// Remap `buffer` in place. Returns the number of distinct RGB triples
    /// encountered.
    pub fn match_in_place(&self, buffer: &mut PixelBuffer) -> usize {
        let mut memo: HashMap<[u8; 3], [u8; 3]> = HashMap::new();
        for pixel in buffer.pixels_mut() {
            let key = [pixel[0], pixel[1], pixel[2]];
            let target = *memo.entry(key).or_insert_with(|| {
                let idx = self.nearest_index(Color::from_bytes(key));
                self.palette.color(idx).to_bytes()
            });
            pixel[..3].copy_from_slice(&target);
        }
        memo.len()
    }
}
