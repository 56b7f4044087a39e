//! Frequency-weighted median cut.

use std::collections::HashMap;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::palette::{Palette, PaletteError};

/// A distinct RGB value and the number of pixels carrying it.
#[derive(Debug, Clone, Copy)]
struct Entry {
    rgb: [u8; 3],
    weight: u64,
}

/// A set of entries forming one cell of the partitioned RGB cube.
#[derive(Debug)]
struct ColorBox {
    entries: Vec<Entry>,
}

impl ColorBox {
    /// Per-channel `max - min`.
    fn ranges(&self) -> [u8; 3] {
        let mut lo = [u8::MAX; 3];
        let mut hi = [0u8; 3];
        for e in &self.entries {
            for c in 0..3 {
                lo[c] = lo[c].min(e.rgb[c]);
                hi[c] = hi[c].max(e.rgb[c]);
            }
        }
        [
            hi[0].saturating_sub(lo[0]),
            hi[1].saturating_sub(lo[1]),
            hi[2].saturating_sub(lo[2]),
        ]
    }

    /// Largest channel range and its channel; earlier channels win ties.
    fn widest(&self) -> (u8, usize) {
        let ranges = self.ranges();
        let mut axis = 0;
        for c in 1..3 {
            if ranges[c] > ranges[axis] {
                axis = c;
            }
        }
        (ranges[axis], axis)
    }

    /// Split at the weighted median of the widest channel. Both halves are
    /// non-empty; `self` keeps the lower half.
    fn split(&mut self) -> ColorBox {
        let (_, axis) = self.widest();
        self.entries
            .sort_unstable_by_key(|e| (e.rgb[axis], e.rgb));

        let total: u64 = self.entries.iter().map(|e| e.weight).sum();
        let mut cumulative = 0;
        let mut cut = self.entries.len() - 1;
        for (i, e) in self.entries.iter().enumerate() {
            cumulative += e.weight;
            if cumulative * 2 >= total {
                cut = i + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.entries.len() - 1);
        ColorBox {
            entries: self.entries.split_off(cut),
        }
    }

    fn average(&self) -> Color {
        let total: u64 = self.entries.iter().map(|e| e.weight).sum();
        let mut sums = [0u64; 3];
        for e in &self.entries {
            for c in 0..3 {
                sums[c] += e.rgb[c] as u64 * e.weight;
            }
        }
        let avg = |s: u64| ((s + total / 2) / total) as u8;
        Color::new(avg(sums[0]), avg(sums[1]), avg(sums[2]))
    }
}

/// Derive a palette of at most `count` colors from the pixels of `buffer`.
///
/// Every pixel contributes regardless of alpha.
///
/// # Ordering
///
/// - If the image has `count` or fewer distinct colors, exactly those colors
///   are returned, most frequent first, ties by ascending `(r, g, b)`. No
///   placeholder entries are added.
/// - Otherwise boxes are split until there are `count` of them. The box with
///   the largest channel range is split next (first box on ties); its lower
///   half stays in place and the upper half is inserted right after it. The
///   palette lists each box's frequency-weighted average color in box order.
///
/// # Errors
///
/// [`PaletteError::EmptyPalette`] when `count` is zero or the image has no
/// pixels.
///
/// # Example
///
/// ```
/// use retro_quant::{generate_palette, Color, PixelBuffer};
///
/// let colors = [Color::new(255, 0, 0), Color::new(255, 0, 0), Color::new(0, 0, 255)];
/// let image = PixelBuffer::from_colors(3, 1, &colors).unwrap();
/// let palette = generate_palette(&image, 16).unwrap();
/// assert_eq!(palette.colors(), &[Color::new(255, 0, 0), Color::new(0, 0, 255)]);
/// ```
pub fn generate_palette(buffer: &PixelBuffer, count: usize) -> Result<Palette, PaletteError> {
    if count == 0 || buffer.is_empty() {
        return Err(PaletteError::EmptyPalette);
    }

    let mut histogram: HashMap<[u8; 3], u64> = HashMap::new();
    for p in buffer.pixels() {
        *histogram.entry([p[0], p[1], p[2]]).or_insert(0) += 1;
    }
    let mut entries: Vec<Entry> = histogram
        .into_iter()
        .map(|(rgb, weight)| Entry { rgb, weight })
        .collect();

    if entries.len() <= count {
        entries.sort_unstable_by(|a, b| b.weight.cmp(&a.weight).then(a.rgb.cmp(&b.rgb)));
        let colors = entries.iter().map(|e| Color::from_bytes(e.rgb)).collect();
        return Ok(Palette::from_nonempty(colors));
    }

    entries.sort_unstable_by_key(|e| e.rgb);
    let mut boxes = vec![ColorBox { entries }];
    while boxes.len() < count {
        let mut target = None;
        let mut best_range = 0;
        for (i, b) in boxes.iter().enumerate() {
            let (range, _) = b.widest();
            if range > best_range {
                best_range = range;
                target = Some(i);
            }
        }
        // Only single-color boxes left
        let Some(i) = target else { break };
        let upper = boxes[i].split();
        boxes.insert(i + 1, upper);
    }

    let colors = boxes.iter().map(ColorBox::average).collect();
    Ok(Palette::from_nonempty(colors))
}
