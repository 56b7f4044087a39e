use crate::buffer::PixelBuffer;
use crate::color::Color;

/// Replace every pixel whose RGB equals `from` with `to`, leaving alpha
/// alone. Returns the number of pixels changed.
///
/// Used when a single palette entry is edited after quantization.
pub fn remap_color(buffer: &mut PixelBuffer, from: Color, to: Color) -> usize {
    let (from, to) = (from.to_bytes(), to.to_bytes());
    let mut changed = 0;
    for pixel in buffer.pixels_mut() {
        if pixel[..3] == from {
            pixel[..3].copy_from_slice(&to);
            changed += 1;
        }
    }
    changed
}
