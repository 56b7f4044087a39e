//! Test fixtures: synthetic PNG images.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use retro_quant::{Color, PixelBuffer};
use retrokit::imaging::encode_png;

/// Encode a buffer without optimization
pub fn png_bytes(buffer: &PixelBuffer) -> Vec<u8> {
    encode_png(buffer, &[], false).expect("Failed to encode fixture PNG")
}

/// Horizontal/vertical RGB gradient, every pixel distinct on both axes
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    let colors: Vec<Color> = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                Color::new(
                    (x * 255 / width.max(1)) as u8,
                    (y * 255 / height.max(1)) as u8,
                    128,
                )
            })
        })
        .collect();
    PixelBuffer::from_colors(width, height, &colors).unwrap()
}

/// Colors of [`sprite`]
pub const SPRITE_COLORS: [Color; 4] = [
    Color::new(20, 12, 28),
    Color::new(208, 70, 72),
    Color::new(109, 170, 44),
    Color::new(222, 238, 214),
];

/// 10x12 four-color sprite. Neighbouring rows and columns always differ,
/// so it is at its native resolution.
pub fn sprite() -> PixelBuffer {
    let colors: Vec<Color> = (0..12u32)
        .flat_map(|y| (0..10u32).map(move |x| SPRITE_COLORS[((x + 2 * y) % 4) as usize]))
        .collect();
    PixelBuffer::from_colors(10, 12, &colors).unwrap()
}

/// [`sprite`] enlarged by an integer factor with nearest-neighbour sampling
pub fn upscaled_sprite(factor: u32) -> PixelBuffer {
    let small = sprite();
    small
        .resize_nearest(small.width() * factor, small.height() * factor)
        .unwrap()
}

/// Random opaque noise from a fixed seed
pub fn noise(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; (width * height * 4) as usize];
    for px in data.chunks_exact_mut(4) {
        px[0] = rng.gen();
        px[1] = rng.gen();
        px[2] = rng.gen();
        px[3] = 255;
    }
    PixelBuffer::new(width, height, data).unwrap()
}
