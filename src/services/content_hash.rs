//! Lightweight content fingerprint for cache keys.
//!
//! Hashes the dimensions, the byte length and an evenly spaced sample of at
//! most [`SAMPLE_PIXELS`] pixels. Two images that differ only in unsampled
//! pixels collide; that trade is accepted for large uploads.

use retro_quant::PixelBuffer;
use sha2::{Digest, Sha256};

/// Maximum number of pixels fed into the hash
pub const SAMPLE_PIXELS: usize = 1024;

/// Fingerprint `buffer` as 32 hex characters.
pub fn content_hash(buffer: &PixelBuffer) -> String {
    let mut hasher = Sha256::new();
    hasher.update(buffer.width().to_le_bytes());
    hasher.update(buffer.height().to_le_bytes());
    hasher.update((buffer.data().len() as u64).to_le_bytes());

    let count = buffer.pixel_count();
    let samples = count.min(SAMPLE_PIXELS);
    let data = buffer.data();
    for i in 0..samples {
        let idx = i * count / samples;
        hasher.update(&data[idx * 4..idx * 4 + 4]);
    }

    let result = hasher.finalize();
    hex::encode(&result[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use retro_quant::Color;

    #[test]
    fn test_hash_is_deterministic() {
        let a = PixelBuffer::filled(10, 10, Color::new(1, 2, 3));
        let b = PixelBuffer::filled(10, 10, Color::new(1, 2, 3));
        assert_eq!(content_hash(&a), content_hash(&b));
        assert_eq!(content_hash(&a).len(), 32);
    }

    #[test]
    fn test_hash_covers_dimensions() {
        let wide = PixelBuffer::filled(20, 5, Color::new(0, 0, 0));
        let tall = PixelBuffer::filled(5, 20, Color::new(0, 0, 0));
        assert_ne!(content_hash(&wide), content_hash(&tall));
    }

    #[test]
    fn test_small_images_hash_every_pixel() {
        let a = PixelBuffer::filled(8, 8, Color::new(0, 0, 0));
        let mut b = a.clone();
        b.set_pixel(7, 7, [0, 0, 1, 255]);
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_alpha_is_hashed() {
        let a = PixelBuffer::filled(2, 2, Color::new(9, 9, 9));
        let mut b = a.clone();
        b.set_pixel(0, 0, [9, 9, 9, 0]);
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_empty_image() {
        let empty = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        assert_eq!(content_hash(&empty).len(), 32);
    }
}
