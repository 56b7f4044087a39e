//! PNG decoding to RGBA and palette-aware encoding.

use retro_quant::{Color, PixelBuffer};
use std::collections::HashMap;
use std::io::Cursor;

use crate::error::ImageError;

/// Largest accepted width or height of an uploaded image
pub const MAX_DIMENSION: u32 = 8192;

/// Decode a PNG of any color type into an RGBA8 buffer.
///
/// Palette and low bit depth images are expanded, 16-bit channels stripped.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ImageError::TooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    let data = &buf[..frame.buffer_size()];

    let rgba: Vec<u8> = match frame.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(ImageError::Decode(
                "indexed image was not expanded".to_string(),
            ))
        }
    };

    Ok(PixelBuffer::new(width, height, rgba)?)
}

/// Encode `buffer` as PNG.
///
/// Opaque images whose pixels all come from at most 256 colors are written
/// as indexed PNG at the smallest bit depth that fits. `palette` sets the
/// PLTE order; when empty the colors are collected from the image. Anything
/// else is written as RGBA8. With `optimize` the result is recompressed by
/// oxipng.
pub fn encode_png(
    buffer: &PixelBuffer,
    palette: &[Color],
    optimize: bool,
) -> Result<Vec<u8>, ImageError> {
    let (color_type, bit_depth, plte, packed) = match index_pixels(buffer, palette) {
        Some((colors, indices)) => {
            let (depth, bits) = match colors.len() {
                0..=2 => (png::BitDepth::One, 1),
                3..=4 => (png::BitDepth::Two, 2),
                5..=16 => (png::BitDepth::Four, 4),
                _ => (png::BitDepth::Eight, 8),
            };
            let plte: Vec<u8> = colors.iter().flat_map(|c| c.to_bytes()).collect();
            let packed = if bits == 8 {
                indices
            } else {
                pack_nbits(&indices, buffer.width(), bits)
            };
            (png::ColorType::Indexed, depth, Some(plte), packed)
        }
        None => (
            png::ColorType::Rgba,
            png::BitDepth::Eight,
            None,
            buffer.data().to_vec(),
        ),
    };

    let png_bytes = write_png(buffer, color_type, bit_depth, plte.as_deref(), &packed)?;
    if !optimize {
        return Ok(png_bytes);
    }

    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);
    Ok(optimized)
}

/// Palette and per-pixel indices, or `None` if the image needs RGBA.
fn index_pixels(buffer: &PixelBuffer, palette: &[Color]) -> Option<(Vec<Color>, Vec<u8>)> {
    if buffer.is_empty() || !buffer.is_opaque() {
        return None;
    }

    let mut colors: Vec<Color> = Vec::new();
    let mut lookup: HashMap<[u8; 3], u8> = HashMap::new();
    for c in palette.iter().take(256) {
        let rgb = c.to_bytes();
        if !lookup.contains_key(&rgb) {
            lookup.insert(rgb, colors.len() as u8);
            colors.push(Color::from_bytes(rgb));
        }
    }
    let fixed = !palette.is_empty();

    let mut indices = Vec::with_capacity(buffer.pixel_count());
    for p in buffer.pixels() {
        let rgb = [p[0], p[1], p[2]];
        let idx = match lookup.get(&rgb) {
            Some(&idx) => idx,
            None if fixed || colors.len() == 256 => return None,
            None => {
                let idx = colors.len() as u8;
                lookup.insert(rgb, idx);
                colors.push(Color::from_bytes(rgb));
                idx
            }
        };
        indices.push(idx);
    }
    Some((colors, indices))
}

fn write_png(
    buffer: &PixelBuffer,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    packed: &[u8],
) -> Result<Vec<u8>, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, buffer.width(), buffer.height());
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        writer
            .write_image_data(packed)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
