//! File-to-file operations behind the one-shot CLI commands.

use anyhow::Context;
use retro_quant::{Color, ScaleEstimate};
use std::path::Path;

use crate::imaging::{decode_png, encode_png};
use crate::models::ProcessingParams;
use crate::services::ImageProcessor;

/// What a file operation produced
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<Color>,
    pub bytes_written: usize,
}

fn read_png(input: &Path) -> anyhow::Result<retro_quant::PixelBuffer> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    decode_png(&bytes).with_context(|| format!("Failed to decode {}", input.display()))
}

fn write_png(
    output: &Path,
    buffer: &retro_quant::PixelBuffer,
    palette: &[Color],
    optimize: bool,
) -> anyhow::Result<FileReport> {
    let png_bytes = encode_png(buffer, palette, optimize)?;
    std::fs::write(output, &png_bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(FileReport {
        width: buffer.width(),
        height: buffer.height(),
        palette: palette.to_vec(),
        bytes_written: png_bytes.len(),
    })
}

/// Quantize `input` and write the result to `output`.
pub fn quantize_file(
    processor: &ImageProcessor,
    input: &Path,
    output: &Path,
    params: &ProcessingParams,
    optimize: bool,
) -> anyhow::Result<FileReport> {
    let buffer = read_png(input)?;
    let outcome = processor.process(&buffer, params)?;
    write_png(
        output,
        &outcome.image.buffer,
        &outcome.image.palette,
        optimize,
    )
}

/// Detect an upscale in `input`.
pub fn detect_file(
    processor: &ImageProcessor,
    input: &Path,
) -> anyhow::Result<Option<ScaleEstimate>> {
    let buffer = read_png(input)?;
    Ok(processor.detect_scale(&buffer))
}

/// Restore `input` to its native resolution. Nothing is written when no
/// upscale is detected.
pub fn restore_file(
    processor: &ImageProcessor,
    input: &Path,
    output: &Path,
    optimize: bool,
) -> anyhow::Result<Option<(FileReport, ScaleEstimate)>> {
    let buffer = read_png(input)?;
    let Some((image, estimate)) = processor.restore_pixel_art(&buffer)? else {
        return Ok(None);
    };
    let report = write_png(output, &image.buffer, &image.palette, optimize)?;
    Ok(Some((report, estimate)))
}
