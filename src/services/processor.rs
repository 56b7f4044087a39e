//! Orchestrates quantization, palette derivation and scale detection behind
//! the two result caches.

use retro_quant::{
    detect_scale, generate_palette, Color, Palette, PaletteMatcher, PixelBuffer, ScaleEstimate,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::ToSchema;

use super::content_hash::content_hash;
use super::result_cache::{CacheKey, CacheStats, CacheWeight, ResultCache};
use crate::error::ProcessError;
use crate::models::{PaletteChoice, ProcessingParams, Resolution, ScalingMode};

/// Most colors reported for an unquantized result
const MAX_REPORTED_COLORS: usize = 256;

/// A finished image together with the palette it uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub buffer: PixelBuffer,
    /// Colors present in `buffer`: palette order for quantized output, first
    /// occurrence otherwise. Empty when an unquantized image has more than
    /// 256 colors.
    pub palette: Vec<Color>,
}

impl CacheWeight for ProcessedImage {
    fn weight(&self) -> usize {
        self.buffer.weight() + self.palette.weight()
    }
}

/// Payloads of the general-purpose cache
#[derive(Debug, Clone, PartialEq)]
pub enum CachePayload {
    /// Median-cut palette derived from an image
    Palette(Vec<Color>),
    /// Scale detection result, including "not scaled"
    Scale(Option<ScaleEstimate>),
}

impl CacheWeight for CachePayload {
    fn weight(&self) -> usize {
        match self {
            CachePayload::Palette(colors) => colors.weight(),
            CachePayload::Scale(estimate) => estimate.weight(),
        }
    }
}

/// Result of [`ImageProcessor::process`]
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub image: Arc<ProcessedImage>,
    /// Whether the result came from the image cache
    pub cached: bool,
}

/// Counters of both caches
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProcessorStats {
    pub image: CacheStats,
    pub general: CacheStats,
}

#[derive(Serialize)]
struct CacheKeyParts<'a, P: Serialize> {
    op: &'static str,
    content: &'a str,
    params: P,
}

/// Runs processing requests through the caches it was constructed with.
pub struct ImageProcessor {
    image_cache: Arc<ResultCache<Arc<ProcessedImage>>>,
    general_cache: Arc<ResultCache<CachePayload>>,
}

impl ImageProcessor {
    pub fn new(
        image_cache: Arc<ResultCache<Arc<ProcessedImage>>>,
        general_cache: Arc<ResultCache<CachePayload>>,
    ) -> Self {
        Self {
            image_cache,
            general_cache,
        }
    }

    fn key<P: Serialize>(op: &'static str, content: &str, params: P) -> Option<CacheKey> {
        match CacheKey::from_params(&CacheKeyParts {
            op,
            content,
            params,
        }) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!(%e, op, "Failed to build cache key, skipping cache");
                None
            }
        }
    }

    /// Resize and quantize `buffer` according to `params`.
    ///
    /// # Errors
    ///
    /// [`ProcessError::Quantize`] for an empty custom palette or when the
    /// image cannot be resized.
    pub fn process(
        &self,
        buffer: &PixelBuffer,
        params: &ProcessingParams,
    ) -> Result<ProcessOutcome, ProcessError> {
        let hash = content_hash(buffer);
        let key = Self::key("process", &hash, params);

        if let Some(image) = key.as_ref().and_then(|k| self.image_cache.get(k)) {
            return Ok(ProcessOutcome {
                image,
                cached: true,
            });
        }

        let resized = resize(buffer, params.resolution, params.scaling)?;
        let image = match &params.palette {
            PaletteChoice::Original => {
                let palette = distinct_colors(&resized, MAX_REPORTED_COLORS).unwrap_or_default();
                ProcessedImage {
                    buffer: resized,
                    palette,
                }
            }
            PaletteChoice::Preset(kind) => quantize(resized, kind.palette()),
            PaletteChoice::Custom(colors) => quantize(resized, Palette::new(colors)?),
            PaletteChoice::Derive { colors } => {
                let palette = self.derived_palette(&hash, params, &resized, *colors)?;
                quantize(resized, palette)
            }
        };

        tracing::info!(
            width = image.buffer.width(),
            height = image.buffer.height(),
            palette = %params.palette,
            colors = image.palette.len(),
            "Processed image"
        );

        let image = Arc::new(image);
        if let Some(key) = key {
            self.image_cache.set(key, image.clone());
        }
        Ok(ProcessOutcome {
            image,
            cached: false,
        })
    }

    /// Median-cut palette of the resized image, memoized in the general
    /// cache.
    fn derived_palette(
        &self,
        hash: &str,
        params: &ProcessingParams,
        resized: &PixelBuffer,
        colors: usize,
    ) -> Result<Palette, ProcessError> {
        let key = Self::key(
            "derive_palette",
            hash,
            (params.resolution, params.scaling, colors),
        );
        if let Some(CachePayload::Palette(cached)) =
            key.as_ref().and_then(|k| self.general_cache.get(k))
        {
            return Ok(Palette::new(&cached)?);
        }

        let palette = generate_palette(resized, colors)?;
        tracing::debug!(requested = colors, derived = palette.len(), "Derived palette");
        if let Some(key) = key {
            self.general_cache
                .set(key, CachePayload::Palette(palette.colors().to_vec()));
        }
        Ok(palette)
    }

    /// Detect a nearest-neighbour upscale. `None` means no scaling was found.
    pub fn detect_scale(&self, buffer: &PixelBuffer) -> Option<ScaleEstimate> {
        let hash = content_hash(buffer);
        let key = Self::key("detect_scale", &hash, ());

        if let Some(CachePayload::Scale(estimate)) =
            key.as_ref().and_then(|k| self.general_cache.get(k))
        {
            return estimate;
        }

        let estimate = detect_scale(buffer);
        match &estimate {
            Some(e) => tracing::info!(
                source_width = buffer.width(),
                source_height = buffer.height(),
                width = e.width,
                height = e.height,
                scale_x = e.scale_x,
                scale_y = e.scale_y,
                "Detected pixel-art upscale"
            ),
            None => tracing::info!(
                width = buffer.width(),
                height = buffer.height(),
                "No upscale detected"
            ),
        }
        if let Some(key) = key {
            self.general_cache.set(key, CachePayload::Scale(estimate));
        }
        estimate
    }

    /// Undo a detected upscale. Returns `None` when the image does not look
    /// upscaled.
    pub fn restore_pixel_art(
        &self,
        buffer: &PixelBuffer,
    ) -> Result<Option<(Arc<ProcessedImage>, ScaleEstimate)>, ProcessError> {
        let Some(estimate) = self.detect_scale(buffer) else {
            return Ok(None);
        };

        let hash = content_hash(buffer);
        let key = Self::key("restore", &hash, ());
        if let Some(image) = key.as_ref().and_then(|k| self.image_cache.get(k)) {
            return Ok(Some((image, estimate)));
        }

        let restored = buffer.downscale_to(&estimate)?;
        let palette = distinct_colors(&restored, MAX_REPORTED_COLORS).unwrap_or_default();
        let image = Arc::new(ProcessedImage {
            buffer: restored,
            palette,
        });
        if let Some(key) = key {
            self.image_cache.set(key, image.clone());
        }
        Ok(Some((image, estimate)))
    }

    pub fn cache_stats(&self) -> ProcessorStats {
        ProcessorStats {
            image: self.image_cache.stats(),
            general: self.general_cache.stats(),
        }
    }
}

fn resize(
    buffer: &PixelBuffer,
    resolution: Resolution,
    scaling: ScalingMode,
) -> Result<PixelBuffer, ProcessError> {
    let resized = match resolution {
        Resolution::Original => buffer.clone(),
        Resolution::Exact { width, height } => match scaling {
            ScalingMode::Stretch => buffer.resize_nearest(width, height)?,
            ScalingMode::Fit => buffer.fit_within(width, height)?,
        },
    };
    Ok(resized)
}

fn quantize(mut buffer: PixelBuffer, palette: Palette) -> ProcessedImage {
    let matcher = PaletteMatcher::new(palette);
    let distinct = matcher.match_in_place(&mut buffer);
    tracing::debug!(
        distinct_colors = distinct,
        palette_size = matcher.palette().len(),
        "Matched pixels to palette"
    );
    let palette = matcher.palette().used_in(&buffer);
    ProcessedImage { buffer, palette }
}

/// Distinct RGB values in first-occurrence order, or `None` if there are
/// more than `limit`.
pub fn distinct_colors(buffer: &PixelBuffer, limit: usize) -> Option<Vec<Color>> {
    let mut seen = HashSet::new();
    let mut colors = Vec::new();
    for p in buffer.pixels() {
        let rgb = [p[0], p[1], p[2]];
        if seen.insert(rgb) {
            if colors.len() == limit {
                return None;
            }
            colors.push(Color::from_bytes(rgb));
        }
    }
    Some(colors)
}
