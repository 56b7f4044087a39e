use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
};
use base64::Engine;
use retro_quant::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::{require_body, run_blocking};
use crate::error::{ApiError, ParamError};
use crate::imaging::{decode_png, encode_png};
use crate::models::{AppConfig, PaletteChoice, ProcessingParams, Resolution, ScalingMode};
use crate::services::ImageProcessor;

/// Query parameters for the quantize endpoint
#[derive(Debug, Default, Deserialize)]
pub struct QuantizeQuery {
    /// Palette name: a preset id, `original`, `derive` or `custom`
    #[serde(default)]
    pub palette: Option<String>,
    /// Color count for `derive`
    #[serde(default)]
    pub colors: Option<usize>,
    /// Comma-separated hex colors for `custom`
    #[serde(default)]
    pub custom: Option<String>,
    /// `original` or `WIDTHxHEIGHT`
    #[serde(default)]
    pub resolution: Option<String>,
    /// `stretch` or `fit`
    #[serde(default)]
    pub scaling: Option<String>,
    /// `png` (default) or `json`
    #[serde(default)]
    pub format: Option<String>,
}

/// JSON variant of a quantize result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuantizeResponse {
    pub width: u32,
    pub height: u32,
    /// Colors used by the output, as `#rrggbb`
    pub palette: Vec<String>,
    /// Whether the result was served from cache
    pub cached: bool,
    /// Output PNG as a `data:` URL
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Png,
    Json,
}

impl QuantizeQuery {
    /// Resolve query parameters, filling gaps from the configured defaults.
    pub fn to_params(&self, config: &AppConfig) -> Result<ProcessingParams, ParamError> {
        let name = self
            .palette
            .as_deref()
            .unwrap_or(config.defaults.palette.as_str());
        let palette = PaletteChoice::from_parts(
            name,
            Some(self.colors.unwrap_or(config.defaults.colors)),
            self.custom.as_deref(),
        )?;
        let resolution = match self.resolution.as_deref() {
            Some(r) => r.parse()?,
            None => Resolution::Original,
        };
        let scaling = match self.scaling.as_deref() {
            Some(s) => s.parse()?,
            None => ScalingMode::default(),
        };
        Ok(ProcessingParams::new(palette)
            .with_resolution(resolution)
            .with_scaling(scaling))
    }

    fn output_format(&self) -> Result<OutputFormat, ParamError> {
        match self.format.as_deref().map(str::trim) {
            None | Some("") => Ok(OutputFormat::Png),
            Some(f) if f.eq_ignore_ascii_case("png") => Ok(OutputFormat::Png),
            Some(f) if f.eq_ignore_ascii_case("json") => Ok(OutputFormat::Json),
            Some(f) => Err(ParamError::Format(f.to_string())),
        }
    }
}

pub(crate) fn hex_list(colors: &[Color]) -> String {
    colors
        .iter()
        .map(|c| c.to_hex())
        .collect::<Vec<_>>()
        .join(",")
}

/// Quantize an uploaded PNG
///
/// Resizes the image if requested and reduces it to the selected palette.
/// The PNG response carries the used colors in `X-Palette` and the cache
/// outcome in `X-Cache`.
#[utoipa::path(
    post,
    path = "/api/quantize",
    request_body(content = Vec<u8>, description = "PNG image", content_type = "image/png"),
    responses(
        (status = 200, description = "Quantized PNG, or a QuantizeResponse JSON body with format=json", content_type = "image/png"),
        (status = 400, description = "Invalid image or parameters"),
        (status = 413, description = "Image too large"),
    ),
    params(
        ("palette" = Option<String>, Query, description = "Preset id, 'original', 'derive' or 'custom' (default from config)"),
        ("colors" = Option<usize>, Query, description = "Color count for 'derive' (1-256)"),
        ("custom" = Option<String>, Query, description = "Comma-separated hex colors for 'custom'"),
        ("resolution" = Option<String>, Query, description = "'original' or WIDTHxHEIGHT"),
        ("scaling" = Option<String>, Query, description = "'stretch' (default) or 'fit'"),
        ("format" = Option<String>, Query, description = "'png' (default) or 'json'"),
    ),
    tag = "Quantize"
)]
pub async fn handle_quantize(
    State(processor): State<Arc<ImageProcessor>>,
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<QuantizeQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    require_body(&body)?;
    let params = query.to_params(&config)?;
    let format = query.output_format()?;
    let optimize = config.optimize_png;

    tracing::debug!(
        palette = %params.palette,
        resolution = %params.resolution,
        scaling = %params.scaling,
        bytes = body.len(),
        "Quantize request received"
    );

    let (outcome, png_bytes) = run_blocking(move || {
        let buffer = decode_png(&body)?;
        let outcome = processor.process(&buffer, &params)?;
        let png_bytes = encode_png(&outcome.image.buffer, &outcome.image.palette, optimize)?;
        Ok((outcome, png_bytes))
    })
    .await?;

    let palette = hex_list(&outcome.image.palette);
    let cache = if outcome.cached { "hit" } else { "miss" };

    match format {
        OutputFormat::Png => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (header::CONTENT_LENGTH, png_bytes.len().to_string()),
                (HeaderName::from_static("x-palette"), palette),
                (HeaderName::from_static("x-cache"), cache.to_string()),
            ],
            Bytes::from(png_bytes),
        )
            .into_response()),
        OutputFormat::Json => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&png_bytes);
            Ok(Json(QuantizeResponse {
                width: outcome.image.buffer.width(),
                height: outcome.image.buffer.height(),
                palette: outcome.image.palette.iter().map(|c| c.to_hex()).collect(),
                cached: outcome.cached,
                image: format!("data:image/png;base64,{encoded}"),
            })
            .into_response())
        }
    }
}
