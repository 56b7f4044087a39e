use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
};
use retro_quant::ScaleEstimate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::quantize::hex_list;
use super::{require_body, run_blocking};
use crate::error::ApiError;
use crate::imaging::{decode_png, encode_png};
use crate::models::AppConfig;
use crate::services::ImageProcessor;

/// Result of scale detection
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ScaleResponse {
    /// Whether a nearest-neighbour upscale was found
    pub detected: bool,
    pub source_width: u32,
    pub source_height: u32,
    /// Native (pre-upscale) width
    pub width: Option<u32>,
    /// Native (pre-upscale) height
    pub height: Option<u32>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
}

impl ScaleResponse {
    fn new(source_width: u32, source_height: u32, estimate: Option<ScaleEstimate>) -> Self {
        Self {
            detected: estimate.is_some(),
            source_width,
            source_height,
            width: estimate.map(|e| e.width),
            height: estimate.map(|e| e.height),
            scale_x: estimate.map(|e| e.scale_x),
            scale_y: estimate.map(|e| e.scale_y),
        }
    }
}

/// Detect pixel-art upscaling
///
/// Reports the native resolution and per-axis scale factors of an image that
/// was enlarged with nearest-neighbour sampling. `detected` is false when
/// the image does not look upscaled.
#[utoipa::path(
    post,
    path = "/api/scale/detect",
    request_body(content = Vec<u8>, description = "PNG image", content_type = "image/png"),
    responses(
        (status = 200, description = "Detection result", body = ScaleResponse),
        (status = 400, description = "Invalid image"),
        (status = 413, description = "Image too large"),
    ),
    tag = "Scale"
)]
pub async fn handle_detect_scale(
    State(processor): State<Arc<ImageProcessor>>,
    body: Bytes,
) -> Result<Json<ScaleResponse>, ApiError> {
    require_body(&body)?;

    let response = run_blocking(move || {
        let buffer = decode_png(&body)?;
        let estimate = processor.detect_scale(&buffer);
        Ok(ScaleResponse::new(buffer.width(), buffer.height(), estimate))
    })
    .await?;

    Ok(Json(response))
}

/// Restore pixel art to its native resolution
///
/// Returns the downscaled PNG with `X-Scale-Detected: true` and the factors
/// in `X-Scale`. If no upscale is found the upload is returned unchanged with
/// `X-Scale-Detected: false`.
#[utoipa::path(
    post,
    path = "/api/scale/restore",
    request_body(content = Vec<u8>, description = "PNG image", content_type = "image/png"),
    responses(
        (status = 200, description = "Restored (or unchanged) PNG", content_type = "image/png"),
        (status = 400, description = "Invalid image"),
        (status = 413, description = "Image too large"),
    ),
    tag = "Scale"
)]
pub async fn handle_restore(
    State(processor): State<Arc<ImageProcessor>>,
    State(config): State<Arc<AppConfig>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    require_body(&body)?;
    let optimize = config.optimize_png;

    let restored = run_blocking(move || {
        let buffer = decode_png(&body)?;
        match processor.restore_pixel_art(&buffer)? {
            Some((image, estimate)) => {
                let png_bytes = encode_png(&image.buffer, &image.palette, optimize)?;
                Ok(Ok((png_bytes, estimate, hex_list(&image.palette))))
            }
            None => Ok(Err(body)),
        }
    })
    .await?;

    let detected = HeaderName::from_static("x-scale-detected");
    let response = match restored {
        Ok((png_bytes, estimate, palette)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (header::CONTENT_LENGTH, png_bytes.len().to_string()),
                (detected, "true".to_string()),
                (
                    HeaderName::from_static("x-scale"),
                    format!("{:.3}x{:.3}", estimate.scale_x, estimate.scale_y),
                ),
                (HeaderName::from_static("x-palette"), palette),
            ],
            Bytes::from(png_bytes),
        )
            .into_response(),
        Err(original) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (header::CONTENT_LENGTH, original.len().to_string()),
                (detected, "false".to_string()),
            ],
            original,
        )
            .into_response(),
    };
    Ok(response)
}
