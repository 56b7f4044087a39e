use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use retro_quant::{BufferError, PaletteError, QuantizeError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Empty request body")]
    EmptyBody,

    #[error("Invalid parameter: {0}")]
    Param(#[from] ParamError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),
}

/// Rejected request parameters (palette, resolution, scaling).
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("invalid resolution '{0}' (expected 'original' or WIDTHxHEIGHT)")]
    Resolution(String),

    #[error("invalid scaling mode '{0}' (expected 'stretch' or 'fit')")]
    Scaling(String),

    #[error("invalid output format '{0}' (expected 'png' or 'json')")]
    Format(String),

    #[error("color count must be between 1 and {max}, got {count}")]
    ColorCount { count: usize, max: usize },

    #[error("custom palette requires a list of hex colors")]
    MissingCustomColors,

    #[error("{0}")]
    Palette(#[from] PaletteError),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Image too large: {width}x{height} (max {max}x{max})")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("Invalid pixel data: {0}")]
    Buffer(#[from] BufferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{0}")]
    Quantize(#[from] QuantizeError),

    #[error("task failed: {0}")]
    Task(String),
}

impl From<PaletteError> for ProcessError {
    fn from(err: PaletteError) -> Self {
        ProcessError::Quantize(err.into())
    }
}

impl From<BufferError> for ProcessError {
    fn from(err: BufferError) -> Self {
        ProcessError::Quantize(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::EmptyBody | ApiError::Param(_) => StatusCode::BAD_REQUEST,
            ApiError::Image(ImageError::Decode(_) | ImageError::Buffer(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Image(ImageError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Image(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Process(ProcessError::Quantize(_)) => StatusCode::BAD_REQUEST,
            ApiError::Process(ProcessError::Task(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
