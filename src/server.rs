//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    http::header::CACHE_CONTROL,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{ImageProcessor, ResultCache};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<ImageProcessor>,
    pub config: Arc<AppConfig>,
}

/// Create application state: both result caches sized from `config` and
/// the processor that owns them.
pub fn create_app_state(config: AppConfig) -> AppState {
    let image_cache = Arc::new(ResultCache::new(
        "image",
        config.cache.image.to_cache_config(),
    ));
    let general_cache = Arc::new(ResultCache::new(
        "general",
        config.cache.general.to_cache_config(),
    ));

    tracing::debug!(
        image_max_bytes = image_cache.config().max_size,
        image_max_entries = image_cache.config().max_entries,
        general_max_bytes = general_cache.config().max_size,
        general_max_entries = general_cache.config().max_entries,
        "Created result caches"
    );

    AppState {
        processor: Arc::new(ImageProcessor::new(image_cache, general_cache)),
        config: Arc::new(config),
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. Responses
/// depend on the uploaded body, so they are marked `no-store`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/api/quantize", post(handle_quantize))
        .route("/api/scale/detect", post(handle_detect_scale))
        .route("/api/scale/restore", post(handle_restore))
        .route("/api/palettes", get(api::handle_palettes))
        .route("/api/cache/stats", get(handle_cache_stats))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            axum::http::HeaderValue::from_static("no-store"),
        ))
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_quantize(
    axum::extract::State(state): axum::extract::State<AppState>,
    query: axum::extract::Query<api::QuantizeQuery>,
    body: axum::body::Bytes,
) -> Result<axum::response::Response, ApiError> {
    api::handle_quantize(
        axum::extract::State(state.processor),
        axum::extract::State(state.config),
        query,
        body,
    )
    .await
}

async fn handle_detect_scale(
    axum::extract::State(state): axum::extract::State<AppState>,
    body: axum::body::Bytes,
) -> Result<axum::Json<api::ScaleResponse>, ApiError> {
    api::handle_detect_scale(axum::extract::State(state.processor), body).await
}

async fn handle_restore(
    axum::extract::State(state): axum::extract::State<AppState>,
    body: axum::body::Bytes,
) -> Result<axum::response::Response, ApiError> {
    api::handle_restore(
        axum::extract::State(state.processor),
        axum::extract::State(state.config),
        body,
    )
    .await
}

async fn handle_cache_stats(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<crate::services::ProcessorStats> {
    api::handle_cache_stats(axum::extract::State(state.processor)).await
}
