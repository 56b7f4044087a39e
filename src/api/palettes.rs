use axum::{extract::State, response::Json};
use retro_quant::PaletteKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::services::{ImageProcessor, ProcessorStats};

/// A built-in palette
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PaletteInfo {
    /// Identifier accepted by the `palette` parameter
    pub id: String,
    pub name: String,
    /// Entries as `#rrggbb`, in palette order
    pub colors: Vec<String>,
}

impl From<PaletteKind> for PaletteInfo {
    fn from(kind: PaletteKind) -> Self {
        Self {
            id: kind.as_str().to_string(),
            name: kind.display_name().to_string(),
            colors: kind.colors().iter().map(|c| c.to_hex()).collect(),
        }
    }
}

/// List built-in palettes
#[utoipa::path(
    get,
    path = "/api/palettes",
    responses(
        (status = 200, description = "Built-in palettes", body = Vec<PaletteInfo>),
    ),
    tag = "Palettes"
)]
pub async fn handle_palettes() -> Json<Vec<PaletteInfo>> {
    Json(PaletteKind::ALL.into_iter().map(PaletteInfo::from).collect())
}

/// Result cache statistics
#[utoipa::path(
    get,
    path = "/api/cache/stats",
    responses(
        (status = 200, description = "Counters for the image and general caches", body = ProcessorStats),
    ),
    tag = "Cache"
)]
pub async fn handle_cache_stats(
    State(processor): State<Arc<ImageProcessor>>,
) -> Json<ProcessorStats> {
    Json(processor.cache_stats())
}
