pub mod palettes;
pub mod quantize;
pub mod scale;

pub use palettes::{handle_cache_stats, handle_palettes, PaletteInfo};
pub use palettes::{__path_handle_cache_stats, __path_handle_palettes};
pub use quantize::{handle_quantize, QuantizeQuery, QuantizeResponse, __path_handle_quantize};
pub use scale::{handle_detect_scale, handle_restore, ScaleResponse};
pub use scale::{__path_handle_detect_scale, __path_handle_restore};

use crate::error::{ApiError, ProcessError};

/// Run CPU-bound work (decode, quantize, encode) off the async runtime.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ProcessError::Task(format!("Processing task failed: {e}")))?
}

/// Reject empty uploads before any work is scheduled.
pub(crate) fn require_body(body: &[u8]) -> Result<(), ApiError> {
    if body.is_empty() {
        return Err(ApiError::EmptyBody);
    }
    Ok(())
}
