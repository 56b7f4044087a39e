pub mod content_hash;
pub mod processor;
pub mod result_cache;

pub use content_hash::content_hash;
pub use processor::{
    distinct_colors, CachePayload, ImageProcessor, ProcessOutcome, ProcessedImage, ProcessorStats,
};
pub use result_cache::{CacheConfig, CacheKey, CacheStats, CacheWeight, ResultCache};
