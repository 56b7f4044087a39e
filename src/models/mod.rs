pub mod config;
pub mod params;

pub use config::{AppConfig, CacheBounds, CacheSettings, DefaultsConfig};
pub use params::{PaletteChoice, ProcessingParams, Resolution, ScalingMode};
