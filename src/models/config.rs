use serde::Deserialize;
use std::path::Path;

use crate::services::CacheConfig;

const MIB: usize = 1024 * 1024;

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Result cache bounds
    pub cache: CacheSettings,

    /// Parameter defaults for requests that omit them
    pub defaults: DefaultsConfig,

    /// Largest accepted request body in MiB
    pub max_upload_mb: usize,

    /// Re-compress PNG responses with oxipng
    pub optimize_png: bool,
}

/// Bounds for the two result caches
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    /// Processed-image cache
    pub image: CacheBounds,
    /// General-purpose cache (derived palettes, scale estimates)
    pub general: CacheBounds,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CacheBounds {
    pub max_size_mb: usize,
    pub max_entries: usize,
}

impl CacheBounds {
    pub fn to_cache_config(self) -> CacheConfig {
        CacheConfig::new(self.max_size_mb.saturating_mul(MIB), self.max_entries)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        let image = CacheConfig::image_processing();
        let general = CacheConfig::general();
        Self {
            image: CacheBounds {
                max_size_mb: image.max_size / MIB,
                max_entries: image.max_entries,
            },
            general: CacheBounds {
                max_size_mb: general.max_size / MIB,
                max_entries: general.max_entries,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Palette used when a request names none
    pub palette: String,
    /// Color count for derived palettes
    pub colors: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            palette: "pico8".to_string(),
            colors: 16,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache: CacheSettings::default(),
            defaults: DefaultsConfig::default(),
            max_upload_mb: 20,
            optimize_png: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        image_cache_mb = config.cache.image.max_size_mb,
                        general_cache_mb = config.cache.general.max_size_mb,
                        default_palette = %config.defaults.palette,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse configuration from YAML text. Missing fields take defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(MIB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.cache.image.max_size_mb, 100);
        assert_eq!(config.cache.image.max_entries, 50);
        assert_eq!(config.cache.general.max_size_mb, 20);
        assert_eq!(config.cache.general.max_entries, 200);
        assert_eq!(config.defaults.palette, "pico8");
        assert_eq!(config.defaults.colors, 16);
        assert_eq!(config.max_upload_bytes(), 20 * MIB);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
cache:
  general:
    max_size_mb: 5
    max_entries: 10
defaults:
  palette: gameboy
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.cache.general.max_size_mb, 5);
        assert_eq!(config.cache.general.max_entries, 10);
        assert_eq!(config.cache.image, CacheSettings::default().image);
        assert_eq!(config.defaults.palette, "gameboy");
        assert_eq!(config.defaults.colors, 16);
        assert!(config.optimize_png);
    }

    #[test]
    fn test_cache_bounds_to_config() {
        let bounds = CacheBounds {
            max_size_mb: 3,
            max_entries: 7,
        };
        let config = bounds.to_cache_config();
        assert_eq!(config.max_size, 3 * MIB);
        assert_eq!(config.max_entries, 7);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/retrokit.yaml")));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_invalid_yaml_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache: [not, a, map").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_upload_mb: 4\noptimize_png: false").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config.max_upload_mb, 4);
        assert!(!config.optimize_png);
    }
}
