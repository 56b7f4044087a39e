//! Processing parameters accepted by the HTTP API and the CLI.
//!
//! Every type here has a canonical string form (its `Display`) which is also
//! what it serializes to, so parameters feed directly into cache keys.

use retro_quant::{Color, PaletteKind};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ParamError;

/// Upper bound for derived palettes (fits an 8-bit indexed PNG).
pub const MAX_DERIVED_COLORS: usize = 256;

/// Largest accepted target resolution on either axis.
pub const MAX_TARGET_DIMENSION: u32 = 4096;

/// Which palette the output is reduced to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteChoice {
    /// Keep the source colors
    Original,
    /// One of the built-in retro palettes
    Preset(PaletteKind),
    /// Caller-supplied colors
    Custom(Vec<Color>),
    /// Median-cut palette with this many colors derived from the image
    Derive { colors: usize },
}

impl PaletteChoice {
    /// Build from the wire form: a palette name plus the optional derive
    /// count and custom color list.
    ///
    /// `name` is `original`, `derive`, `custom` or a preset id.
    pub fn from_parts(
        name: &str,
        colors: Option<usize>,
        custom: Option<&str>,
    ) -> Result<Self, ParamError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(PaletteChoice::Original),
            "derive" | "auto" => {
                let count = colors.unwrap_or(16);
                if count == 0 || count > MAX_DERIVED_COLORS {
                    return Err(ParamError::ColorCount {
                        count,
                        max: MAX_DERIVED_COLORS,
                    });
                }
                Ok(PaletteChoice::Derive { colors: count })
            }
            "custom" => {
                let list = custom
                    .filter(|s| !s.trim().is_empty())
                    .ok_or(ParamError::MissingCustomColors)?;
                let hex: Vec<&str> = list.split(',').map(str::trim).collect();
                let palette = retro_quant::Palette::from_hex(&hex)?;
                Ok(PaletteChoice::Custom(palette.into_colors()))
            }
            other => Ok(PaletteChoice::Preset(other.parse()?)),
        }
    }
}

impl fmt::Display for PaletteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteChoice::Original => f.write_str("original"),
            PaletteChoice::Preset(kind) => write!(f, "preset:{kind}"),
            PaletteChoice::Custom(colors) => {
                let hex: Vec<String> = colors.iter().map(|c| c.to_hex()).collect();
                write!(f, "custom:{}", hex.join(","))
            }
            PaletteChoice::Derive { colors } => write!(f, "derive:{colors}"),
        }
    }
}

/// Output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Original,
    Exact { width: u32, height: u32 },
}

impl FromStr for Resolution {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("original") {
            return Ok(Resolution::Original);
        }
        let invalid = || ParamError::Resolution(s.to_string());
        let (w, h) = trimmed
            .split_once(|c| matches!(c, 'x' | 'X' | '×'))
            .ok_or_else(invalid)?;
        let parse = |part: &str| -> Result<u32, ParamError> {
            let part = part.trim();
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        let (width, height) = (parse(w)?, parse(h)?);
        let in_range = |d: u32| (1..=MAX_TARGET_DIMENSION).contains(&d);
        if !in_range(width) || !in_range(height) {
            return Err(invalid());
        }
        Ok(Resolution::Exact { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Original => f.write_str("original"),
            Resolution::Exact { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

/// How an image is brought to a target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMode {
    /// Exactly the target size, aspect ratio ignored
    #[default]
    Stretch,
    /// Largest size inside the target keeping the aspect ratio
    Fit,
}

impl FromStr for ScalingMode {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stretch" => Ok(ScalingMode::Stretch),
            "fit" | "contain" => Ok(ScalingMode::Fit),
            _ => Err(ParamError::Scaling(s.to_string())),
        }
    }
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalingMode::Stretch => "stretch",
            ScalingMode::Fit => "fit",
        })
    }
}

macro_rules! serialize_as_display {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    )*};
}

serialize_as_display!(PaletteChoice, Resolution, ScalingMode);

/// Full parameter set for one processing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingParams {
    pub palette: PaletteChoice,
    pub resolution: Resolution,
    pub scaling: ScalingMode,
}

impl ProcessingParams {
    pub fn new(palette: PaletteChoice) -> Self {
        Self {
            palette,
            resolution: Resolution::Original,
            scaling: ScalingMode::default(),
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_scaling(mut self, scaling: ScalingMode) -> Self {
        self.scaling = scaling;
        self
    }
}
