//! Error types for palette operations
//!
//! This module provides error types for color parsing and palette validation.

use std::fmt;
use std::num::ParseIntError;

/// Error type for parsing hex color strings.
///
/// Returned when parsing a hex color string fails, either due to
/// invalid length or invalid hexadecimal characters.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for palette validation.
///
/// Duplicate entries are legal, so the only structural failure is an empty
/// palette. Unknown preset names and unparseable hex strings are reported
/// here as well since both arise while building a palette.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// No colors provided in palette
    EmptyPalette,
    /// Invalid hex color string at the given position
    ParseColor {
        /// Index of the offending entry
        index: usize,
        /// Underlying parse failure
        source: ParseColorError,
    },
    /// Preset name that does not match any built-in palette
    UnknownPreset(String),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => {
                write!(f, "palette cannot be empty")
            }
            PaletteError::ParseColor { index, source } => {
                write!(f, "invalid color at index {}: {}", index, source)
            }
            PaletteError::UnknownPreset(name) => {
                write!(f, "unknown palette preset: {}", name)
            }
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::ParseColor { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            PaletteError::EmptyPalette.to_string(),
            "palette cannot be empty"
        );
        assert_eq!(
            PaletteError::UnknownPreset("vga".to_string()).to_string(),
            "unknown palette preset: vga"
        );
        assert_eq!(
            PaletteError::ParseColor {
                index: 2,
                source: ParseColorError::InvalidLength
            }
            .to_string(),
            "invalid color at index 2: invalid hex color length (expected 3 or 6 characters)"
        );
    }

    #[test]
    fn test_source_chain() {
        let err = PaletteError::ParseColor {
            index: 0,
            source: ParseColorError::InvalidLength,
        };
        assert!(err.source().is_some());
        assert!(PaletteError::EmptyPalette.source().is_none());
    }
}
