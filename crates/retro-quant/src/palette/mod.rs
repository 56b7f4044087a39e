//! Palette types and utilities
//!
//! This module provides the ordered [`Palette`] used as a matching target,
//! the built-in retro palettes in [`PaletteKind`], and error types for
//! parsing and validation.

mod error;
mod palette;
mod presets;

pub use error::{PaletteError, ParseColorError};
pub use palette::Palette;
pub use presets::PaletteKind;
