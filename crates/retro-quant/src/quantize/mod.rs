//! Palette matching and palette derivation.

mod generator;
mod matcher;
mod remap;

pub use generator::generate_palette;
pub use matcher::PaletteMatcher;
pub use remap::remap_color;
