//! Built-in retro palettes.
//!
//! Each [`PaletteKind`] maps to a fixed, ordered color table emulating a
//! console or computer. The string identifiers are stable and used as
//! cache-key components and on the command line.

use std::fmt;
use std::str::FromStr;

use super::error::PaletteError;
use super::palette::Palette;
use crate::color::Color;

const MONO: [Color; 2] = [Color::from_hex_u32(0x000000), Color::from_hex_u32(0xffffff)];

const GRAY4: [Color; 4] = [
    Color::from_hex_u32(0x000000),
    Color::from_hex_u32(0x555555),
    Color::from_hex_u32(0xaaaaaa),
    Color::from_hex_u32(0xffffff),
];

// DMG-01 green LCD, darkest to lightest
const GAME_BOY: [Color; 4] = [
    Color::from_hex_u32(0x0f380f),
    Color::from_hex_u32(0x306230),
    Color::from_hex_u32(0x8bac0f),
    Color::from_hex_u32(0x9bbc0f),
];

// IBM CGA 16-color (RGBI with the brown fix at index 6)
const CGA: [Color; 16] = [
    Color::from_hex_u32(0x000000),
    Color::from_hex_u32(0x0000aa),
    Color::from_hex_u32(0x00aa00),
    Color::from_hex_u32(0x00aaaa),
    Color::from_hex_u32(0xaa0000),
    Color::from_hex_u32(0xaa00aa),
    Color::from_hex_u32(0xaa5500),
    Color::from_hex_u32(0xaaaaaa),
    Color::from_hex_u32(0x555555),
    Color::from_hex_u32(0x5555ff),
    Color::from_hex_u32(0x55ff55),
    Color::from_hex_u32(0x55ffff),
    Color::from_hex_u32(0xff5555),
    Color::from_hex_u32(0xff55ff),
    Color::from_hex_u32(0xffff55),
    Color::from_hex_u32(0xffffff),
];

const PICO8: [Color; 16] = [
    Color::from_hex_u32(0x000000),
    Color::from_hex_u32(0x1d2b53),
    Color::from_hex_u32(0x7e2553),
    Color::from_hex_u32(0x008751),
    Color::from_hex_u32(0xab5236),
    Color::from_hex_u32(0x5f574f),
    Color::from_hex_u32(0xc2c3c7),
    Color::from_hex_u32(0xfff1e8),
    Color::from_hex_u32(0xff004d),
    Color::from_hex_u32(0xffa300),
    Color::from_hex_u32(0xffec27),
    Color::from_hex_u32(0x00e436),
    Color::from_hex_u32(0x29adff),
    Color::from_hex_u32(0x83769c),
    Color::from_hex_u32(0xff77a8),
    Color::from_hex_u32(0xffccaa),
];

// VIC-II, "Pepto" measurements
const C64: [Color; 16] = [
    Color::from_hex_u32(0x000000),
    Color::from_hex_u32(0xffffff),
    Color::from_hex_u32(0x68372b),
    Color::from_hex_u32(0x70a4b2),
    Color::from_hex_u32(0x6f3d86),
    Color::from_hex_u32(0x588d43),
    Color::from_hex_u32(0x352879),
    Color::from_hex_u32(0xb8c76f),
    Color::from_hex_u32(0x6f4f25),
    Color::from_hex_u32(0x433900),
    Color::from_hex_u32(0x9a6759),
    Color::from_hex_u32(0x444444),
    Color::from_hex_u32(0x6c6c6c),
    Color::from_hex_u32(0x9ad284),
    Color::from_hex_u32(0x6c5eb5),
    Color::from_hex_u32(0x959595),
];

// Normal then bright; bright black is identical to black and omitted
const ZX_SPECTRUM: [Color; 15] = [
    Color::from_hex_u32(0x000000),
    Color::from_hex_u32(0x0000d7),
    Color::from_hex_u32(0xd70000),
    Color::from_hex_u32(0xd700d7),
    Color::from_hex_u32(0x00d700),
    Color::from_hex_u32(0x00d7d7),
    Color::from_hex_u32(0xd7d700),
    Color::from_hex_u32(0xd7d7d7),
    Color::from_hex_u32(0x0000ff),
    Color::from_hex_u32(0xff0000),
    Color::from_hex_u32(0xff00ff),
    Color::from_hex_u32(0x00ff00),
    Color::from_hex_u32(0x00ffff),
    Color::from_hex_u32(0xffff00),
    Color::from_hex_u32(0xffffff),
];

/// Identifier of a built-in fixed palette.
///
/// # Example
///
/// ```
/// use retro_quant::PaletteKind;
///
/// let kind: PaletteKind = "gameboy".parse().unwrap();
/// assert_eq!(kind, PaletteKind::GameBoy);
/// assert_eq!(kind.palette().len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteKind {
    /// 1-bit black and white
    Mono,
    /// 2-bit grey ramp
    Gray4,
    /// Nintendo Game Boy (DMG) greens
    GameBoy,
    /// IBM CGA 16-color
    Cga,
    /// PICO-8 fantasy console
    Pico8,
    /// Commodore 64
    C64,
    /// Sinclair ZX Spectrum
    ZxSpectrum,
}

impl PaletteKind {
    /// Every built-in palette, in display order.
    pub const ALL: [PaletteKind; 7] = [
        PaletteKind::Mono,
        PaletteKind::Gray4,
        PaletteKind::GameBoy,
        PaletteKind::Cga,
        PaletteKind::Pico8,
        PaletteKind::C64,
        PaletteKind::ZxSpectrum,
    ];

    /// Stable identifier used in cache keys, URLs and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteKind::Mono => "mono",
            PaletteKind::Gray4 => "gray4",
            PaletteKind::GameBoy => "gameboy",
            PaletteKind::Cga => "cga",
            PaletteKind::Pico8 => "pico8",
            PaletteKind::C64 => "c64",
            PaletteKind::ZxSpectrum => "zx-spectrum",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            PaletteKind::Mono => "1-bit Monochrome",
            PaletteKind::Gray4 => "4-level Grey",
            PaletteKind::GameBoy => "Game Boy (DMG)",
            PaletteKind::Cga => "CGA",
            PaletteKind::Pico8 => "PICO-8",
            PaletteKind::C64 => "Commodore 64",
            PaletteKind::ZxSpectrum => "ZX Spectrum",
        }
    }

    /// The fixed color table.
    pub fn colors(self) -> &'static [Color] {
        match self {
            PaletteKind::Mono => &MONO,
            PaletteKind::Gray4 => &GRAY4,
            PaletteKind::GameBoy => &GAME_BOY,
            PaletteKind::Cga => &CGA,
            PaletteKind::Pico8 => &PICO8,
            PaletteKind::C64 => &C64,
            PaletteKind::ZxSpectrum => &ZX_SPECTRUM,
        }
    }

    /// Build a matchable [`Palette`] from the color table.
    pub fn palette(self) -> Palette {
        Palette::from_nonempty(self.colors().to_vec())
    }
}

impl fmt::Display for PaletteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteKind {
    type Err = PaletteError;

    /// Case-insensitive; `_` and `-` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        PaletteKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| PaletteError::UnknownPreset(s.to_string()))
    }
}
