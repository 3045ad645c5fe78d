//! Byte-to-color mapping for the Hilbert canvas.
//!
//! A [`ColorSource`] wraps the buffer being drawn and answers "what color is
//! byte `offset`" for one of four [`ColorMode`]s. An optional [`Highlight`]
//! forces a fixed color over a byte range regardless of mode.

use std::fmt;
use std::str::FromStr;

use image::Rgb;

use crate::analysis::{window_entropy, SymbolMap, ENTROPY_BLOCK_SIZE};
use crate::error::{self, Error, Result};

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
/// 0x01-0x1F control bytes.
pub const LOW_GREEN: Rgb<u8> = Rgb([77, 175, 74]);
/// 0x20-0x7E printable ASCII.
pub const ASCII_BLUE: Rgb<u8> = Rgb([16, 114, 184]);
/// 0x7F-0xFE high bytes.
pub const HIGH_RED: Rgb<u8> = Rgb([228, 26, 28]);

/// How bytes are turned into colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Byte class: null, low, ASCII, high, 0xFF.
    Class,
    /// Same byte classes as [`ColorMode::Class`].
    #[default]
    Hilbert,
    /// Grey level equal to the byte value.
    Gradient,
    /// Local entropy: blue for structured data, magenta for random data.
    Entropy,
}

impl ColorMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Hilbert => "hilbert",
            Self::Gradient => "gradient",
            Self::Entropy => "entropy",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Class, Self::Hilbert, Self::Gradient, Self::Entropy]
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                error::config(format!(
                    "unknown color mode '{s}' (expected class, hilbert, gradient or entropy)"
                ))
            })
    }
}

/// Byte range `[start, end)` drawn in a fixed color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub color: Rgb<u8>,
}

impl Highlight {
    pub fn new(start: usize, end: usize, color: Rgb<u8>) -> Self {
        Self { start, end, color }
    }

    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }
}

fn parse_offset(s: &str) -> Result<usize> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| error::config(format!("invalid highlight offset '{s}': {e}")))
}

fn parse_color(s: &str) -> Result<Rgb<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(error::config(format!(
            "invalid highlight color '{s}' (expected RRGGBB)"
        )));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Ok(Rgb([r, g, b])),
        _ => Err(error::config(format!("invalid highlight color '{s}'"))),
    }
}

impl FromStr for Highlight {
    type Err = Error;

    /// Parse `START:END:RRGGBB`; offsets are decimal or `0x` hex.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let [start, end, color] = parts.as_slice() else {
            return Err(error::config(format!(
                "invalid highlight '{s}' (expected START:END:RRGGBB)"
            )));
        };

        let start = parse_offset(start)?;
        let end = parse_offset(end)?;
        if end < start {
            return Err(error::config(format!(
                "highlight end {end} is before start {start}"
            )));
        }

        Ok(Self::new(start, end, parse_color(color)?))
    }
}

/// Color of `byte` by class.
#[inline]
pub fn class_color(byte: u8) -> Rgb<u8> {
    match byte {
        0x00 => BLACK,
        0x01..=0x1F => LOW_GREEN,
        0x20..=0x7E => ASCII_BLUE,
        0x7F..=0xFE => HIGH_RED,
        0xFF => WHITE,
    }
}

/// Grey level equal to `byte`.
#[inline]
pub fn gradient_color(byte: u8) -> Rgb<u8> {
    Rgb([byte, byte, byte])
}

/// Map a normalised entropy score (0 to 1) to a color.
///
/// Blue grows with `e^2`; red stays off until `e > 0.5`, then follows the
/// quartic bump `(4v - 4v^2)^4` of `v = e - 0.5`.
pub fn entropy_color(e: f64) -> Rgb<u8> {
    fn curve(v: f64) -> f64 {
        (4.0 * v - 4.0 * v * v).powi(4).max(0.0)
    }

    let r = if e > 0.5 { curve(e - 0.5) } else { 0.0 };
    let b = e * e;
    // Float to int casts saturate
    Rgb([(255.0 * r) as u8, 0, (255.0 * b) as u8])
}

/// Buffer plus color mode, sampled by the renderer.
#[derive(Debug, Clone)]
pub struct ColorSource<'a> {
    data: &'a [u8],
    mode: ColorMode,
    highlight: Option<Highlight>,
    symbols: SymbolMap,
}

impl<'a> ColorSource<'a> {
    /// Wrap `data` for drawing in `mode`.
    ///
    /// # Errors
    /// [`Error::BufferTooSmallForWindow`] in entropy mode when `data` is shorter
    /// than the entropy window.
    pub fn new(data: &'a [u8], mode: ColorMode, highlight: Option<Highlight>) -> Result<Self> {
        if mode == ColorMode::Entropy && data.len() < ENTROPY_BLOCK_SIZE {
            return Err(Error::BufferTooSmallForWindow {
                len: data.len(),
                block_size: ENTROPY_BLOCK_SIZE,
            });
        }

        Ok(Self {
            data,
            mode,
            highlight,
            symbols: SymbolMap::from_data(data),
        })
    }

    /// Length of the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    #[inline]
    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolMap {
        &self.symbols
    }

    /// Color for the byte at `offset`.
    pub fn color_at(&self, offset: usize) -> Result<Rgb<u8>> {
        let Some(&byte) = self.data.get(offset) else {
            return Err(Error::OffsetOutOfRange {
                offset,
                len: self.data.len(),
            });
        };

        if let Some(highlight) = self.highlight.filter(|h| h.contains(offset)) {
            return Ok(highlight.color);
        }

        match self.mode {
            ColorMode::Class | ColorMode::Hilbert => Ok(class_color(byte)),
            ColorMode::Gradient => Ok(gradient_color(byte)),
            ColorMode::Entropy => {
                let e = window_entropy(self.data, ENTROPY_BLOCK_SIZE, offset, self.symbols.len())?;
                Ok(entropy_color(e))
            }
        }
    }
}
