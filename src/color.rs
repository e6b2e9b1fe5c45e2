//! RGB color values, hex parsing and hue complements.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use palette::{encoding, Hsv, IntoColor, Srgb};

use crate::error::{Error, Result};

// ============================================================================
// Rgb
// ============================================================================

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from untyped integer channels.
    ///
    /// Fails with [`Error::InvalidColor`] unless there are exactly three
    /// channels, each within `0..=255`.
    pub fn from_channels(channels: &[i64]) -> Result<Self> {
        let [r, g, b] = channels else {
            return Err(Error::InvalidColor(format!(
                "expected 3 channels, got {}",
                channels.len()
            )));
        };

        let channel = |value: i64| {
            u8::try_from(value).map_err(|_| {
                Error::InvalidColor(format!("channel {value} is outside 0..=255"))
            })
        };

        Ok(Self::new(channel(*r)?, channel(*g)?, channel(*b)?))
    }

    pub fn as_tuple(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Returns the color as a fully opaque RGBA pixel.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, u8::MAX])
    }

    /// Formats the color as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Shorthand for [`complement_of`].
    pub fn complement(self) -> Self {
        complement_of(self)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

// ============================================================================
// DerivedColors
// ============================================================================

/// A dominant color paired with its hue complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedColors {
    pub dominant: Rgb,
    pub complementary: Rgb,
}

impl DerivedColors {
    pub fn from_dominant(dominant: Rgb) -> Self {
        Self {
            dominant,
            complementary: complement_of(dominant),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Any of the accepted ways of spelling a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorInput {
    /// Six hex digits with an optional leading `#`.
    Hex(String),
    /// An untyped channel list, validated on parse.
    Channels(Vec<i64>),
    /// An already valid color.
    Rgb(Rgb),
}

impl From<&str> for ColorInput {
    fn from(s: &str) -> Self {
        Self::Hex(s.to_string())
    }
}

impl From<String> for ColorInput {
    fn from(s: String) -> Self {
        Self::Hex(s)
    }
}

impl From<Rgb> for ColorInput {
    fn from(color: Rgb) -> Self {
        Self::Rgb(color)
    }
}

impl From<(i64, i64, i64)> for ColorInput {
    fn from((r, g, b): (i64, i64, i64)) -> Self {
        Self::Channels(vec![r, g, b])
    }
}

impl From<[i64; 3]> for ColorInput {
    fn from(channels: [i64; 3]) -> Self {
        Self::Channels(channels.to_vec())
    }
}

impl From<Vec<i64>> for ColorInput {
    fn from(channels: Vec<i64>) -> Self {
        Self::Channels(channels)
    }
}

/// Parses a hex string or channel triple into an [`Rgb`].
pub fn parse_color(input: impl Into<ColorInput>) -> Result<Rgb> {
    match input.into() {
        ColorInput::Hex(s) => parse_hex(&s),
        ColorInput::Channels(channels) => Rgb::from_channels(&channels),
        ColorInput::Rgb(color) => Ok(color),
    }
}

fn parse_hex(input: &str) -> Result<Rgb> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(format!(
            "{input:?} is not a 6-digit hex color"
        )));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|e| Error::InvalidColor(format!("{input:?}: {e}")))
    };

    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

// ============================================================================
// Complements
// ============================================================================

/// Rotates the hue of `color` by 180° in HSV, keeping saturation and value.
///
/// Channels are converted back by truncating `channel * 255`, so applying
/// the complement twice may drift by one step per channel.
pub fn complement_of(color: Rgb) -> Rgb {
    let rgb = Srgb::new(
        color.r as f64 / 255.0,
        color.g as f64 / 255.0,
        color.b as f64 / 255.0,
    );
    let mut hsv: Hsv<encoding::Srgb, f64> = rgb.into_color();
    hsv.hue += 180.0;
    let rotated: Srgb<f64> = hsv.into_color();

    Rgb::new(
        truncate_channel(rotated.red),
        truncate_channel(rotated.green),
        truncate_channel(rotated.blue),
    )
}

/// Complement of an untyped channel list; validates it first.
pub fn complement_of_channels(channels: &[i64]) -> Result<Rgb> {
    Rgb::from_channels(channels).map(complement_of)
}

/// Added before truncating so float noise from the HSV round trip does not
/// cost a whole step.
///
/// This departs from plain `trunc(channel * 255)`: a channel that lands a
/// hair below an integer (e.g. `14.999999999`) becomes 15 rather than 14,
/// so results can differ from plain truncation by one in a channel. The
/// double-complement stays within ±1 of the input either way.
const TRUNCATION_EPSILON: f64 = 1e-9;

fn truncate_channel(value: f64) -> u8 {
    (value * 255.0 + TRUNCATION_EPSILON).clamp(0.0, 255.0) as u8
}

// ============================================================================
// Tests
// ============================================================================
