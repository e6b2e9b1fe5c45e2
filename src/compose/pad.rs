//! Letterboxing onto a solid canvas.

use std::str::FromStr;

use image::RgbaImage;

use super::{Size, composite_over, resample};
use crate::color::{DerivedColors, Rgb, parse_color};
use crate::error::{Error, Result};
use crate::transparency::rgba_has_transparency;

// ============================================================================
// PaddingColor
// ============================================================================

/// Background used around a letterboxed image.
///
/// Ignored when the scaled image has any transparency: the canvas is then
/// always opaque white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingColor {
    /// The artifact's dominant color.
    #[default]
    Dominant,
    /// The artifact's complementary color.
    Complementary,
    /// A fixed color.
    Color(Rgb),
}

impl PaddingColor {
    /// Picks the concrete color for this mode.
    pub fn resolve(&self, colors: DerivedColors) -> Rgb {
        match self {
            Self::Dominant => colors.dominant,
            Self::Complementary => colors.complementary,
            Self::Color(color) => *color,
        }
    }
}

impl From<Rgb> for PaddingColor {
    fn from(color: Rgb) -> Self {
        Self::Color(color)
    }
}

impl FromStr for PaddingColor {
    type Err = Error;

    /// Accepts `dominant`, `complementary` (any case) or a hex color.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("dominant") {
            return Ok(Self::Dominant);
        }
        if trimmed.eq_ignore_ascii_case("complementary") {
            return Ok(Self::Complementary);
        }

        let looks_hex = trimmed.starts_with('#')
            || (trimmed.len() == 6 && trimmed.bytes().all(|b| b.is_ascii_hexdigit()));
        if looks_hex {
            return parse_color(trimmed).map(Self::Color);
        }

        Err(Error::InvalidPaddingMode(s.to_string()))
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Largest size with the aspect ratio of `original` that fits in `target`.
///
/// The wider side (relative to the target) drives the other, which is
/// rounded to the nearest pixel and kept within `1..=target`.
pub fn fit_within(original: Size, target: Size) -> Size {
    let original_aspect = original.aspect_ratio();

    if original_aspect > target.aspect_ratio() {
        let height = (target.width as f64 / original_aspect).round() as u32;
        Size::new(target.width, height.clamp(1, target.height))
    } else {
        let width = (target.height as f64 * original_aspect).round() as u32;
        Size::new(width.clamp(1, target.width), target.height)
    }
}

/// Top-left offset that centers `inner` in `outer`.
///
/// Odd remainders round down, so the image sits one pixel toward the
/// top-left.
pub fn centered_offset(inner: Size, outer: Size) -> (u32, u32) {
    (
        outer.width.saturating_sub(inner.width) / 2,
        outer.height.saturating_sub(inner.height) / 2,
    )
}

// ============================================================================
// Resize and pad
// ============================================================================

/// Scales `img` to fit `target` without cropping and centers it on an
/// opaque canvas of exactly `target`.
pub fn resize_and_pad(
    img: &RgbaImage,
    target: Size,
    padding: PaddingColor,
    colors: DerivedColors,
) -> Result<RgbaImage> {
    let target = target.validate()?;
    let source = Size::of(img).validate()?;

    let scaled_size = fit_within(source, target);
    let scaled = resample(img, scaled_size);

    let background = if rgba_has_transparency(&scaled) {
        Rgb::WHITE
    } else {
        padding.resolve(colors)
    };
    log::debug!(
        "padding {}x{} -> {}x{} inside {}x{} on {}",
        source.width,
        source.height,
        scaled_size.width,
        scaled_size.height,
        target.width,
        target.height,
        background
    );

    let mut canvas = RgbaImage::from_pixel(target.width, target.height, background.to_rgba());
    let (x, y) = centered_offset(scaled_size, target);
    composite_over(&mut canvas, &scaled, x as i32, y as i32);

    Ok(canvas)
}
