//! Overlay stretching, luminance tinting and compositing.

use std::fs;
use std::path::Path;

use image::{DynamicImage, Rgba, RgbaImage};

use super::svg::{parse_svg, render_svg};
use super::{Size, composite_over, resample};
use crate::codec::Codec;
use crate::color::Rgb;
use crate::error::{Error, Result};

// ============================================================================
// OverlaySource
// ============================================================================

/// An image to lay over an artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlaySource {
    /// A decoded raster, stretched to the base size when needed.
    Raster(RgbaImage),
    /// SVG markup, rasterised directly at the base size.
    Svg(String),
}

impl OverlaySource {
    pub fn svg(markup: impl Into<String>) -> Self {
        Self::Svg(markup.into())
    }

    /// Loads an overlay from disk.
    ///
    /// Files with an `.svg` extension are parsed and kept as markup;
    /// anything else is decoded with `codec`.
    pub fn from_path(path: impl AsRef<Path>, codec: &Codec) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.display().to_string()));
        }

        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        if is_svg {
            let markup = fs::read_to_string(path)?;
            parse_svg(&markup)?;
            return Ok(Self::Svg(markup));
        }

        let decoded = codec.decode(&fs::read(path)?)?;
        Ok(Self::Raster(decoded.to_rgba8()))
    }

    /// Produces an RGBA overlay of exactly `size`.
    pub fn rasterize(&self, size: Size) -> Result<RgbaImage> {
        match self {
            Self::Raster(img) => Ok(resample(img, size)),
            Self::Svg(markup) => render_svg(markup, size),
        }
    }
}

impl From<RgbaImage> for OverlaySource {
    fn from(img: RgbaImage) -> Self {
        Self::Raster(img)
    }
}

impl From<DynamicImage> for OverlaySource {
    fn from(img: DynamicImage) -> Self {
        Self::Raster(img.to_rgba8())
    }
}

// ============================================================================
// Tinting
// ============================================================================

/// Recolors `overlay` toward `tint`, weighted by each pixel's luminance.
///
/// Bright pixels take the tint, dark pixels keep their own color, so the
/// original shading survives. The alpha channel is copied unchanged.
///
/// Luminance uses the ITU-R 601 weights (see [`luma`]), not the Rec. 709
/// weights of `image::imageops::grayscale`.
pub fn tint_by_luminance(overlay: &RgbaImage, tint: Rgb) -> RgbaImage {
    RgbaImage::from_fn(overlay.width(), overlay.height(), |x, y| {
        let src = overlay.get_pixel(x, y);
        let weight = luma(src) as u32;
        let mix = |t: u8, s: u8| {
            ((t as u32 * weight + s as u32 * (255 - weight) + 127) / 255) as u8
        };
        Rgba([
            mix(tint.r, src[0]),
            mix(tint.g, src[1]),
            mix(tint.b, src[2]),
            src[3],
        ])
    })
}

/// ITU-R 601-2 luma, `L = R·299/1000 + G·587/1000 + B·114/1000`, in 16-bit
/// fixed point with rounding.
pub fn luma(pixel: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

// ============================================================================
// Apply
// ============================================================================

/// Stretches `overlay` to the size of `base`, optionally tints it, and
/// composites it over `base` in place.
pub fn apply_overlay(base: &mut RgbaImage, overlay: &OverlaySource, tint: Option<Rgb>) -> Result<()> {
    let size = Size::of(base);
    let mut fitted = overlay.rasterize(size)?;

    if let Some(color) = tint {
        fitted = tint_by_luminance(&fitted, color);
    }
    log::debug!(
        "overlay {}x{}, tint {}",
        size.width,
        size.height,
        tint.map(|c| c.to_hex()).unwrap_or_else(|| "none".into())
    );

    composite_over(base, &fitted, 0, 0);
    Ok(())
}
