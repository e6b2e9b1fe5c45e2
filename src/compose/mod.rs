//! Compositing primitives shared by the padding and overlay edits.
//!
//! - [`pad`]: letterbox an image onto a solid canvas of a fixed size
//! - [`overlay`]: stretch, optionally tint, and composite an overlay
//! - [`svg`]: rasterise vector overlays
//!
//! All compositing here is source-over on straight (non-premultiplied)
//! RGBA8 buffers.

pub mod overlay;
pub mod pad;
pub mod svg;

pub use overlay::{OverlaySource, apply_overlay, tint_by_luminance};
pub use pad::{PaddingColor, centered_offset, fit_within, resize_and_pad};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::transparency::rgba_has_transparency;

/// Filter used for every resample in this crate.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

// ============================================================================
// Size
// ============================================================================

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of an existing image.
    pub fn of(img: &RgbaImage) -> Self {
        Self::new(img.width(), img.height())
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Fails with [`Error::InvalidSize`] if either dimension is zero.
    pub fn validate(self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(800, 800)
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

// ============================================================================
// Resampling
// ============================================================================

/// Resamples `img` to exactly `size` with [`RESAMPLE_FILTER`].
///
/// Returns a plain copy when the size already matches. Images with any
/// transparency are filtered with premultiplied alpha, so the color of
/// fully transparent pixels does not bleed into soft edges.
pub fn resample(img: &RgbaImage, size: Size) -> RgbaImage {
    if Size::of(img) == size {
        return img.clone();
    }
    if !rgba_has_transparency(img) {
        return imageops::resize(img, size.width, size.height, RESAMPLE_FILTER);
    }

    let premultiplied =
        RgbaImage::from_fn(img.width(), img.height(), |x, y| premultiply(*img.get_pixel(x, y)));
    let mut resized = imageops::resize(&premultiplied, size.width, size.height, RESAMPLE_FILTER);
    for pixel in resized.pixels_mut() {
        *pixel = unpremultiply(pixel[0], pixel[1], pixel[2], pixel[3]);
    }
    resized
}

/// Scales the color channels by alpha.
pub(crate) fn premultiply(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let scale = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
    Rgba([scale(r), scale(g), scale(b), a])
}

/// Unpremultiplies a premultiplied alpha pixel.
pub(crate) fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> Rgba<u8> {
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let a_f = a as f32 / 255.0;
    let channel = |c: u8| (c as f32 / a_f).round().min(255.0) as u8;
    Rgba([channel(r), channel(g), channel(b), a])
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination). Source pixels
/// falling outside the destination are skipped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x + sx as i32;
        let dy = y + sy as i32;

        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
        *dst_pixel = alpha_blend(*src_pixel, *dst_pixel);
    }
}

/// Alpha blends two RGBA pixels (source over destination).
pub fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        u8::MAX => return src,
        0 => return dst,
        _ => {}
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
