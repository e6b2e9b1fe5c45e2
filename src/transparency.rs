//! Alpha channel inspection.

use image::{DynamicImage, RgbaImage};

/// Returns true if the image has an alpha channel and at least one pixel
/// is not fully opaque.
///
/// Images without an alpha channel are always opaque. The scan stops at the
/// first transparent pixel.
pub fn has_transparency(img: &DynamicImage) -> bool {
    if !img.color().has_alpha() {
        return false;
    }

    match img {
        DynamicImage::ImageRgba8(buf) => rgba_has_transparency(buf),
        DynamicImage::ImageLumaA8(buf) => buf.pixels().any(|p| p[1] < u8::MAX),
        DynamicImage::ImageLumaA16(buf) => buf.pixels().any(|p| p[1] < u16::MAX),
        DynamicImage::ImageRgba16(buf) => buf.pixels().any(|p| p[3] < u16::MAX),
        other => other.to_rgba32f().pixels().any(|p| p[3] < 1.0),
    }
}

/// [`has_transparency`] for an image already in RGBA8 form.
pub fn rgba_has_transparency(img: &RgbaImage) -> bool {
    img.pixels().any(|p| p[3] < u8::MAX)
}
