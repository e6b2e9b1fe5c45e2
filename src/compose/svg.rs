//! SVG rasterisation for vector overlays using resvg/usvg.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use super::{Size, unpremultiply};
use crate::error::{Error, Result};

/// Renders SVG markup stretched to exactly `size`.
///
/// The drawing is scaled independently on each axis, matching how raster
/// overlays are stretched onto their base.
pub fn render_svg(svg_data: &str, size: Size) -> Result<RgbaImage> {
    let size = size.validate()?;
    let tree = parse_svg(svg_data)?;

    let svg_size = tree.size();
    let sx = size.width as f32 / svg_size.width();
    let sy = size.height as f32 / svg_size.height();

    let mut pixmap = Pixmap::new(size.width, size.height)
        .ok_or_else(|| Error::Svg(format!("cannot allocate {}x{} pixmap", size.width, size.height)))?;
    resvg::render(&tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Parses SVG markup, failing with [`Error::Svg`] if it is malformed.
pub fn parse_svg(svg_data: &str) -> Result<Tree> {
    Tree::from_str(svg_data, &Options::default()).map_err(|e| Error::Svg(e.to_string()))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    RgbaImage::from_fn(pixmap.width(), pixmap.height(), |x, y| {
        // tiny_skia stores premultiplied alpha
        pixmap
            .pixel(x, y)
            .map(|p| unpremultiply(p.red(), p.green(), p.blue(), p.alpha()))
            .unwrap_or(Rgba([0, 0, 0, 0]))
    })
}
