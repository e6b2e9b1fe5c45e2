//! image-artificer: image acquisition, color analysis and letterboxing
//!
//! This crate wraps an image in an [`Artifact`] that knows its dominant
//! color and that color's complement, and provides the edits typically
//! needed to turn an arbitrary picture into a fixed-size asset: resizing
//! and padding onto a solid canvas, and overlaying (optionally tinted)
//! frames or watermarks.
//!
//! # Example
//!
//! ```
//! use image::{DynamicImage, Rgba, RgbaImage};
//! use image_artificer::{Artifact, EditMode, OutputFormat, PaddingColor, Size};
//!
//! let img = RgbaImage::from_pixel(400, 200, Rgba([220, 20, 20, 255]));
//! let mut artifact = Artifact::new(DynamicImage::ImageRgba8(img)).unwrap();
//!
//! // Letterbox onto an 800x800 canvas in the complementary color
//! artifact
//!     .resize_and_pad(Size::new(800, 800), PaddingColor::Complementary, EditMode::InPlace)
//!     .unwrap();
//!
//! let corner = artifact.image().get_pixel(0, 0);
//! assert_eq!(corner.0, artifact.complementary_color().to_rgba().0);
//!
//! let jpeg = artifact.encode(OutputFormat::Jpeg).unwrap();
//! assert!(!jpeg.is_empty());
//! ```
//!
//! # Sources and sinks
//!
//! Images can come from local files, an [`ObjectStore`], a URL through a
//! [`Fetch`] implementation, or the first hit of an [`ImageSearch`].
//! Construct them through an [`Artificer`], which also carries the
//! [`Codec`] and [`DominantColorExtractor`] the artifacts use:
//!
//! ```
//! use image_artificer::{Artificer, CodecConfig, Codec, KmeansExtractor, LocalObjectStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let artificer = Artificer::new()
//!     .with_codec(Codec::new(CodecConfig { jpeg_quality: 80, ..CodecConfig::default() }))
//!     .with_extractor(KmeansExtractor::new().with_quality(4));
//!
//! let store = LocalObjectStore::new(dir.path());
//! assert!(artificer.download(&store, "bucket", "missing.png").is_err());
//! ```
//!
//! # Profiles
//!
//! A sequence of edits can be described as JSON with [`EditProfile`]:
//!
//! ```
//! use image::{DynamicImage, RgbaImage, Rgba};
//! use image_artificer::{Artifact, EditProfile};
//!
//! let profile = EditProfile::from_json(
//!     r#"{ "resizeAndPad": { "width": 64, "height": 32, "padding": "dominant", "inPlace": true } }"#,
//! )
//! .unwrap();
//!
//! let img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
//! let mut artifact = Artifact::new(DynamicImage::ImageRgba8(img)).unwrap();
//! artifact.apply_profile(&profile).unwrap();
//! assert_eq!(artifact.dimensions(), (64, 32));
//! ```

mod artifact;
mod codec;
mod color;
mod compose;
mod dominant;
mod error;
mod profile;
mod source;
mod transparency;

pub use artifact::{Artifact, Artificer, EditMode, Edited};
pub use codec::{Codec, CodecConfig, OutputFormat};
pub use color::{ColorInput, DerivedColors, Rgb, complement_of, complement_of_channels, parse_color};
pub use compose::{
    OverlaySource, PaddingColor, RESAMPLE_FILTER, Size, alpha_blend, apply_overlay, centered_offset,
    fit_within, resize_and_pad, tint_by_luminance,
};
pub use dominant::{DominantColorExtractor, FALLBACK_COLOR, KmeansExtractor, MeanExtractor};
pub use error::{Error, Result};
pub use profile::{ColorSetting, EditProfile, OutputSettings, OverlaySettings, ResizeAndPadSettings};
#[cfg(feature = "http")]
pub use source::HttpFetcher;
pub use source::{
    Fetch, ImageSearch, License, LocalObjectStore, ObjectStore, SearchQuery, read_local,
};
pub use transparency::{has_transparency, rgba_has_transparency};
