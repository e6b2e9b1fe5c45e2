//! Byte-level decode and encode, configured explicitly per [`Codec`].

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, Limits};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// OutputFormat
// ============================================================================

/// Formats an artifact can be persisted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
        }
    }

    /// Preferred file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    /// Guesses the format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            other => Err(Error::UnsupportedFormat(format!(
                "{other:?} is not one of jpeg, png, webp"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Webp => "WEBP",
        })
    }
}

// ============================================================================
// CodecConfig
// ============================================================================

/// Decoder and encoder settings.
///
/// Which formats may be decoded is part of the configuration rather than
/// global state; a payload in any other format is rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecConfig {
    /// Formats accepted by [`Codec::decode`].
    pub decode_formats: Vec<ImageFormat>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Upper bound on decoder allocations, in bytes.
    pub max_alloc: Option<u64>,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            decode_formats: vec![
                ImageFormat::Jpeg,
                ImageFormat::Png,
                ImageFormat::WebP,
                ImageFormat::Gif,
                ImageFormat::Bmp,
                ImageFormat::Tiff,
            ],
            max_width: None,
            max_height: None,
            max_alloc: Some(512 * 1024 * 1024),
            jpeg_quality: 90,
        }
    }
}

impl CodecConfig {
    fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = self.max_width;
        limits.max_image_height = self.max_height;
        limits.max_alloc = self.max_alloc;
        limits
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Decodes and encodes images with an explicit [`CodecConfig`].
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decodes an in-memory payload, sniffing its format from the bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| Error::UnsupportedFormat("unrecognised image data".into()))?;
        if !self.config.decode_formats.contains(&format) {
            return Err(Error::UnsupportedFormat(format!(
                "{format:?} decoding is not enabled"
            )));
        }

        reader.limits(self.config.limits());
        let img = reader.decode()?;
        if img.width() == 0 || img.height() == 0 {
            return Err(Error::EmptyImage {
                width: img.width(),
                height: img.height(),
            });
        }

        log::debug!("decoded {:?} {}x{}", format, img.width(), img.height());
        Ok(img)
    }

    /// Encodes `img` as `format`.
    ///
    /// JPEG cannot store alpha, so images with an alpha channel are
    /// flattened to RGB first and a warning is logged.
    pub fn encode(&self, img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();

        match format {
            OutputFormat::Jpeg => {
                if img.color().has_alpha() {
                    log::warn!(
                        "JPEG can't be saved with an alpha channel; converting {}x{} image to RGB",
                        img.width(),
                        img.height()
                    );
                }
                let rgb = img.to_rgb8();
                JpegEncoder::new_with_quality(&mut bytes, self.config.jpeg_quality).write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )?;
            }
            OutputFormat::Png => {
                img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
            }
            OutputFormat::Webp => {
                // The WebP encoder only takes 8-bit RGB(A).
                let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
                rgba.write_to(&mut Cursor::new(&mut bytes), ImageFormat::WebP)?;
            }
        }

        Ok(bytes)
    }
}
