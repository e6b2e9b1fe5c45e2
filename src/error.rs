//! Crate-wide error type.

use thiserror::Error;

/// Errors produced while parsing colors, acquiring, editing or persisting
/// an image.
#[derive(Error, Debug)]
pub enum Error {
    /// A color input was malformed or had channels outside `0..=255`.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A padding mode string was not one of the recognised modes.
    #[error("invalid padding mode {0:?}, expected \"dominant\", \"complementary\" or a color")]
    InvalidPaddingMode(String),

    /// The requested source does not exist (missing file, empty search).
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// The source exists but could not be retrieved.
    #[error("acquisition failed: {0}")]
    AcquisitionFailed(String),

    /// A search license filter outside the supported set.
    #[error("unknown license filter {0:?}")]
    InvalidLicense(String),

    /// Persistence to a bound object store was requested but none is bound.
    #[error("no object store is bound to this artifact")]
    StoreNotConfigured,

    /// The decoded image has a zero width or height.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// A resize target with a zero dimension.
    #[error("invalid target size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// The payload is in a format the configured codec does not accept.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An SVG overlay could not be parsed or rasterised.
    #[error("SVG overlay failed: {0}")]
    Svg(String),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
