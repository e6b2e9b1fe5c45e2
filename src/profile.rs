//! Serializable edit profiles.
//!
//! An [`EditProfile`] describes a resize-and-pad step, an overlay step and
//! an output target in a JSON-friendly format, so a batch of images can be
//! processed from a config file.
//!
//! # Example
//!
//! ```
//! use image_artificer::{EditProfile, ResizeAndPadSettings, ColorSetting};
//!
//! let profile = EditProfile::new().with_resize_and_pad(ResizeAndPadSettings {
//!     width: 800,
//!     height: 800,
//!     padding: ColorSetting::from("complementary"),
//!     in_place: true,
//! });
//!
//! let json = profile.to_json().unwrap();
//! let restored = EditProfile::from_json(&json).unwrap();
//! assert_eq!(restored, profile);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::EditMode;
use crate::codec::OutputFormat;
use crate::color::{ColorInput, Rgb, parse_color};
use crate::compose::{PaddingColor, Size};
use crate::error::Result;

// ============================================================================
// ColorSetting
// ============================================================================

/// A color or padding mode as written in a profile.
///
/// ```json
/// "dominant"
/// "#FF5733"
/// [255, 87, 51]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum ColorSetting {
    Text(String),
    Channels(Vec<i64>),
}

impl ColorSetting {
    /// Interprets the setting as a padding mode or color.
    pub fn to_padding(&self) -> Result<PaddingColor> {
        match self {
            Self::Text(text) => text.parse(),
            Self::Channels(channels) => Rgb::from_channels(channels).map(PaddingColor::Color),
        }
    }

    /// Interprets the setting as a plain color.
    pub fn to_color(&self) -> Result<Rgb> {
        parse_color(ColorInput::from(self.clone()))
    }
}

impl From<&str> for ColorSetting {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Rgb> for ColorSetting {
    fn from(color: Rgb) -> Self {
        Self::Channels(vec![color.r as i64, color.g as i64, color.b as i64])
    }
}

impl From<ColorSetting> for ColorInput {
    fn from(setting: ColorSetting) -> Self {
        match setting {
            ColorSetting::Text(text) => ColorInput::Hex(text),
            ColorSetting::Channels(channels) => ColorInput::Channels(channels),
        }
    }
}

fn default_padding() -> ColorSetting {
    ColorSetting::Text("dominant".into())
}

// ============================================================================
// Step settings
// ============================================================================

/// Settings for the resize-and-pad step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResizeAndPadSettings {
    pub width: u32,
    pub height: u32,

    /// `"dominant"`, `"complementary"`, a hex string or `[r, g, b]`.
    #[serde(default = "default_padding")]
    pub padding: ColorSetting,

    /// Edit the artifact in place instead of producing a new one with
    /// freshly derived colors.
    #[serde(default)]
    pub in_place: bool,
}

impl ResizeAndPadSettings {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn edit_mode(&self) -> EditMode {
        if self.in_place {
            EditMode::InPlace
        } else {
            EditMode::NewArtifact
        }
    }
}

/// Settings for the overlay step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct OverlaySettings {
    /// Raster or `.svg` overlay file.
    pub path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<ColorSetting>,
}

impl OverlaySettings {
    pub fn tint_color(&self) -> Result<Option<Rgb>> {
        self.tint.as_ref().map(ColorSetting::to_color).transpose()
    }
}

/// Where and how to write the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings {
    pub path: PathBuf,

    /// Defaults to the path's extension, then JPEG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

impl OutputSettings {
    pub fn resolved_format(&self) -> OutputFormat {
        self.format
            .or_else(|| OutputFormat::from_path(&self.path))
            .unwrap_or_default()
    }
}

// ============================================================================
// EditProfile
// ============================================================================

/// A serializable sequence of edits.
///
/// # JSON Format
///
/// ```json
/// {
///   "resizeAndPad": { "width": 800, "height": 800, "padding": "complementary" },
///   "overlay": { "path": "frame.png", "tint": "#FF5733" },
///   "output": { "path": "out/cover.webp" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct EditProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize_and_pad: Option<ResizeAndPadSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlaySettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSettings>,
}

impl EditProfile {
    /// Creates an empty profile with no steps.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resize_and_pad(mut self, settings: ResizeAndPadSettings) -> Self {
        self.resize_and_pad = Some(settings);
        self
    }

    pub fn with_overlay(mut self, settings: OverlaySettings) -> Self {
        self.overlay = Some(settings);
        self
    }

    pub fn with_output(mut self, settings: OutputSettings) -> Self {
        self.output = Some(settings);
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reads a JSON profile from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn parses_documented_format() {
        let json = r##"{
            "resizeAndPad": { "width": 800, "height": 600, "padding": "complementary" },
            "overlay": { "path": "frame.png", "tint": "#FF5733" },
            "output": { "path": "out/cover.webp" }
        }"##;
        let profile = EditProfile::from_json(json).unwrap();

        let pad = profile.resize_and_pad.as_ref().unwrap();
        assert_eq!(pad.size(), Size::new(800, 600));
        assert_eq!(pad.padding_color_for_test(), PaddingColor::Complementary);
        assert_eq!(pad.edit_mode(), EditMode::NewArtifact);

        let overlay = profile.overlay.as_ref().unwrap();
        assert_eq!(overlay.tint_color().unwrap(), Some(Rgb::new(255, 87, 51)));

        let output = profile.output.as_ref().unwrap();
        assert_eq!(output.resolved_format(), OutputFormat::Webp);
    }

    #[test]
    fn padding_defaults_to_dominant() {
        let profile =
            EditProfile::from_json(r#"{ "resizeAndPad": { "width": 10, "height": 10 } }"#).unwrap();
        let pad = profile.resize_and_pad.unwrap();
        assert_eq!(pad.padding.to_padding().unwrap(), PaddingColor::Dominant);
        assert!(!pad.in_place);
    }

    #[test]
    fn padding_accepts_channels() {
        let setting: ColorSetting = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(
            setting.to_padding().unwrap(),
            PaddingColor::Color(Rgb::new(1, 2, 3))
        );

        let bad: ColorSetting = serde_json::from_str("[1, 2, 300]").unwrap();
        assert!(matches!(bad.to_padding(), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn unknown_padding_mode_is_rejected() {
        assert!(matches!(
            ColorSetting::from("loudest").to_padding(),
            Err(Error::InvalidPaddingMode(_))
        ));
    }

    #[test]
    fn explicit_format_wins_over_extension() {
        let output = OutputSettings {
            path: "cover.png".into(),
            format: Some(OutputFormat::Jpeg),
        };
        assert_eq!(output.resolved_format(), OutputFormat::Jpeg);

        let output = OutputSettings {
            path: "cover".into(),
            format: None,
        };
        assert_eq!(output.resolved_format(), OutputFormat::Jpeg);
    }

    #[test]
    fn profile_json_is_camel_case() {
        let profile = EditProfile::new().with_resize_and_pad(ResizeAndPadSettings {
            width: 1,
            height: 2,
            padding: Rgb::new(3, 4, 5).into(),
            in_place: true,
        });

        let json = profile.to_json_pretty().unwrap();
        assert!(json.contains("\"resizeAndPad\""));
        assert!(json.contains("\"inPlace\""));
        assert!(!json.contains("\"overlay\""));
        assert_eq!(EditProfile::from_json(&json).unwrap(), profile);
    }

    #[test]
    fn empty_profile_deserializes() {
        let profile = EditProfile::from_json("{}").unwrap();
        assert_eq!(profile, EditProfile::new());
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, r#"{ "output": { "path": "a.png" } }"#).unwrap();

        let profile = EditProfile::from_path(&path).unwrap();
        assert_eq!(profile.output.unwrap().resolved_format(), OutputFormat::Png);

        assert!(matches!(
            EditProfile::from_path(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }

    impl ResizeAndPadSettings {
        fn padding_color_for_test(&self) -> PaddingColor {
            self.padding.to_padding().unwrap()
        }
    }
}
