//! The artifact facade: one image, its derived colors and the edits that
//! can be made to it.

use std::fmt;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, RgbaImage};

use crate::codec::{Codec, OutputFormat};
use crate::color::{DerivedColors, Rgb};
use crate::compose::{self, OverlaySource, PaddingColor, Size};
use crate::dominant::{DominantColorExtractor, KmeansExtractor};
use crate::error::{Error, Result};
use crate::profile::EditProfile;
use crate::source::{Fetch, ImageSearch, License, ObjectStore, SearchQuery, read_local};

// ============================================================================
// Artificer
// ============================================================================

/// Builds [`Artifact`]s from images and the sources they come from.
///
/// Holds the shared collaborators every artifact it creates uses: a
/// [`Codec`], a [`DominantColorExtractor`] and optionally an
/// [`ObjectStore`] bound for persistence. Cloning is cheap.
///
/// # Example
///
/// ```
/// use image::{DynamicImage, Rgba, RgbaImage};
/// use image_artificer::{Artificer, MeanExtractor, Rgb};
///
/// let artificer = Artificer::new().with_extractor(MeanExtractor);
/// let img = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
/// let artifact = artificer.artifact(DynamicImage::ImageRgba8(img)).unwrap();
///
/// assert_eq!(artifact.dominant_color(), Rgb::new(255, 0, 0));
/// ```
#[derive(Debug, Clone)]
pub struct Artificer {
    codec: Codec,
    extractor: Arc<dyn DominantColorExtractor>,
    store: Option<Arc<dyn ObjectStore>>,
}

impl Default for Artificer {
    fn default() -> Self {
        Self {
            codec: Codec::default(),
            extractor: Arc::new(KmeansExtractor::default()),
            store: None,
        }
    }
}

impl Artificer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_extractor(mut self, extractor: impl DominantColorExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Binds a store that [`Artifact::save_to_bound_store`] writes to.
    pub fn with_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn store(&self) -> Option<&Arc<dyn ObjectStore>> {
        self.store.as_ref()
    }

    /// Wraps an already decoded image.
    pub fn artifact(&self, img: DynamicImage) -> Result<Artifact> {
        self.build(img.to_rgba8())
    }

    /// Decodes an in-memory payload.
    pub fn decode(&self, bytes: &[u8]) -> Result<Artifact> {
        self.artifact(self.codec.decode(bytes)?)
    }

    /// Reads and decodes a local file.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Artifact> {
        let path = path.as_ref();
        log::debug!("loading {}", path.display());
        self.decode(&read_local(path)?)
    }

    /// Downloads `bucket/key` from an object store.
    pub fn download(&self, store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<Artifact> {
        log::debug!("downloading {bucket}/{key}");
        self.decode(&store.download(bucket, key)?)
    }

    /// Downloads the image behind a URL.
    pub fn fetch(&self, fetcher: &dyn Fetch, url: &str) -> Result<Artifact> {
        self.decode(&fetcher.fetch(url)?)
    }

    /// Searches for `keyword` and downloads the first result.
    ///
    /// Fails with [`Error::SourceNotFound`] when the search comes back
    /// empty.
    pub fn search(
        &self,
        search: &dyn ImageSearch,
        fetcher: &dyn Fetch,
        keyword: &str,
        license: Option<License>,
    ) -> Result<Artifact> {
        let query = SearchQuery::first(keyword, license);
        let url = search
            .search(&query)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::SourceNotFound(format!("no images found for {keyword:?}")))?;

        log::info!("search for {keyword:?} picked {url}");
        self.fetch(fetcher, &url)
    }

    fn build(&self, image: RgbaImage) -> Result<Artifact> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::EmptyImage {
                width: image.width(),
                height: image.height(),
            });
        }

        let colors = DerivedColors::from_dominant(self.extractor.extract(&image));
        log::debug!(
            "artifact {}x{}: dominant {}, complementary {}",
            image.width(),
            image.height(),
            colors.dominant,
            colors.complementary
        );

        Ok(Artifact {
            image,
            colors,
            artificer: self.clone(),
        })
    }
}

// ============================================================================
// Edit modes
// ============================================================================

/// Whether an edit replaces the artifact's image or produces a new artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Replace the image and return the same artifact. Colors are kept.
    #[default]
    InPlace,
    /// Leave the artifact alone and return a new one with its own colors.
    NewArtifact,
}

/// Result of an edit made with an [`EditMode`].
///
/// Derefs to the artifact either way, so edits can be chained.
#[derive(Debug)]
pub enum Edited<'a> {
    InPlace(&'a mut Artifact),
    New(Artifact),
}

impl Edited<'_> {
    /// The new artifact, if the edit produced one.
    pub fn into_new(self) -> Option<Artifact> {
        match self {
            Self::InPlace(_) => None,
            Self::New(artifact) => Some(artifact),
        }
    }
}

impl Deref for Edited<'_> {
    type Target = Artifact;

    fn deref(&self) -> &Artifact {
        match self {
            Self::InPlace(artifact) => artifact,
            Self::New(artifact) => artifact,
        }
    }
}

impl DerefMut for Edited<'_> {
    fn deref_mut(&mut self) -> &mut Artifact {
        match self {
            Self::InPlace(artifact) => artifact,
            Self::New(artifact) => artifact,
        }
    }
}

// ============================================================================
// Artifact
// ============================================================================

/// An RGBA image plus its dominant and complementary colors.
///
/// The colors are computed once, when the artifact is created. Edits made
/// in place do not update them; call
/// [`refresh_derived_colors`](Self::refresh_derived_colors) or use
/// [`EditMode::NewArtifact`] when they need to reflect the edited pixels.
///
/// # Example
///
/// ```
/// use image::{DynamicImage, Rgba, RgbaImage};
/// use image_artificer::{Artifact, PaddingColor, Size};
///
/// let img = RgbaImage::from_pixel(400, 200, Rgba([200, 30, 30, 255]));
/// let mut artifact = Artifact::new(DynamicImage::ImageRgba8(img)).unwrap();
///
/// artifact
///     .pad_in_place(Size::new(800, 800), PaddingColor::Complementary)
///     .unwrap();
///
/// assert_eq!(artifact.dimensions(), (800, 800));
/// ```
#[derive(Debug, Clone)]
pub struct Artifact {
    image: RgbaImage,
    colors: DerivedColors,
    artificer: Artificer,
}

impl Artifact {
    /// Creates an artifact with the default [`Artificer`].
    pub fn new(img: DynamicImage) -> Result<Self> {
        Artificer::default().artifact(img)
    }

    /// Loads an artifact from a local file with the default [`Artificer`].
    pub fn from_local_disk(path: impl AsRef<Path>) -> Result<Self> {
        Artificer::default().open(path)
    }

    /// Downloads an artifact over HTTP(S) with the default [`Artificer`].
    #[cfg(feature = "http")]
    pub fn from_url(url: &str) -> Result<Self> {
        let fetcher = crate::source::HttpFetcher::new()?;
        Artificer::default().fetch(&fetcher, url)
    }

    /// Binds an object store for [`save_to_bound_store`](Self::save_to_bound_store).
    pub fn with_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.artificer.store = Some(store);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn dominant_color(&self) -> Rgb {
        self.colors.dominant
    }

    pub fn complementary_color(&self) -> Rgb {
        self.colors.complementary
    }

    pub fn derived_colors(&self) -> DerivedColors {
        self.colors
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn artificer(&self) -> &Artificer {
        &self.artificer
    }

    /// Recomputes the derived colors from the current pixels.
    pub fn refresh_derived_colors(&mut self) -> &mut Self {
        self.colors = DerivedColors::from_dominant(self.artificer.extractor.extract(&self.image));
        self
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Letterboxes the image onto a canvas of exactly `size`.
    ///
    /// Padding uses `padding` unless the scaled image has any transparency,
    /// in which case the canvas is white.
    pub fn resize_and_pad(
        &mut self,
        size: Size,
        padding: PaddingColor,
        mode: EditMode,
    ) -> Result<Edited<'_>> {
        match mode {
            EditMode::InPlace => {
                self.pad_in_place(size, padding)?;
                Ok(Edited::InPlace(self))
            }
            EditMode::NewArtifact => self.padded(size, padding).map(Edited::New),
        }
    }

    /// [`resize_and_pad`](Self::resize_and_pad) with [`EditMode::InPlace`].
    pub fn pad_in_place(&mut self, size: Size, padding: PaddingColor) -> Result<&mut Self> {
        self.image = compose::resize_and_pad(&self.image, size, padding, self.colors)?;
        Ok(self)
    }

    /// [`resize_and_pad`](Self::resize_and_pad) with [`EditMode::NewArtifact`].
    pub fn padded(&self, size: Size, padding: PaddingColor) -> Result<Artifact> {
        let canvas = compose::resize_and_pad(&self.image, size, padding, self.colors)?;
        self.artificer.build(canvas)
    }

    /// Stretches `overlay` over the whole image, optionally tinted.
    pub fn apply_overlay(&mut self, overlay: &OverlaySource, tint: Option<Rgb>) -> Result<&mut Self> {
        compose::apply_overlay(&mut self.image, overlay, tint)?;
        Ok(self)
    }

    /// Loads a raster or `.svg` overlay from disk and applies it.
    pub fn apply_overlay_from_path(
        &mut self,
        path: impl AsRef<Path>,
        tint: Option<Rgb>,
    ) -> Result<&mut Self> {
        let overlay = OverlaySource::from_path(path, &self.artificer.codec)?;
        self.apply_overlay(&overlay, tint)
    }

    /// Runs every step of `profile`.
    ///
    /// All settings are validated and the overlay is loaded and rasterised
    /// before the image is touched, so a bad profile leaves the artifact
    /// unchanged.
    /// A resize-and-pad step that is not in place replaces `self` with the
    /// new artifact.
    pub fn apply_profile(&mut self, profile: &EditProfile) -> Result<&mut Self> {
        let pad = profile
            .resize_and_pad
            .as_ref()
            .map(|s| Ok::<_, Error>((s.size().validate()?, s.padding.to_padding()?, s.edit_mode())))
            .transpose()?;
        // Overlays are rasterised at the final size up front.
        let target = pad.map_or_else(|| Size::of(&self.image), |(size, _, _)| size);
        let overlay = profile
            .overlay
            .as_ref()
            .map(|s| {
                let source = OverlaySource::from_path(&s.path, &self.artificer.codec)?;
                Ok::<_, Error>((OverlaySource::Raster(source.rasterize(target)?), s.tint_color()?))
            })
            .transpose()?;

        if let Some((size, padding, mode)) = pad {
            match mode {
                EditMode::InPlace => {
                    self.pad_in_place(size, padding)?;
                }
                EditMode::NewArtifact => *self = self.padded(size, padding)?,
            }
        }
        if let Some((source, tint)) = overlay {
            self.apply_overlay(&source, tint)?;
        }
        if let Some(output) = &profile.output {
            self.save_to_local(&output.path, output.resolved_format())?;
        }
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Encodes the image. JPEG output drops the alpha channel with a warning.
    pub fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
        let img = DynamicImage::ImageRgba8(self.image.clone());
        self.artificer.codec.encode(&img, format)
    }

    pub fn save_to_local(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encode(format)?;
        fs::write(path, &bytes)?;
        log::info!("saved {format} ({} bytes) to {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn save_to_object_store(
        &self,
        store: &dyn ObjectStore,
        bucket: &str,
        key: &str,
        format: OutputFormat,
    ) -> Result<()> {
        let bytes = self.encode(format)?;
        store.upload(bucket, key, &bytes, format.mime_type())?;
        log::info!("uploaded {format} ({} bytes) to {bucket}/{key}", bytes.len());
        Ok(())
    }

    /// Uploads to the store bound with [`with_store`](Self::with_store).
    pub fn save_to_bound_store(&self, bucket: &str, key: &str, format: OutputFormat) -> Result<()> {
        let store = self.artificer.store.as_deref().ok_or(Error::StoreNotConfigured)?;
        self.save_to_object_store(store, bucket, key, format)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, color) in [
            ("dominant", self.colors.dominant),
            ("complementary", self.colors.complementary),
        ] {
            writeln!(
                f,
                "\x1b[38;2;{};{};{}m\u{2588}\u{2588}\x1b[0m {label:<13} {color} {}",
                color.r,
                color.g,
                color.b,
                color.to_hex()
            )?;
        }
        write!(f, "image_size={}x{}", self.image.width(), self.image.height())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::dominant::MeanExtractor;
    use crate::profile::{OutputSettings, OverlaySettings, ResizeAndPadSettings};
    use crate::source::LocalObjectStore;
    use image::{ColorType, Rgba};

    const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);

    fn solid(width: u32, height: u32, pixel: Rgba<u8>) -> Artifact {
        Artifact::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, pixel))).unwrap()
    }

    fn close(a: Rgb, b: Rgb) -> bool {
        a.r.abs_diff(b.r) <= 1 && a.g.abs_diff(b.g) <= 1 && a.b.abs_diff(b.b) <= 1
    }

    /// Serves canned bodies by URL.
    struct StaticFetcher(HashMap<String, Vec<u8>>);

    impl Fetch for StaticFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| Error::AcquisitionFailed(format!("HTTP 404 for {url}")))
        }
    }

    struct StaticSearch(Vec<String>);

    impl ImageSearch for StaticSearch {
        fn search(&self, query: &SearchQuery) -> Result<Vec<String>> {
            assert_eq!(query.max_results, 1);
            Ok(self.0.clone())
        }
    }

    fn png_bytes(pixel: Rgba<u8>) -> Vec<u8> {
        solid(3, 3, pixel).encode(OutputFormat::Png).unwrap()
    }

    #[test]
    fn colors_are_derived_at_construction() {
        let artifact = solid(6, 6, Rgba([255, 0, 0, 255]));
        assert_eq!(artifact.dominant_color(), Rgb::new(255, 0, 0));
        assert!(close(artifact.complementary_color(), Rgb::new(0, 255, 255)));
    }

    #[test]
    fn rgb_input_gets_an_alpha_channel() {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
        let artifact = Artifact::new(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(artifact.image().get_pixel(0, 0).0, [1, 2, 3, 255]);
    }

    #[test]
    fn empty_image_is_rejected() {
        assert!(matches!(
            Artifact::new(DynamicImage::new_rgba8(0, 5)),
            Err(Error::EmptyImage { width: 0, height: 5 })
        ));
    }

    #[test]
    fn wide_image_padded_with_complementary() {
        let mut artifact = solid(400, 200, RED);
        let complementary = artifact.complementary_color();

        let edited = artifact
            .resize_and_pad(Size::new(800, 800), PaddingColor::Complementary, EditMode::InPlace)
            .unwrap();
        assert!(matches!(edited, Edited::InPlace(_)));

        let img = artifact.image();
        assert_eq!(img.dimensions(), (800, 800));
        // 800x400 content band centered vertically.
        for (x, y) in [(0, 0), (799, 0), (400, 199), (0, 799), (400, 600)] {
            assert_eq!(img.get_pixel(x, y).0, complementary.to_rgba().0, "at ({x}, {y})");
        }
        for (x, y) in [(400, 400), (0, 200), (799, 599)] {
            let p = img.get_pixel(x, y);
            assert!(close(Rgb::new(p[0], p[1], p[2]), Rgb::new(220, 20, 20)), "at ({x}, {y})");
        }
    }

    #[test]
    fn dominant_padding_uses_own_color() {
        let mut artifact = solid(10, 20, Rgba([10, 120, 200, 255]));
        let dominant = artifact.dominant_color();
        artifact
            .pad_in_place(Size::new(40, 40), PaddingColor::Dominant)
            .unwrap();
        assert_eq!(artifact.image().get_pixel(0, 0).0, dominant.to_rgba().0);
    }

    #[test]
    fn in_place_keeps_stale_colors() {
        let mut artifact = solid(20, 20, RED);
        let blue = Rgb::new(0, 0, 255);

        artifact
            .pad_in_place(Size::new(10, 40), PaddingColor::Color(blue))
            .unwrap();
        assert_eq!(artifact.dominant_color(), Rgb::new(220, 20, 20));

        artifact.refresh_derived_colors();
        assert_eq!(artifact.dominant_color(), blue);
    }

    #[test]
    fn new_artifact_gets_fresh_colors() {
        let mut original = solid(20, 20, RED);
        let blue = Rgb::new(0, 0, 255);

        let padded = original
            .resize_and_pad(Size::new(10, 40), PaddingColor::Color(blue), EditMode::NewArtifact)
            .unwrap()
            .into_new()
            .unwrap();

        assert_eq!(padded.dimensions(), (10, 40));
        assert_eq!(padded.dominant_color(), blue);
        assert_eq!(original.dimensions(), (20, 20));
        assert_eq!(original.dominant_color(), Rgb::new(220, 20, 20));
    }

    #[test]
    fn invalid_target_leaves_image_untouched() {
        let mut artifact = solid(5, 5, RED);
        assert!(matches!(
            artifact.pad_in_place(Size::new(0, 10), PaddingColor::Dominant),
            Err(Error::InvalidSize { .. })
        ));
        assert_eq!(artifact.dimensions(), (5, 5));
    }

    #[test]
    fn overlay_chains_and_keeps_colors() {
        let mut artifact = solid(8, 8, RED);
        let dominant = artifact.dominant_color();
        let white = OverlaySource::from(RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255])));

        artifact
            .apply_overlay(&white, Some(Rgb::new(0, 200, 0)))
            .unwrap()
            .pad_in_place(Size::new(8, 16), PaddingColor::Dominant)
            .unwrap();

        assert_eq!(artifact.image().get_pixel(4, 8).0, [0, 200, 0, 255]);
        assert_eq!(artifact.dominant_color(), dominant);
    }

    #[test]
    fn custom_extractor_is_used() {
        let artificer = Artificer::new().with_extractor(MeanExtractor);
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgba([0, 0, 0, 255]) } else { Rgba([200, 100, 50, 255]) }
        });
        let artifact = artificer.artifact(DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(artifact.dominant_color(), Rgb::new(100, 50, 25));
    }

    #[test]
    fn open_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.png");
        fs::write(&path, png_bytes(Rgba([9, 9, 9, 255]))).unwrap();

        let artifact = Artifact::from_local_disk(&path).unwrap();
        assert_eq!(artifact.dominant_color(), Rgb::new(9, 9, 9));

        assert!(matches!(
            Artifact::from_local_disk(dir.path().join("missing.png")),
            Err(Error::SourceNotFound(_))
        ));
    }

    #[test]
    fn fetch_and_search() {
        let url = "https://img.example/cat.png".to_string();
        let fetcher = StaticFetcher(HashMap::from([(url.clone(), png_bytes(RED))]));
        let artificer = Artificer::new();

        let fetched = artificer.fetch(&fetcher, &url).unwrap();
        assert_eq!(fetched.dimensions(), (3, 3));

        assert!(matches!(
            artificer.fetch(&fetcher, "https://img.example/missing.png"),
            Err(Error::AcquisitionFailed(_))
        ));

        let search = StaticSearch(vec![url.clone(), "https://img.example/other.png".into()]);
        let found = artificer
            .search(&search, &fetcher, "cat", Some(License::CommercialModify))
            .unwrap();
        assert_eq!(found.dominant_color(), Rgb::new(220, 20, 20));

        assert!(matches!(
            artificer.search(&StaticSearch(vec![]), &fetcher, "cat", None),
            Err(Error::SourceNotFound(_))
        ));
    }

    #[test]
    fn object_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());
        let artifact = solid(5, 3, Rgba([1, 2, 3, 128]));

        artifact
            .save_to_object_store(&store, "art", "out.png", OutputFormat::Png)
            .unwrap();
        let back = Artificer::new().download(&store, "art", "out.png").unwrap();

        assert_eq!(back.image(), artifact.image());
        assert!(matches!(
            Artificer::new().download(&store, "art", "nope.png"),
            Err(Error::AcquisitionFailed(_))
        ));
    }

    #[test]
    fn bound_store() {
        let artifact = solid(2, 2, RED);
        assert!(matches!(
            artifact.save_to_bound_store("b", "k.jpg", OutputFormat::Jpeg),
            Err(Error::StoreNotConfigured)
        ));

        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact.with_store(Arc::new(LocalObjectStore::new(dir.path())));
        artifact
            .save_to_bound_store("b", "k.jpg", OutputFormat::Jpeg)
            .unwrap();
        assert!(dir.path().join("b/k.jpg").is_file());
    }

    #[test]
    fn jpeg_save_drops_alpha() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        solid(4, 4, Rgba([10, 20, 30, 40]))
            .save_to_local(&path, OutputFormat::Jpeg)
            .unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgb8);
    }

    #[test]
    fn profile_runs_all_steps() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = dir.path().join("frame.png");
        RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]))
            .save(&overlay)
            .unwrap();
        let output = dir.path().join("out.png");

        let profile = EditProfile::new()
            .with_resize_and_pad(ResizeAndPadSettings {
                width: 30,
                height: 10,
                padding: "#0000ff".into(),
                in_place: false,
            })
            .with_overlay(OverlaySettings {
                path: overlay,
                tint: Some("#00ff00".into()),
            })
            .with_output(OutputSettings {
                path: output.clone(),
                format: None,
            });

        let mut artifact = solid(10, 10, RED);
        artifact.apply_profile(&profile).unwrap();

        assert_eq!(artifact.dimensions(), (30, 10));
        // Colors come from the padded canvas, before the overlay.
        assert_eq!(artifact.dominant_color(), Rgb::new(0, 0, 255));
        let saved = image::open(&output).unwrap().to_rgba8();
        assert_eq!(saved.get_pixel(15, 5).0, [0, 255, 0, 255]);
    }

    #[test]
    fn bad_profile_changes_nothing() {
        let profile = EditProfile::new()
            .with_resize_and_pad(ResizeAndPadSettings {
                width: 50,
                height: 50,
                padding: "complementary".into(),
                in_place: true,
            })
            .with_overlay(OverlaySettings {
                path: "/definitely/missing/frame.png".into(),
                tint: None,
            });

        let mut artifact = solid(10, 10, RED);
        assert!(matches!(
            artifact.apply_profile(&profile),
            Err(Error::SourceNotFound(_))
        ));
        assert_eq!(artifact.dimensions(), (10, 10));
    }

    #[test]
    fn malformed_svg_overlay_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let frame = dir.path().join("frame.svg");
        fs::write(&frame, "<not-svg").unwrap();

        let profile = EditProfile::new()
            .with_resize_and_pad(ResizeAndPadSettings {
                width: 50,
                height: 50,
                padding: "dominant".into(),
                in_place: true,
            })
            .with_overlay(OverlaySettings {
                path: frame,
                tint: None,
            });

        let mut artifact = solid(10, 20, RED);
        let before = artifact.image().clone();
        assert!(matches!(artifact.apply_profile(&profile), Err(Error::Svg(_))));
        assert_eq!(artifact.dimensions(), (10, 20));
        assert_eq!(artifact.image(), &before);
    }

    #[test]
    fn svg_overlay_profile_renders_at_padded_size() {
        let dir = tempfile::tempdir().unwrap();
        let frame = dir.path().join("frame.svg");
        fs::write(
            &frame,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2"><rect width="2" height="2" fill="#00ff00"/></svg>"##,
        )
        .unwrap();

        let profile = EditProfile::new()
            .with_resize_and_pad(ResizeAndPadSettings {
                width: 40,
                height: 20,
                padding: "#0000ff".into(),
                in_place: true,
            })
            .with_overlay(OverlaySettings {
                path: frame,
                tint: None,
            });

        let mut artifact = solid(10, 10, RED);
        artifact.apply_profile(&profile).unwrap();

        assert_eq!(artifact.dimensions(), (40, 20));
        assert_eq!(artifact.image().get_pixel(1, 1).0, [0, 255, 0, 255]);
        assert_eq!(artifact.image().get_pixel(38, 18).0, [0, 255, 0, 255]);
    }

    #[test]
    fn display_shows_colors_and_size() {
        let text = solid(4, 2, Rgba([255, 0, 0, 255])).to_string();
        assert!(text.contains("\x1b[38;2;255;0;0m"));
        assert!(text.contains("RGB(255, 0, 0)"));
        assert!(text.ends_with("image_size=4x2"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn artifacts_are_send() {
        fn assert_send<T: Send + Sync>() {}
        assert_send::<Artifact>();
        assert_send::<Artificer>();
    }
}
