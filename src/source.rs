//! Collaborators that move image bytes in and out of the crate.
//!
//! | Concern | Trait | Bundled implementation |
//! |---|---|---|
//! | HTTP(S) download | [`Fetch`] | [`HttpFetcher`] (`http` feature) |
//! | Keyword image search | [`ImageSearch`] | none |
//! | Object storage | [`ObjectStore`] | [`LocalObjectStore`] |
//!
//! Local files are read directly with [`read_local`].

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

// ============================================================================
// Local files
// ============================================================================

/// Reads a file, failing with [`Error::SourceNotFound`] if it is missing.
pub fn read_local(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::SourceNotFound(format!(
            "the file at {} does not exist",
            path.display()
        )));
    }
    Ok(fs::read(path)?)
}

// ============================================================================
// Fetch
// ============================================================================

/// Downloads the body behind a URL.
pub trait Fetch: Send + Sync {
    /// Fails with [`Error::AcquisitionFailed`] on a non-success status.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP(S) fetcher backed by reqwest.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Uses a preconfigured client (proxies, timeouts, ...).
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::AcquisitionFailed(format!(
                "failed to download image from {url}: HTTP {status}"
            )));
        }
        let body = response.bytes()?;
        log::debug!("downloaded {} bytes from {url}", body.len());
        Ok(body.to_vec())
    }
}

// ============================================================================
// Image search
// ============================================================================

/// Reuse rights an image search can be filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum License {
    /// Labeled for noncommercial reuse.
    #[serde(rename = "noncommercial")]
    #[cfg_attr(feature = "clap", value(name = "noncommercial"))]
    Noncommercial,
    /// Labeled for reuse.
    #[serde(rename = "commercial")]
    #[cfg_attr(feature = "clap", value(name = "commercial"))]
    Commercial,
    /// Labeled for noncommercial reuse with modification.
    #[serde(rename = "noncommercial,modify")]
    #[cfg_attr(feature = "clap", value(name = "noncommercial,modify"))]
    NoncommercialModify,
    /// Labeled for reuse with modification.
    #[serde(rename = "commercial,modify")]
    #[cfg_attr(feature = "clap", value(name = "commercial,modify"))]
    CommercialModify,
}

impl License {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Noncommercial => "noncommercial",
            Self::Commercial => "commercial",
            Self::NoncommercialModify => "noncommercial,modify",
            Self::CommercialModify => "commercial,modify",
        }
    }
}

impl FromStr for License {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "noncommercial" => Ok(Self::Noncommercial),
            "commercial" => Ok(Self::Commercial),
            "noncommercial,modify" => Ok(Self::NoncommercialModify),
            "commercial,modify" => Ok(Self::CommercialModify),
            other => Err(Error::InvalidLicense(other.to_string())),
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyword search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub license: Option<License>,
    pub max_results: usize,
}

impl SearchQuery {
    /// A query for the single best match.
    pub fn first(keyword: impl Into<String>, license: Option<License>) -> Self {
        Self {
            keyword: keyword.into(),
            license,
            max_results: 1,
        }
    }
}

/// Finds image URLs for a keyword, best match first.
pub trait ImageSearch: Send + Sync {
    fn search(&self, query: &SearchQuery) -> Result<Vec<String>>;
}

// ============================================================================
// Object storage
// ============================================================================

/// Bucket/key blob storage.
pub trait ObjectStore: fmt::Debug + Send + Sync {
    /// Fails with [`Error::AcquisitionFailed`] if the object cannot be read.
    fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    fn upload(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<()>;
}

/// An [`ObjectStore`] laid out on disk as `root/bucket/key`.
///
/// Uploads are written to a temporary file next to the target and renamed
/// into place, so readers never see a partial object and a failed upload
/// leaves nothing behind.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of an object. Rejects keys that would escape the
    /// bucket directory.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for part in [bucket, key] {
            let relative = Path::new(part);
            let contained = !part.is_empty()
                && relative
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !contained {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid object name {part:?}"),
                )));
            }
            path.push(relative);
        }
        Ok(path)
    }
}

impl ObjectStore for LocalObjectStore {
    fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).map_err(|e| {
            Error::AcquisitionFailed(format!("download of {bucket}/{key} failed: {e}"))
        })
    }

    fn upload(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|e| e.error)?;

        log::debug!(
            "stored {} bytes ({content_type}) at {}",
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}
