//! Flat-directory image store. The directory listing is the index.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, info, warn};
use url::Url;

use crate::constants::IMAGES_PATH;
use crate::error::ArtError;

/// Names we are willing to serve: one path component, no leading dot, `.png`.
static SERVABLE_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*\.png$").ok());

/// A stored image as found on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredImage {
    /// File name within the store.
    pub filename: String,
    /// Public URL of the image.
    pub url: String,
    /// Last modification time of the file.
    pub created: DateTime<Utc>,
    /// File size in bytes.
    pub size_bytes: u64,
}

impl StoredImage {
    /// File size in kilobytes.
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Writes images into a directory and lists them back.
#[derive(Clone, Debug)]
pub struct ImageStore {
    root: PathBuf,
    base_url: Url,
}

impl ImageStore {
    /// Creates a store rooted at `root` whose images are published under `base_url`.
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Result<Self, ArtError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            root: root.into(),
            base_url,
        })
    }

    /// The directory images live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the image directory (and parents) if it's missing.
    pub async fn ensure_dir(&self) -> Result<(), ArtError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes `bytes` as `filename`. The data goes to a temporary file first and
    /// is renamed into place, so a listed image is always complete.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ArtError> {
        let target = self
            .resolve(filename)
            .map_err(|_| ArtError::GenerationFailed(format!("refusing to write {filename:?}")))?;
        self.ensure_dir()
            .await
            .map_err(|err| ArtError::GenerationFailed(err.to_string()))?;

        let temp = self.root.join(format!(".{filename}.tmp"));
        if let Err(err) = tokio::fs::write(&temp, bytes).await {
            remove_temp(&temp).await;
            return Err(ArtError::GenerationFailed(format!(
                "failed to write {}: {err}",
                temp.display()
            )));
        }
        if let Err(err) = tokio::fs::rename(&temp, &target).await {
            remove_temp(&temp).await;
            return Err(ArtError::GenerationFailed(format!(
                "failed to move {}: {err}",
                target.display()
            )));
        }
        info!("Saved {} ({} bytes)", target.display(), bytes.len());
        Ok(target)
    }

    /// Lists stored images, newest first. A missing directory lists as empty.
    pub async fn list(&self) -> Result<Vec<StoredImage>, ArtError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(ArtError::ListingFailed(format!(
                    "failed to read {}: {err}",
                    self.root.display()
                )));
            }
        };

        let mut images = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| ArtError::ListingFailed(err.to_string()))?
        {
            let file_name = entry.file_name();
            let Some(filename) = file_name.to_str() else {
                continue;
            };
            // only list what the image route will actually serve
            if self.resolve(filename).is_err() {
                debug!("Skipping {:?} in {}", filename, self.root.display());
                continue;
            }
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                // deleted between read_dir and stat
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(ArtError::ListingFailed(err.to_string())),
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            images.push(StoredImage {
                filename: filename.to_string(),
                url: self.url_for(filename)?.to_string(),
                created: DateTime::<Utc>::from(modified),
                size_bytes: metadata.len(),
            });
        }

        images.sort_by(|a, b| {
            b.created
                .cmp(&a.created)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        debug!("Listed {} image(s) in {}", images.len(), self.root.display());
        Ok(images)
    }

    /// Public URL for `filename`, under `/images/`.
    pub fn url_for(&self, filename: &str) -> Result<Url, ArtError> {
        Ok(self
            .base_url
            .join(&format!("{IMAGES_PATH}/"))?
            .join(filename)?)
    }

    /// Maps a requested filename to its path in the store, refusing anything
    /// that isn't a plain image name.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, ArtError> {
        let valid = SERVABLE_NAME
            .as_ref()
            .map(|pattern| pattern.is_match(filename))
            .unwrap_or(false);
        if !valid || filename.contains("..") {
            return Err(ArtError::NotFound(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }
}

async fn remove_temp(temp: &Path) {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => debug!("Removed {}", temp.display()),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!("Failed to remove {}: {}", temp.display(), err),
    }
}
