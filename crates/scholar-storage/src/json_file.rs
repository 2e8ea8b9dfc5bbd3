use crate::backend::{Result, ReviewStore, StoreError};
use async_trait::async_trait;
use scholar_badges::ReviewsData;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info};

/// Review document kept as a single JSON file.
///
/// Every `load` reads the file from disk. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty document if the file does not exist yet.
    ///
    /// Returns `true` when a new file was created. An existing file is never
    /// touched.
    pub async fn ensure_exists(&self) -> Result<bool> {
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(false),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.save(&ReviewsData::default()).await?;
                info!(path = %self.path.display(), "📝 Created empty review store");
                Ok(true)
            }
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("reviews.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ReviewStore for JsonFileStore {
    async fn load(&self) -> Result<Option<ReviewsData>> {
        let start = Instant::now();

        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    operation = "store_load",
                    path = %self.path.display(),
                    "Review store does not exist yet"
                );
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        // A zero-length file is what a writer leaves behind before its first save
        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!(
                operation = "store_load",
                path = %self.path.display(),
                "Review store is empty"
            );
            return Ok(None);
        }

        let data: ReviewsData =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            operation = "store_load",
            path = %self.path.display(),
            size_bytes = bytes.len(),
            reviews = data.reviews.len(),
            reviewers = data.reviewer_stats.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Loaded review store"
        );

        Ok(Some(data))
    }

    async fn save(&self, data: &ReviewsData) -> Result<()> {
        let json = serde_json::to_vec_pretty(data)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        // Readers see either the old or the new document
        let temp = self.temp_path();
        fs::write(&temp, &json)
            .await
            .map_err(|source| StoreError::Write {
                path: temp.clone(),
                source,
            })?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            operation = "store_save",
            path = %self.path.display(),
            size_bytes = json.len(),
            "Saved review store"
        );
        Ok(())
    }
}
