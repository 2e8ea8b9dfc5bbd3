use async_trait::async_trait;
use scholar_badges::ReviewsData;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read review store at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write review store at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Review store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persisted review document.
///
/// `load` returns the whole document on every call. `Ok(None)` means there is
/// no data yet; callers decide what an empty view looks like.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Read the full document
    async fn load(&self) -> Result<Option<ReviewsData>>;

    /// Replace the full document
    async fn save(&self, data: &ReviewsData) -> Result<()>;
}
