use crate::backend::{Result, ReviewStore, StoreError};
use async_trait::async_trait;
use scholar_badges::ReviewsData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory review store for testing and development.
///
/// Counts loads and saves so callers can assert which operations touched it.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<Option<ReviewsData>>>,
    failure: Arc<RwLock<Option<String>>>,
    loads: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: ReviewsData) -> Self {
        Self {
            data: Arc::new(RwLock::new(Some(data))),
            ..Self::default()
        }
    }

    /// Make every subsequent `load` fail with a backend error.
    pub async fn fail_loads(&self, reason: impl Into<String>) {
        *self.failure.write().await = Some(reason.into());
    }

    pub async fn snapshot(&self) -> Option<ReviewsData> {
        self.data.read().await.clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn load(&self) -> Result<Option<ReviewsData>> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = self.failure.read().await.as_ref() {
            return Err(StoreError::Backend(reason.clone()));
        }

        Ok(self.data.read().await.clone())
    }

    async fn save(&self, data: &ReviewsData) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.data.write().await = Some(data.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_operations() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.save(&ReviewsData::default()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(ReviewsData::default()));

        assert_eq!(store.load_count(), 2);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = MemoryStore::with_data(ReviewsData::default());
        store.fail_loads("disk on fire").await;

        let err = store.load().await.unwrap_err();
        assert!(err.to_string().contains("disk on fire"));
    }
}
