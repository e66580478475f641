use async_trait::async_trait;
use quiz_core::model::HistoryRecord;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::file::FileHistoryRepository;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only sink for session results.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append one record. The record is durable once this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn append(&self, record: &HistoryRecord) -> Result<(), StorageError>;

    /// Load every stored record in append order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn load_all(&self) -> Result<Vec<HistoryRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<Vec<HistoryRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic elsewhere cannot leave the vector half-pushed, so a poisoned
    // lock still guards complete records.
    fn records(&self) -> MutexGuard<'_, Vec<HistoryRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn append(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        self.records().push(record.clone());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        Ok(self.records().clone())
    }
}

/// Holds the history backend behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    /// History kept in the plain-text append-only log at `path`.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            history: Arc::new(FileHistoryRepository::new(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{PlayerName, Score};
    use quiz_core::time::fixed_now;

    fn record(name: &str, halves: u32, answered: u32) -> HistoryRecord {
        HistoryRecord::from_persisted(
            PlayerName::parse(name).unwrap(),
            Score::from_halves(halves),
            answered,
            fixed_now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn in_memory_keeps_append_order() {
        let repo = InMemoryRepository::new();
        repo.append(&record("Ada", 2, 1)).await.unwrap();
        repo.append(&record("Grace", 3, 2)).await.unwrap();

        let all = repo.load_all().await.unwrap();
        assert_eq!(repo.len(), 2);
        assert_eq!(all[0].name().as_str(), "Ada");
        assert_eq!(all[1].score(), Score::from_halves(3));
    }

    #[tokio::test]
    async fn poisoned_lock_still_serves_records() {
        let repo = InMemoryRepository::new();
        repo.append(&record("Ada", 2, 1)).await.unwrap();

        let shared = repo.clone();
        let panicked = std::thread::spawn(move || {
            let _guard = shared.records.lock().unwrap();
            panic!("poison the history lock");
        })
        .join();
        assert!(panicked.is_err());
        assert!(repo.records.is_poisoned());

        assert_eq!(repo.len(), 1);
        repo.append(&record("Grace", 1, 1)).await.unwrap();
        let all = repo.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name().as_str(), "Grace");
    }

    #[tokio::test]
    async fn storage_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::file(dir.path().join("history.txt"));
        assert!(storage.history.load_all().await.unwrap().is_empty());
    }
}
