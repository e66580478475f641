use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::HistoryRecord;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::repository::{HistoryRepository, StorageError};

pub mod line;

/// History kept as an append-only text log, one record per line.
///
/// The file is created on first append and never rewritten.
pub struct FileHistoryRepository {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl FileHistoryRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryRepository for FileHistoryRepository {
    async fn append(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        let mut entry = line::encode(record);
        entry.push('\n');

        let _guard = self.append_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;

        tracing::debug!(path = %self.path.display(), "history record appended");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let text = String::from_utf8_lossy(&bytes);
        let mut out = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            match line::decode(raw) {
                Ok(record) => out.push(record),
                Err(err) => {
                    tracing::debug!(line = index + 1, %err, "skipping unreadable history line");
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileHistoryRepository::new(dir.path().join("history.txt"));
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn skips_garbage_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");
        tokio::fs::write(
            &path,
            "Ada 1.0 1 2024-01-05_09-07\nnot a record\n\nGrace 0.5 1 2024-01-05_09-08\n",
        )
        .await
        .unwrap();

        let repo = FileHistoryRepository::new(&path);
        let all = repo.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name().as_str(), "Grace");
    }
}
