use chrono::NaiveDateTime;
use std::sync::Arc;

use quiz_core::model::{HistoryRecord, Score};
use storage::repository::HistoryRepository;

use crate::error::HistoryServiceError;

/// Presentation-agnostic history row.
///
/// No pre-formatted strings: the UI decides how to render timestamps and scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryListItem {
    pub name: String,
    pub score: Score,
    pub questions_answered: u32,
    pub recorded_at: NaiveDateTime,
}

impl HistoryListItem {
    #[must_use]
    pub fn from_record(record: &HistoryRecord) -> Self {
        Self {
            name: record.name().as_str().to_owned(),
            score: record.score(),
            questions_answered: record.questions_answered(),
            recorded_at: record.recorded_at(),
        }
    }
}

/// One leaderboard row; `rank` starts at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub score: Score,
    pub questions_answered: u32,
}

/// Read side of the history store: full history and the leaderboard.
#[derive(Clone)]
pub struct HistoryService {
    history: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    #[must_use]
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    /// Every stored session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryServiceError::Storage` on repository failures.
    pub async fn list_history(&self) -> Result<Vec<HistoryListItem>, HistoryServiceError> {
        let records = self.history.load_all().await?;
        Ok(records.iter().map(HistoryListItem::from_record).collect())
    }

    /// Top `limit` sessions by score, highest first.
    ///
    /// The sort is stable, so equal scores keep their history order.
    ///
    /// # Errors
    ///
    /// Returns `HistoryServiceError::Storage` on repository failures.
    pub async fn leaderboard(
        &self,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, HistoryServiceError> {
        let mut records = self.history.load_all().await?;
        records.sort_by(|a, b| b.score().cmp(&a.score()));

        Ok(records
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, record)| LeaderboardEntry {
                rank: i + 1,
                name: record.name().as_str().to_owned(),
                score: record.score(),
                questions_answered: record.questions_answered(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::PlayerName;
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    async fn seeded(entries: &[(&str, u32)]) -> HistoryService {
        let repo = InMemoryRepository::new();
        for (name, halves) in entries {
            let record = HistoryRecord::from_persisted(
                PlayerName::parse(*name).unwrap(),
                Score::from_halves(*halves),
                10,
                fixed_now(),
            )
            .unwrap();
            repo.append(&record).await.unwrap();
        }
        HistoryService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn leaderboard_sorts_descending_and_keeps_ties_stable() {
        let service = seeded(&[("Ann", 2), ("Bob", 6), ("Cat", 2), ("Dan", 6), ("Eve", 1)]).await;
        let board = service.leaderboard(5).await.unwrap();
        let names: Vec<_> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Dan", "Ann", "Cat", "Eve"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[4].rank, 5);
    }

    #[tokio::test]
    async fn leaderboard_honours_limit() {
        let service = seeded(&[("Ann", 1), ("Bob", 2), ("Cat", 3)]).await;
        let board = service.leaderboard(2).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].name, "Cat");
    }

    #[tokio::test]
    async fn history_keeps_append_order() {
        let service = seeded(&[("Ann", 1), ("Bob", 2)]).await;
        let items = service.list_history().await.unwrap();
        assert_eq!(items[0].name, "Ann");
        assert_eq!(items[1].score, Score::from_halves(2));
    }

    #[tokio::test]
    async fn empty_history_has_empty_views() {
        let service = HistoryService::new(Arc::new(InMemoryRepository::new()));
        assert!(service.list_history().await.unwrap().is_empty());
        assert!(service.leaderboard(5).await.unwrap().is_empty());
    }
}
