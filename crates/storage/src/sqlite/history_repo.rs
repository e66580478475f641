use chrono::NaiveDateTime;
use quiz_core::model::HistoryRecord;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{name_from_text, score_from_i64, ser, u32_from_i64};
use crate::repository::{HistoryRepository, StorageError};

fn map_history_row(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryRecord, StorageError> {
    let name = name_from_text(row.try_get::<String, _>("name").map_err(ser)?)?;
    let score = score_from_i64(row.try_get::<i64, _>("score_halves").map_err(ser)?)?;
    let answered = u32_from_i64(
        "questions_answered",
        row.try_get::<i64, _>("questions_answered").map_err(ser)?,
    )?;
    let recorded_at: NaiveDateTime = row.try_get("recorded_at").map_err(ser)?;

    HistoryRecord::from_persisted(name, score, answered, recorded_at).map_err(ser)
}

#[async_trait::async_trait]
impl HistoryRepository for SqliteRepository {
    async fn append(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO history_records (
                    name, score_halves, questions_answered, recorded_at
                )
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(record.name().as_str())
        .bind(i64::from(record.score().halves()))
        .bind(i64::from(record.questions_answered()))
        .bind(record.recorded_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT name, score_halves, questions_answered, recorded_at
                FROM history_records
                ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_history_row(&row)?);
        }

        Ok(out)
    }
}
