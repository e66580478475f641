use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Ordered schema steps. Each version runs once, inside its own transaction.
const MIGRATIONS: &[(i64, &[&str])] = &[(
    1,
    &[
        r"
        CREATE TABLE IF NOT EXISTS history_records (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            score_halves INTEGER NOT NULL CHECK (score_halves >= 0),
            questions_answered INTEGER NOT NULL CHECK (questions_answered >= 0),
            recorded_at TEXT NOT NULL,
            CHECK (score_halves <= questions_answered * 2)
        )
        ",
        r"
        CREATE INDEX IF NOT EXISTS idx_history_records_score
            ON history_records (score_halves DESC, id)
        ",
    ],
)];

/// Applies every migration newer than the recorded schema version.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    let current: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    let current = current.unwrap_or(0);

    for (version, statements) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let mut tx = pool.begin().await?;
        for statement in *statements {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
            .bind(version)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::debug!(version, "applied history schema migration");
    }

    Ok(())
}
