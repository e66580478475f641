use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::{PlayerName, Score};
use crate::time::truncate_to_minute;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryRecordError {
    #[error("score {score} exceeds questions answered ({answered})")]
    ScoreExceedsAnswered { score: Score, answered: u32 },

    #[error("questions answered ({answered}) exceeds bank size ({total})")]
    AnsweredExceedsTotal { answered: u32, total: u32 },
}

/// Durable outcome of one finished session.
///
/// Invariant: `score <= questions_answered`; the timestamp has minute resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    name: PlayerName,
    score: Score,
    questions_answered: u32,
    recorded_at: NaiveDateTime,
}

impl HistoryRecord {
    /// Rehydrate a record from persisted storage.
    ///
    /// Seconds are dropped from `recorded_at`.
    ///
    /// # Errors
    ///
    /// Returns `HistoryRecordError::ScoreExceedsAnswered` if the score is
    /// larger than one point per answered question.
    pub fn from_persisted(
        name: PlayerName,
        score: Score,
        questions_answered: u32,
        recorded_at: NaiveDateTime,
    ) -> Result<Self, HistoryRecordError> {
        if u64::from(score.halves()) > u64::from(questions_answered) * 2 {
            return Err(HistoryRecordError::ScoreExceedsAnswered {
                score,
                answered: questions_answered,
            });
        }

        Ok(Self {
            name,
            score,
            questions_answered,
            recorded_at: truncate_to_minute(recorded_at),
        })
    }

    /// Build a record for a session played against a bank of `total` questions.
    ///
    /// # Errors
    ///
    /// Returns `HistoryRecordError` if the score or count breaks the record invariant.
    pub fn for_session(
        name: PlayerName,
        score: Score,
        questions_answered: u32,
        total: u32,
        recorded_at: NaiveDateTime,
    ) -> Result<Self, HistoryRecordError> {
        if questions_answered > total {
            return Err(HistoryRecordError::AnsweredExceedsTotal {
                answered: questions_answered,
                total,
            });
        }
        Self::from_persisted(name, score, questions_answered, recorded_at)
    }

    #[must_use]
    pub fn name(&self) -> &PlayerName {
        &self.name
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    #[must_use]
    pub fn recorded_at(&self) -> NaiveDateTime {
        self.recorded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Timelike;

    fn name() -> PlayerName {
        PlayerName::parse("Ada").unwrap()
    }

    #[test]
    fn record_drops_seconds() {
        let record = HistoryRecord::from_persisted(name(), Score::from_halves(3), 2, fixed_now())
            .unwrap();
        assert_eq!(record.recorded_at().second(), 0);
        assert_eq!(record.questions_answered(), 2);
    }

    #[test]
    fn score_cannot_exceed_answered() {
        let err = HistoryRecord::from_persisted(name(), Score::from_halves(5), 2, fixed_now())
            .unwrap_err();
        assert_eq!(
            err,
            HistoryRecordError::ScoreExceedsAnswered {
                score: Score::from_halves(5),
                answered: 2
            }
        );
    }

    #[test]
    fn answered_cannot_exceed_bank() {
        let err = HistoryRecord::for_session(name(), Score::ZERO, 4, 3, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            HistoryRecordError::AnsweredExceedsTotal {
                answered: 4,
                total: 3
            }
        );
    }
}
