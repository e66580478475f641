//! One-line text encoding of a history record: `name score answered timestamp`.

use chrono::NaiveDateTime;
use quiz_core::model::{HistoryRecord, PlayerName, Score};

use crate::repository::StorageError;

/// `YYYY-MM-DD_HH-MM`, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Names are written as a single token. Valid names never contain `_`, so
/// spaces map onto it and back without loss.
fn encode_name(name: &PlayerName) -> String {
    name.as_str().replace(' ', "_")
}

fn decode_name(token: &str) -> Result<PlayerName, StorageError> {
    PlayerName::parse(token.replace('_', " ")).map_err(ser)
}

/// Format a record as one line, without the trailing newline.
#[must_use]
pub fn encode(record: &HistoryRecord) -> String {
    format!(
        "{} {} {} {}",
        encode_name(record.name()),
        record.score(),
        record.questions_answered(),
        record.recorded_at().format(TIMESTAMP_FORMAT)
    )
}

/// Parse one line. Tokens past the fourth are ignored.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if a field is missing or malformed.
pub fn decode(line: &str) -> Result<HistoryRecord, StorageError> {
    let mut tokens = line.split_whitespace();
    let mut next = |field: &'static str| {
        tokens
            .next()
            .ok_or_else(|| StorageError::Serialization(format!("missing {field}")))
    };

    let name = decode_name(next("name")?)?;
    let score: Score = next("score")?.parse().map_err(ser)?;
    let answered: u32 = next("questions answered")?.parse().map_err(ser)?;
    let recorded_at =
        NaiveDateTime::parse_from_str(next("timestamp")?, TIMESTAMP_FORMAT).map_err(ser)?;

    HistoryRecord::from_persisted(name, score, answered, recorded_at).map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn encodes_in_log_format() {
        assert_eq!(encode(&record("Ada", 3, 2)), "Ada 1.5 2 2023-11-14_22-13");
        assert_eq!(
            encode(&record("Ada King", 0, 0)),
            "Ada_King 0.0 0 2023-11-14_22-13"
        );
    }

    #[test]
    fn decodes_log_lines() {
        let parsed = decode("Grace 2.0 2 2024-01-05_09-07\n").unwrap();
        assert_eq!(parsed.name().as_str(), "Grace");
        assert_eq!(parsed.score(), Score::from_points(2));
        assert_eq!(
            parsed.recorded_at().format(TIMESTAMP_FORMAT).to_string(),
            "2024-01-05_09-07"
        );

        let spaced = decode("Ada_King 1.5 3 2024-01-05_09-07").unwrap();
        assert_eq!(spaced.name().as_str(), "Ada King");
        assert_eq!(decode(&encode(&spaced)).unwrap(), spaced);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(decode("").is_err());
        assert!(decode("Ada 1.5 2").is_err());
        assert!(decode("Ada x 2 2024-01-05_09-07").is_err());
        assert!(decode("Ada 3.0 2 2024-01-05_09-07").is_err());
        assert!(decode("Ada 1.0 1 yesterday").is_err());
        assert!(decode("R2 1.0 1 2024-01-05_09-07").is_err());
    }
}
