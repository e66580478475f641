use quiz_core::model::{PlayerName, Score};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn score_from_i64(v: i64) -> Result<Score, StorageError> {
    Ok(Score::from_halves(u32_from_i64("score_halves", v)?))
}

pub(crate) fn name_from_text(raw: String) -> Result<PlayerName, StorageError> {
    PlayerName::parse(raw).map_err(ser)
}
