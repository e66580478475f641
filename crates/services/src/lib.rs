#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::HistoryServiceError;
pub use sessions::{
    HistoryListItem, HistoryService, LeaderboardEntry, PersistStatus, PlayService,
    PlayStepResult, SessionProgress,
};
