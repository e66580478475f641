mod progress;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use progress::SessionProgress;
pub use quiz_core::SessionError;
pub use view::{HistoryListItem, HistoryService, LeaderboardEntry};
pub use workflow::{PersistStatus, PlayService, PlayStepResult};
