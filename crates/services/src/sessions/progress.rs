use quiz_core::PlaySession;
use quiz_core::model::Score;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    /// 1-based number of the question on screen, if one is.
    pub current: Option<usize>,
    pub answered: u32,
    pub score: Score,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn of(session: &PlaySession) -> Self {
        Self {
            total: session.total_questions(),
            current: session.current_index().map(|i| i + 1),
            answered: session.questions_answered(),
            score: session.score(),
            is_complete: session.is_terminated(),
        }
    }
}
