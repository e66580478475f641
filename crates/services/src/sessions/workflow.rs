use std::sync::Arc;

use quiz_core::{
    Answered, Clock, PlaySession, QuestionBank, SessionError, SessionOutcome, SessionResult, Step,
};
use storage::repository::HistoryRepository;

use super::progress::SessionProgress;

/// Whether the record of a finished session reached the history store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    Saved,
    /// The write failed; the session result still stands.
    Failed(String),
}

/// Result of feeding one line of input to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayStepResult {
    pub step: Step,
    pub is_complete: bool,
    /// Set only on the step that finished the session.
    pub persisted: Option<PersistStatus>,
}

impl PlayStepResult {
    /// The terminal summary, when this step ended the session.
    #[must_use]
    pub fn finished(&self) -> Option<&SessionResult> {
        match &self.step {
            Step::Answered(Answered {
                finished: Some(result),
                ..
            }) => Some(result),
            _ => None,
        }
    }
}

/// Orchestrates session start and persisted answering.
///
/// The bank is shared read-only between sessions; one record is appended per
/// finished session, on the transition that finishes it.
#[derive(Clone)]
pub struct PlayService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    history: Arc<dyn HistoryRepository>,
}

impl PlayService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<QuestionBank>, history: Arc<dyn HistoryRepository>) -> Self {
        Self {
            clock,
            bank,
            history,
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Start a new session against the shared bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if there is nothing to play.
    pub fn start_session(&self) -> Result<PlaySession, SessionError> {
        let session = PlaySession::start(Arc::clone(&self.bank), self.clock)?;
        tracing::debug!(questions = self.bank.len(), "session started");
        Ok(session)
    }

    /// Feed one line of input and persist the record when the session finishes.
    ///
    /// A failed append is logged and reported through `PersistStatus::Failed`;
    /// it never changes the session outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Terminated` if the session already ended.
    pub async fn submit(
        &self,
        session: &mut PlaySession,
        input: &str,
    ) -> Result<PlayStepResult, SessionError> {
        let step = session.submit(input)?;

        let mut result = PlayStepResult {
            step,
            is_complete: session.is_terminated(),
            persisted: None,
        };

        if let Some(finished) = result.finished() {
            let record = &finished.record;
            tracing::info!(
                outcome = ?finished.outcome,
                score = %record.score(),
                answered = record.questions_answered(),
                "session finished"
            );
            let status = match self.history.append(record).await {
                Ok(()) => PersistStatus::Saved,
                Err(err) => {
                    tracing::warn!(%err, "failed to save history record");
                    PersistStatus::Failed(err.to_string())
                }
            };
            result.persisted = Some(status);
        }

        Ok(result)
    }

    /// End the session after an input failure. Nothing is persisted.
    pub fn abort(&self, session: &mut PlaySession) -> SessionOutcome {
        let outcome = session.abort();
        if outcome == SessionOutcome::Aborted {
            tracing::warn!(
                answered = session.questions_answered(),
                "session aborted on input failure; no record saved"
            );
        }
        outcome
    }

    #[must_use]
    pub fn progress(&self, session: &PlaySession) -> SessionProgress {
        SessionProgress::of(session)
    }
}
