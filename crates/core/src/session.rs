//! Play-session state machine and scoring rules.
//!
//! A session moves through `AwaitingName -> AwaitingAnswer(i) ->
//! [AwaitingHelpAnswer(i)] -> AwaitingAnswer(i + 1) | Terminated`. Input is fed
//! one line at a time through [`PlaySession::submit`]; the session never does I/O.

use std::sync::Arc;

use thiserror::Error;

use crate::bank::QuestionBank;
use crate::model::{
    Award, HistoryRecord, HistoryRecordError, NameError, OptionLetter, PlayerName, Question, Score,
};
use crate::time::Clock;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question bank is empty")]
    EmptyBank,

    #[error("session already terminated")]
    Terminated,

    #[error("player name has not been entered")]
    NameRequired,

    #[error("question index {0} is out of range")]
    QuestionOutOfRange(usize),

    #[error(transparent)]
    Record(#[from] HistoryRecordError),
}

//
// ─── STATES & OUTCOMES ─────────────────────────────────────────────────────────
//

/// Coarse view of where the session is, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingName,
    AwaitingAnswer,
    AwaitingHelpAnswer,
    Terminated,
}

/// How a session ended. Exactly one holds once the session is terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every question was answered correctly.
    Completed,
    /// A wrong answer ended the session early.
    WrongAnswer,
    /// The input stream failed; no record is produced.
    Aborted,
}

impl SessionOutcome {
    /// Whether this outcome produces a history record.
    #[must_use]
    pub fn is_recorded(self) -> bool {
        !matches!(self, SessionOutcome::Aborted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingName,
    AwaitingAnswer { index: usize },
    AwaitingHelpAnswer { index: usize },
    Terminated(SessionOutcome),
}

/// A first answer token: one of the options, or a request for 50/50 help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerToken {
    Choice(OptionLetter),
    Help,
}

impl AnswerToken {
    /// Parses a single-character token (case-insensitive), surrounding whitespace ignored.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        if c.eq_ignore_ascii_case(&'h') {
            return Some(Self::Help);
        }
        OptionLetter::from_char(c).map(Self::Choice)
    }
}

//
// ─── STEPS ─────────────────────────────────────────────────────────────────────
//

/// Result of evaluating a committed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct(Award),
    Wrong { correct: OptionLetter },
}

/// Terminal summary handed out exactly once, on the transition into `Terminated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub outcome: SessionOutcome,
    pub record: HistoryRecord,
    /// Questions shown to the player, including the one answered wrong.
    pub questions_presented: usize,
    pub total_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answered {
    pub question_index: usize,
    pub verdict: Verdict,
    /// Present when this answer ended the session.
    pub finished: Option<SessionResult>,
}

/// What a single line of input did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Name rejected; still awaiting a name.
    NameRejected(NameError),
    /// Name accepted; the first question is current.
    NameAccepted(PlayerName),
    /// Not one of A/B/C/D/H; the same question is presented again.
    InvalidAnswer,
    /// Correct letter revealed; awaiting the committed answer at half credit.
    HelpRevealed { correct: OptionLetter },
    /// Not one of A/B/C/D after help; back to the same question.
    InvalidHelpAnswer,
    Answered(Answered),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One playthrough by one player.
#[derive(Debug, Clone)]
pub struct PlaySession {
    bank: Arc<QuestionBank>,
    clock: Clock,
    state: State,
    player: Option<PlayerName>,
    score: Score,
    questions_answered: u32,
}

impl PlaySession {
    /// Start a session against `bank`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if the bank has no questions.
    pub fn start(bank: Arc<QuestionBank>, clock: Clock) -> Result<Self, SessionError> {
        if bank.is_empty() {
            return Err(SessionError::EmptyBank);
        }
        Ok(Self {
            bank,
            clock,
            state: State::AwaitingName,
            player: None,
            score: Score::ZERO,
            questions_answered: 0,
        })
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::AwaitingName => SessionPhase::AwaitingName,
            State::AwaitingAnswer { .. } => SessionPhase::AwaitingAnswer,
            State::AwaitingHelpAnswer { .. } => SessionPhase::AwaitingHelpAnswer,
            State::Terminated(_) => SessionPhase::Terminated,
        }
    }

    #[must_use]
    pub fn player(&self) -> Option<&PlayerName> {
        self.player.as_ref()
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
    pub fn total_questions(&self) -> usize {
        self.bank.len()
    }

    /// Index of the question awaiting an answer, if any.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            State::AwaitingAnswer { index } | State::AwaitingHelpAnswer { index } => Some(index),
            State::AwaitingName | State::Terminated(_) => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.bank.get(i))
    }

    #[must_use]
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.state {
            State::Terminated(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        matches!(self.state, State::Terminated(_))
    }

    /// Feed one line of player input to the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Terminated` once the session has ended.
    pub fn submit(&mut self, input: &str) -> Result<Step, SessionError> {
        let input = input.trim_end_matches(['\r', '\n']);
        match self.state {
            State::AwaitingName => Ok(self.accept_name(input)),
            State::AwaitingAnswer { index } => self.accept_answer(index, input),
            State::AwaitingHelpAnswer { index } => self.accept_help_answer(index, input),
            State::Terminated(_) => Err(SessionError::Terminated),
        }
    }

    /// Ends the session because input could not be read. Produces no record.
    ///
    /// Returns the outcome already reached if the session had terminated.
    pub fn abort(&mut self) -> SessionOutcome {
        if let State::Terminated(outcome) = self.state {
            return outcome;
        }
        self.state = State::Terminated(SessionOutcome::Aborted);
        SessionOutcome::Aborted
    }

    fn accept_name(&mut self, input: &str) -> Step {
        match PlayerName::parse(input) {
            Ok(name) => {
                self.player = Some(name.clone());
                self.state = State::AwaitingAnswer { index: 0 };
                Step::NameAccepted(name)
            }
            Err(err) => Step::NameRejected(err),
        }
    }

    fn accept_answer(&mut self, index: usize, input: &str) -> Result<Step, SessionError> {
        match AnswerToken::parse(input) {
            None => Ok(Step::InvalidAnswer),
            Some(AnswerToken::Help) => {
                let correct = self.question(index)?.correct();
                self.state = State::AwaitingHelpAnswer { index };
                Ok(Step::HelpRevealed { correct })
            }
            Some(AnswerToken::Choice(letter)) => self.commit(index, letter, Award::Full),
        }
    }

    fn accept_help_answer(&mut self, index: usize, input: &str) -> Result<Step, SessionError> {
        match OptionLetter::parse(input) {
            Ok(letter) => self.commit(index, letter, Award::Half),
            Err(_) => {
                self.state = State::AwaitingAnswer { index };
                Ok(Step::InvalidHelpAnswer)
            }
        }
    }

    fn commit(
        &mut self,
        index: usize,
        letter: OptionLetter,
        award: Award,
    ) -> Result<Step, SessionError> {
        let question = self.question(index)?;
        let correct = question.correct();

        if !question.is_correct(letter) {
            let result = self.finish(SessionOutcome::WrongAnswer, index + 1)?;
            return Ok(Step::Answered(Answered {
                question_index: index,
                verdict: Verdict::Wrong { correct },
                finished: Some(result),
            }));
        }

        self.score = self.score + award;
        self.questions_answered = self.questions_answered.saturating_add(1);

        let next = index + 1;
        let finished = if next >= self.bank.len() {
            Some(self.finish(SessionOutcome::Completed, next)?)
        } else {
            self.state = State::AwaitingAnswer { index: next };
            None
        };

        Ok(Step::Answered(Answered {
            question_index: index,
            verdict: Verdict::Correct(award),
            finished,
        }))
    }

    fn finish(
        &mut self,
        outcome: SessionOutcome,
        questions_presented: usize,
    ) -> Result<SessionResult, SessionError> {
        let name = self.player.clone().ok_or(SessionError::NameRequired)?;
        let total = u32::try_from(self.bank.len()).unwrap_or(u32::MAX);
        let record = HistoryRecord::for_session(
            name,
            self.score,
            self.questions_answered,
            total,
            self.clock.now_to_minute(),
        )?;

        self.state = State::Terminated(outcome);
        Ok(SessionResult {
            outcome,
            record,
            questions_presented,
            total_questions: self.bank.len(),
        })
    }

    fn question(&self, index: usize) -> Result<&Question, SessionError> {
        self.bank
            .get(index)
            .ok_or(SessionError::QuestionOutOfRange(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_clock;

    fn bank(correct: &[OptionLetter]) -> Arc<QuestionBank> {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, letter)| {
                Question::new(
                    format!("Question {i}"),
                    ["w".into(), "x".into(), "y".into(), "z".into()],
                    *letter,
                )
            })
            .collect();
        Arc::new(QuestionBank::new(questions))
    }

    fn started(correct: &[OptionLetter]) -> PlaySession {
        let mut session = PlaySession::start(bank(correct), fixed_clock()).unwrap();
        assert!(matches!(session.submit("Ada").unwrap(), Step::NameAccepted(_)));
        session
    }

    fn finished(step: Step) -> SessionResult {
        match step {
            Step::Answered(Answered {
                finished: Some(result),
                ..
            }) => result,
            other => panic!("expected a finishing answer, got {other:?}"),
        }
    }

    #[test]
    fn empty_bank_is_refused() {
        let err = PlaySession::start(bank(&[]), fixed_clock()).unwrap_err();
        assert_eq!(err, SessionError::EmptyBank);
    }

    #[test]
    fn invalid_name_keeps_awaiting_name() {
        let mut session = PlaySession::start(bank(&[OptionLetter::A]), fixed_clock()).unwrap();
        let step = session.submit("R2D2").unwrap();
        assert_eq!(step, Step::NameRejected(NameError::InvalidCharacter('2')));
        assert_eq!(session.phase(), SessionPhase::AwaitingName);

        let step = session.submit("").unwrap();
        assert_eq!(step, Step::NameRejected(NameError::Empty));

        session.submit("Ada Lovelace\n").unwrap();
        assert_eq!(session.player().unwrap().as_str(), "Ada Lovelace");
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn mixed_help_and_wrong_answer() {
        use OptionLetter::{A, B, C};
        let mut session = started(&[B, A, C]);

        let step = session.submit("b").unwrap();
        assert!(matches!(
            step,
            Step::Answered(Answered {
                verdict: Verdict::Correct(Award::Full),
                finished: None,
                ..
            })
        ));

        assert_eq!(
            session.submit("H").unwrap(),
            Step::HelpRevealed { correct: A }
        );
        assert_eq!(session.phase(), SessionPhase::AwaitingHelpAnswer);
        session.submit("A").unwrap();
        assert_eq!(session.current_index(), Some(2));

        let result = finished(session.submit("D").unwrap());
        assert_eq!(result.outcome, SessionOutcome::WrongAnswer);
        assert_eq!(result.questions_presented, 3);
        assert_eq!(result.record.score(), Score::from_halves(3));
        assert_eq!(result.record.questions_answered(), 2);
        assert_eq!(session.outcome(), Some(SessionOutcome::WrongAnswer));
    }

    #[test]
    fn all_correct_completes() {
        let mut session = started(&[OptionLetter::C, OptionLetter::D]);
        session.submit("c").unwrap();
        let result = finished(session.submit("D").unwrap());
        assert_eq!(result.outcome, SessionOutcome::Completed);
        assert_eq!(result.record.score(), Score::from_points(2));
        assert_eq!(result.record.questions_answered(), 2);
        assert!(session.is_terminated());
    }

    #[test]
    fn invalid_token_repeats_question() {
        let mut session = started(&[OptionLetter::A, OptionLetter::B]);
        for bad in ["X", "", "ab", "1", "help"] {
            assert_eq!(session.submit(bad).unwrap(), Step::InvalidAnswer);
            assert_eq!(session.current_index(), Some(0));
            assert_eq!(session.score(), Score::ZERO);
        }
        session.submit("a").unwrap();
        assert_eq!(session.current_index(), Some(1));
    }

    #[test]
    fn invalid_answer_after_help_returns_to_question() {
        let mut session = started(&[OptionLetter::A, OptionLetter::B]);
        session.submit("h").unwrap();
        assert_eq!(session.submit("h").unwrap(), Step::InvalidHelpAnswer);
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
        assert_eq!(session.current_index(), Some(0));

        // Without a second help request the answer is worth a full point again.
        session.submit("A").unwrap();
        assert_eq!(session.score(), Score::from_points(1));
    }

    #[test]
    fn wrong_answer_at_k_counts_k() {
        let letters = [OptionLetter::A; 5];
        for k in 0..letters.len() {
            let mut session = started(&letters);
            for _ in 0..k {
                session.submit("A").unwrap();
            }
            let result = finished(session.submit("B").unwrap());
            assert_eq!(result.record.questions_answered() as usize, k);
            assert_eq!(result.questions_presented, k + 1);
        }
    }

    #[test]
    fn help_on_every_answer_halves_score() {
        let mut session = started(&[OptionLetter::B; 4]);
        let mut last = None;
        while !session.is_terminated() {
            session.submit("H").unwrap();
            last = Some(session.submit("b").unwrap());
        }
        let result = finished(last.unwrap());
        assert_eq!(result.record.score().halves(), result.record.questions_answered());
        assert_eq!(result.outcome, SessionOutcome::Completed);
    }

    #[test]
    fn terminated_session_rejects_input() {
        let mut session = started(&[OptionLetter::A]);
        session.submit("B").unwrap();
        assert_eq!(session.submit("A").unwrap_err(), SessionError::Terminated);
        assert_eq!(session.abort(), SessionOutcome::WrongAnswer);
    }

    #[test]
    fn abort_produces_no_record() {
        let mut session = started(&[OptionLetter::A, OptionLetter::A]);
        session.submit("A").unwrap();
        assert_eq!(session.abort(), SessionOutcome::Aborted);
        assert!(!SessionOutcome::Aborted.is_recorded());
        assert_eq!(session.submit("A").unwrap_err(), SessionError::Terminated);
    }

    #[test]
    fn answer_token_parsing() {
        assert_eq!(AnswerToken::parse(" h "), Some(AnswerToken::Help));
        assert_eq!(
            AnswerToken::parse("d"),
            Some(AnswerToken::Choice(OptionLetter::D))
        );
        assert_eq!(AnswerToken::parse("E"), None);
        assert_eq!(AnswerToken::parse("hh"), None);
    }
}
