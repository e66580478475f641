#![forbid(unsafe_code)]

pub mod bank;
pub mod model;
pub mod session;
pub mod time;

pub use bank::QuestionBank;
pub use session::{
    AnswerToken, Answered, PlaySession, SessionError, SessionOutcome, SessionPhase, SessionResult,
    Step, Verdict,
};
pub use time::Clock;
