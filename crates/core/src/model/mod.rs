mod history;
mod player;
mod question;
mod score;

pub use history::{HistoryRecord, HistoryRecordError};
pub use player::{MAX_NAME_CHARS, NameError, PlayerName};
pub use question::{Difficulty, OptionLetter, Question, QuestionError};
pub use score::{Award, Score, ScoreParseError};
