use std::fmt;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("invalid option letter: {0:?}")]
    InvalidLetter(String),
}

//
// ─── OPTION LETTER ─────────────────────────────────────────────────────────────
//

/// One of the four labeled answer slots of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Case-insensitive conversion from a single character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    /// Parses a whole token: exactly one letter, surrounding whitespace ignored.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidLetter` for anything other than a single A-D.
    pub fn parse(token: &str) -> Result<Self, QuestionError> {
        let mut chars = token.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_char(c).ok_or_else(|| QuestionError::InvalidLetter(token.to_owned()))
            }
            _ => Err(QuestionError::InvalidLetter(token.to_owned())),
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tag carried by every question.
///
/// Loaded questions are always `Medium`; nothing reads the value yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with four options and one correct letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: [String; 4],
    correct: OptionLetter,
    difficulty: Difficulty,
}

impl Question {
    /// Creates a question with the default difficulty.
    ///
    /// Blank text or options are kept as they are; a question file may
    /// legitimately contain empty lines inside a record.
    #[must_use]
    pub fn new(text: impl Into<String>, options: [String; 4], correct: OptionLetter) -> Self {
        Self {
            text: text.into(),
            options,
            correct,
            difficulty: Difficulty::default(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn option(&self, letter: OptionLetter) -> &str {
        &self.options[letter.index()]
    }

    /// Options paired with their labels, in A-D order.
    pub fn labeled_options(&self) -> impl Iterator<Item = (OptionLetter, &str)> {
        OptionLetter::ALL
            .into_iter()
            .zip(self.options.iter().map(String::as_str))
    }

    #[must_use]
    pub fn correct(&self) -> OptionLetter {
        self.correct
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn is_correct(&self, letter: OptionLetter) -> bool {
        self.correct == letter
    }
}
