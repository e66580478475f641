use std::fmt;

use thiserror::Error;

/// Longest accepted player name, in characters.
pub const MAX_NAME_CHARS: usize = 49;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,

    #[error("name is too long ({len} characters, max {max})")]
    TooLong { len: usize, max: usize },

    #[error("name may only contain letters and spaces (found {0:?})")]
    InvalidCharacter(char),
}

/// A validated player name: 1 to 49 ASCII letters or spaces.
///
/// Interior and edge whitespace is kept as typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    /// # Errors
    ///
    /// Returns `NameError` if the name is empty, too long, or contains
    /// anything other than ASCII letters and spaces.
    pub fn parse(raw: impl Into<String>) -> Result<Self, NameError> {
        let raw = raw.into();
        let len = raw.chars().count();
        if len == 0 {
            return Err(NameError::Empty);
        }
        if len > MAX_NAME_CHARS {
            return Err(NameError::TooLong {
                len,
                max: MAX_NAME_CHARS,
            });
        }
        if let Some(bad) = raw.chars().find(|c| !(c.is_ascii_alphabetic() || *c == ' ')) {
            return Err(NameError::InvalidCharacter(bad));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
