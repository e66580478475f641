//! Question file loader.
//!
//! The file is a sequence of 6-line records: question text, four option lines
//! (A to D), then a line whose first character names the correct option.

use std::path::{Path, PathBuf};

use quiz_core::QuestionBank;
use quiz_core::model::{OptionLetter, Question};
use thiserror::Error;

/// Caps applied while reading a question file. Both are enforced by truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankLimits {
    pub max_questions: usize,
    pub max_line_chars: usize,
}

impl Default for BankLimits {
    fn default() -> Self {
        Self {
            max_questions: 100,
            max_line_chars: 200,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("could not read questions file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no questions loaded from {}", .path.display())]
    Empty { path: PathBuf },
}

impl BankLoadError {
    /// The question file that could not be used.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Empty { path } => path,
        }
    }
}

/// Why parsing stopped before the end of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Truncation {
    /// The record starting at `line` is missing option or answer lines.
    IncompleteRecord { line: usize },
    /// The answer line does not start with A, B, C or D.
    InvalidAnswerKey { line: usize },
    /// `max_questions` records were read and more input followed.
    LimitReached { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBank {
    pub bank: QuestionBank,
    pub truncated: Option<Truncation>,
}

fn clip(line: &str, max_chars: usize) -> String {
    line.chars().take(max_chars).collect()
}

/// Parse question records, keeping every complete record before the first bad one.
#[must_use]
pub fn parse_questions(text: &str, limits: &BankLimits) -> ParsedBank {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, clip(l, limits.max_line_chars)));
    let mut questions = Vec::new();

    let truncated = loop {
        let Some((start, prompt)) = lines.next() else {
            break None;
        };
        if questions.len() >= limits.max_questions {
            if prompt.trim().is_empty() && lines.all(|(_, l)| l.trim().is_empty()) {
                break None;
            }
            break Some(Truncation::LimitReached {
                max: limits.max_questions,
            });
        }

        let mut record: Vec<String> = lines.by_ref().take(5).map(|(_, l)| l).collect();
        if record.len() < 5 {
            let trailing_blank =
                prompt.trim().is_empty() && record.iter().all(|l| l.trim().is_empty());
            break (!trailing_blank).then_some(Truncation::IncompleteRecord { line: start });
        }

        let key = record.pop().unwrap_or_default();
        let Some(correct) = key.chars().next().and_then(OptionLetter::from_char) else {
            break Some(Truncation::InvalidAnswerKey { line: start + 5 });
        };

        let options: [String; 4] = match record.try_into() {
            Ok(options) => options,
            Err(_) => break Some(Truncation::IncompleteRecord { line: start }),
        };
        questions.push(Question::new(prompt, options, correct));
    };

    ParsedBank {
        bank: QuestionBank::new(questions),
        truncated,
    }
}

/// Read and parse the question file at `path`.
///
/// # Errors
///
/// Returns `BankLoadError::Io` if the file cannot be read and
/// `BankLoadError::Empty` if it holds no complete record.
pub async fn load_question_bank(
    path: &Path,
    limits: &BankLimits,
) -> Result<QuestionBank, BankLoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| BankLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let text = String::from_utf8_lossy(&bytes);

    let parsed = parse_questions(&text, limits);
    match &parsed.truncated {
        None => {}
        Some(Truncation::LimitReached { max }) => {
            tracing::info!(path = %path.display(), max, "question limit reached; ignoring the rest");
        }
        Some(reason) => {
            tracing::warn!(
                path = %path.display(),
                loaded = parsed.bank.len(),
                ?reason,
                "question file truncated at last complete record"
            );
        }
    }

    if parsed.bank.is_empty() {
        return Err(BankLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    tracing::info!(path = %path.display(), count = parsed.bank.len(), "questions loaded");
    Ok(parsed.bank)
}
