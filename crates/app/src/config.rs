//! Runtime configuration: environment first, then command-line flags.
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use storage::questions::BankLimits;
use thiserror::Error;

const DEFAULT_QUESTIONS: &str = "questions.txt";
const DEFAULT_HISTORY: &str = "history.txt";
const DEFAULT_LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("{flag} requires a value")]
    MissingValue { flag: &'static str },
    #[error("unknown argument: {0}")]
    UnknownArg(String),
    #[error("invalid {flag} value: {raw}")]
    InvalidNumber { flag: &'static str, raw: String },
    #[error("invalid --history value: {raw}")]
    InvalidHistory { raw: String },
}

/// Where finished sessions are recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryTarget {
    /// Plain append-only text log.
    File(PathBuf),
    /// SQLite database URL (`sqlite://...` or `sqlite::memory:`).
    Sqlite(String),
}

impl HistoryTarget {
    /// Values starting with `sqlite:` select SQLite; anything else is a file path.
    pub fn parse(raw: &str) -> Result<Self, ArgsError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ArgsError::InvalidHistory {
                raw: raw.to_owned(),
            });
        }
        if trimmed.starts_with("sqlite:") {
            Ok(Self::Sqlite(normalize_sqlite_url(trimmed)))
        } else {
            Ok(Self::File(PathBuf::from(trimmed)))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub questions_path: PathBuf,
    pub history: HistoryTarget,
    pub limits: BankLimits,
    pub leaderboard_size: usize,
    pub color: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from(DEFAULT_QUESTIONS),
            history: HistoryTarget::File(PathBuf::from(DEFAULT_HISTORY)),
            limits: BankLimits::default(),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            color: true,
        }
    }
}

impl QuizConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `QUIZ_QUESTIONS` - Question file (default: questions.txt)
    /// - `QUIZ_HISTORY` - History file, or a `sqlite:` URL (default: history.txt)
    /// - `QUIZ_MAX_QUESTIONS` - Questions loaded at most (default: 100)
    /// - `QUIZ_MAX_LINE_CHARS` - Longest accepted question line (default: 200)
    /// - `QUIZ_LEADERBOARD_SIZE` - Leaderboard rows (default: 5)
    /// - `NO_COLOR` - Disable colors and screen clearing when set
    ///
    /// Colors are also off when stdout is not a terminal.
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| env::var(key).ok());
        if !std::io::stdout().is_terminal() {
            config.color = false;
        }
        config
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = read("QUIZ_QUESTIONS") {
            config.questions_path = PathBuf::from(path);
        }
        if let Some(target) = read("QUIZ_HISTORY").and_then(|v| HistoryTarget::parse(&v).ok()) {
            config.history = target;
        }
        if let Some(max) = read("QUIZ_MAX_QUESTIONS").and_then(|v| v.trim().parse().ok()) {
            config.limits.max_questions = max;
        }
        if let Some(max) = read("QUIZ_MAX_LINE_CHARS").and_then(|v| v.trim().parse().ok()) {
            config.limits.max_line_chars = usize::max(max, 1);
        }
        if let Some(size) = read("QUIZ_LEADERBOARD_SIZE").and_then(|v| v.trim().parse().ok()) {
            config.leaderboard_size = size;
        }
        if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            config.color = false;
        }

        config
    }

    /// Apply command-line flags on top of the current values.
    ///
    /// Returns `Ok(false)` when `--help` was requested.
    pub fn apply_args(
        &mut self,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<bool, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    self.questions_path = PathBuf::from(require_value(args, "--questions")?);
                }
                "--history" => {
                    self.history = HistoryTarget::parse(&require_value(args, "--history")?)?;
                }
                "--max-questions" => {
                    self.limits.max_questions = parse_number(args, "--max-questions")?;
                }
                "--leaderboard-size" => {
                    self.leaderboard_size = parse_number(args, "--leaderboard-size")?;
                }
                "--no-color" => self.color = false,
                "--help" | "-h" => return Ok(false),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(true)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<usize, ArgsError> {
    let raw = require_value(args, flag)?;
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_owned();
    }

    let path_str = raw.strip_prefix("sqlite:").unwrap_or(raw);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories so sqlx can open it.
pub fn prepare_sqlite_file(db_url: &str) -> std::io::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Ok(());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
    }
    Ok(())
}
