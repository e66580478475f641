mod config;
mod console;
mod menu;
mod play;
mod screens;
mod theme;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use services::{Clock, HistoryService, PlayService};
use storage::questions::load_question_bank;
use storage::repository::Storage;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::config::{HistoryTarget, QuizConfig, prepare_sqlite_file};
use crate::console::Console;
use crate::menu::MenuController;
use crate::theme::Theme;

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [play]       [options]   # interactive menu (default)");
    eprintln!("  quiz history      [options]   # print game history and exit");
    eprintln!("  quiz leaderboard  [options]   # print the leaderboard and exit");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --questions <path>        question file (default questions.txt)");
    eprintln!("  --history <path|url>      history file or sqlite: URL (default history.txt)");
    eprintln!("  --max-questions <n>       questions loaded at most (default 100)");
    eprintln!("  --leaderboard-size <n>    leaderboard rows (default 5)");
    eprintln!("  --no-color                plain output, no screen clearing");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_QUESTIONS, QUIZ_HISTORY, QUIZ_MAX_QUESTIONS, QUIZ_MAX_LINE_CHARS,");
    eprintln!("  QUIZ_LEADERBOARD_SIZE, NO_COLOR, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    History,
    Leaderboard,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "history" => Some(Self::History),
            "leaderboard" => Some(Self::Leaderboard),
            _ => None,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn open_storage(target: &HistoryTarget) -> anyhow::Result<Storage> {
    match target {
        HistoryTarget::File(path) => Ok(Storage::file(path.clone())),
        HistoryTarget::Sqlite(url) => {
            prepare_sqlite_file(url)
                .with_context(|| format!("could not create database file for {url}"))?;
            Storage::sqlite(url)
                .await
                .with_context(|| format!("could not open history database {url}"))
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let first = argv.first().cloned();
    let cmd = match first.as_deref() {
        None => Command::Play,
        Some(first) if first.starts_with('-') => Command::Play,
        Some(first) => match Command::from_arg(first) {
            Some(cmd) => {
                argv.remove(0);
                cmd
            }
            None => {
                eprintln!("unknown subcommand: {first}");
                print_usage();
                return Ok(ExitCode::from(2));
            }
        },
    };

    let mut config = QuizConfig::from_env();
    match config.apply_args(&mut argv.into_iter()) {
        Ok(true) => {}
        Ok(false) => {
            print_usage();
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Ok(ExitCode::from(2));
        }
    }
    tracing::debug!(?config, ?cmd, "configuration resolved");

    let theme = Theme::new(config.color);
    let storage = open_storage(&config.history).await?;
    let history = HistoryService::new(Arc::clone(&storage.history));

    match cmd {
        Command::History => {
            let items = history.list_history().await?;
            print!("{}", screens::history(theme, &items));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Leaderboard => {
            let entries = history.leaderboard(config.leaderboard_size).await?;
            print!("{}", screens::leaderboard(theme, &entries));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Play => {}
    }

    println!("{}", theme.heading("Welcome to the Quiz Game!"));
    println!("Loading questions...");
    let bank = match load_question_bank(&config.questions_path, &config.limits).await {
        Ok(bank) => bank,
        Err(err) => {
            tracing::error!(%err, "question bank unavailable");
            eprintln!(
                "{}",
                theme.error(&format!(
                    "Error: No questions loaded. Please check '{}' file.",
                    err.path().display()
                ))
            );
            return Ok(ExitCode::from(1));
        }
    };
    let play = PlayService::new(
        Clock::default_clock(),
        Arc::new(bank),
        Arc::clone(&storage.history),
    );
    let console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    let mut menu = MenuController::new(console, play, history, theme, config.leaderboard_size);
    menu.announce_loaded().await?;
    menu.run().await?;

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(code) => code,
        Err(err) => {
            // At this layer (binary glue), printing once is fine.
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}
