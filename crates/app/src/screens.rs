//! Text for each screen. Pure functions so layout can be tested without a terminal.

use std::fmt::Write as _;

use quiz_core::model::{MAX_NAME_CHARS, Question};
use services::{HistoryListItem, LeaderboardEntry};

use crate::theme::Theme;

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn main_menu(theme: Theme) -> String {
    let mut out = theme.heading("=== Main Menu ===");
    out.push('\n');
    for (n, item) in ["Play Game", "Game History", "Leaderboard", "Help", "Exit"]
        .iter()
        .enumerate()
    {
        let _ = writeln!(out, "{}. {}", n + 1, theme.label(item));
    }
    out.push_str("Choose an option: ");
    out
}

pub fn help(theme: Theme, total_questions: usize, leaderboard_size: usize) -> String {
    let mut out = theme.heading("=== Help ===");
    out.push('\n');
    let _ = writeln!(
        out,
        "1. {}: Answer quiz questions. Wrong answer = game over!",
        theme.label("Play Game")
    );
    let _ = writeln!(
        out,
        "2. {}: View all past player scores with timestamps",
        theme.label("Game History")
    );
    let _ = writeln!(
        out,
        "3. {}: View the top {leaderboard_size} players with highest scores",
        theme.label("Leaderboard")
    );
    let _ = writeln!(out, "4. {}: Shows this help menu", theme.label("Help"));
    let _ = writeln!(out, "5. {}: Quit the application\n", theme.label("Exit"));
    out.push_str(&theme.notice("Game Rules:"));
    out.push('\n');
    out.push_str("- Correct answer: +1 point\n");
    out.push_str("- Use 'H' for 50/50 help: reveals the answer (scores 0.5 points)\n");
    out.push_str("- One wrong answer ends the game\n");
    let _ = writeln!(out, "- Try to answer all {total_questions} questions!");
    out
}

pub fn name_prompt() -> String {
    format!("Enter your name (letters and spaces only, max {MAX_NAME_CHARS} chars): ")
}

pub fn question(theme: Theme, number: usize, total: usize, question: &Question) -> String {
    let mut out = String::from("\n");
    out.push_str(&theme.notice(&format!("Question {number}/{total}")));
    out.push('\n');
    out.push_str(&theme.notice(question.text()));
    out.push('\n');
    for (letter, option) in question.labeled_options() {
        let _ = writeln!(out, "{letter}. {}", theme.label(option));
    }
    out.push_str("Your answer (A/B/C/D, or H for 50/50 help): ");
    out
}

pub fn history(theme: Theme, items: &[HistoryListItem]) -> String {
    let mut out = theme.heading("=== Game History ===");
    out.push('\n');
    if items.is_empty() {
        out.push_str("No history found.\n");
        return out;
    }

    let header = format!("{:<20} {:<10} {:<8} {:<15}", "Player", "Score", "Q's", "Date");
    out.push_str(&theme.hint(&header));
    out.push('\n');
    out.push_str(&"-".repeat(60));
    out.push('\n');
    for item in items {
        let _ = writeln!(
            out,
            "{:<20} {:<10} {:<8} {:<15}",
            item.name,
            item.score,
            item.questions_answered,
            item.recorded_at.format(DISPLAY_TIME_FORMAT)
        );
    }
    out
}

pub fn leaderboard(theme: Theme, entries: &[LeaderboardEntry]) -> String {
    let mut out = theme.heading("=== Leaderboard ===");
    out.push('\n');
    if entries.is_empty() {
        out.push_str("No players yet.\n");
        return out;
    }

    out.push_str(&theme.hint("Rank  Player               Score    Questions"));
    out.push('\n');
    out.push_str(&"-".repeat(46));
    out.push('\n');
    for entry in entries {
        let medal = match entry.rank {
            1 => "🥇",
            2 => "🥈",
            3 => "🥉",
            _ => "  ",
        };
        let rank = format!("{}.", entry.rank);
        let _ = writeln!(
            out,
            "{rank:<3}{medal} {} {:<8} {:<8}",
            theme.label(&format!("{:<20}", entry.name)),
            entry.score,
            entry.questions_answered
        );
    }
    out
}
