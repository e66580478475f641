//! Pluggable text decoration. The game logic never sees escape codes.

use crossterm::Command;
use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Stylize, style};
use crossterm::terminal::{Clear, ClearType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    colored: bool,
}

impl Theme {
    #[must_use]
    pub fn colored() -> Self {
        Self { colored: true }
    }

    #[must_use]
    pub fn plain() -> Self {
        Self { colored: false }
    }

    #[must_use]
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn paint(self, text: &str, color: Color) -> String {
        if self.colored {
            style(text).with(color).to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn heading(self, text: &str) -> String {
        self.paint(text, Color::Cyan)
    }

    pub fn label(self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    pub fn notice(self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn hint(self, text: &str) -> String {
        self.paint(text, Color::Magenta)
    }

    pub fn success(self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn error(self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    /// Clear-screen sequence; empty for plain output.
    pub fn clear_screen(self) -> String {
        let mut out = String::new();
        if self.colored {
            // Writing ANSI into a String cannot fail.
            let _ = Clear(ClearType::All).write_ansi(&mut out);
            let _ = MoveTo(0, 0).write_ansi(&mut out);
        }
        out
    }
}
