use services::{HistoryService, PlayService};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::console::Console;
use crate::play;
use crate::screens;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Play,
    History,
    Leaderboard,
    Help,
    Exit,
}

/// Why a menu line could not be turned into a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidChoice {
    OutOfRange,
    NotANumber,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Result<Self, InvalidChoice> {
        let n: i64 = input.trim().parse().map_err(|_| InvalidChoice::NotANumber)?;
        match n {
            1 => Ok(Self::Play),
            2 => Ok(Self::History),
            3 => Ok(Self::Leaderboard),
            4 => Ok(Self::Help),
            5 => Ok(Self::Exit),
            _ => Err(InvalidChoice::OutOfRange),
        }
    }
}

pub struct MenuController<R, W> {
    console: Console<R, W>,
    play: PlayService,
    history: HistoryService,
    theme: Theme,
    leaderboard_size: usize,
}

impl<R, W> MenuController<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        console: Console<R, W>,
        play: PlayService,
        history: HistoryService,
        theme: Theme,
        leaderboard_size: usize,
    ) -> Self {
        Self {
            console,
            play,
            history,
            theme,
            leaderboard_size,
        }
    }

    /// Reports the loaded bank and waits for ENTER before the first menu.
    pub async fn announce_loaded(&mut self) -> anyhow::Result<()> {
        let loaded = format!("✓ Loaded {} questions successfully!", self.play.bank().len());
        self.console.writeln(&self.theme.success(&loaded)).await?;
        self.console.pause().await?;
        Ok(())
    }

    /// Main loop. Returns when the player exits or input ends.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.console.write(&self.theme.clear_screen()).await?;
            self.console.write(&screens::main_menu(self.theme)).await?;

            let line = match self.console.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(%err, "menu input failed");
                    break;
                }
            };

            match MenuChoice::parse(&line) {
                Ok(MenuChoice::Exit) => break,
                Ok(choice) => self.show(choice).await?,
                Err(invalid) => {
                    let message = match invalid {
                        InvalidChoice::OutOfRange => "Invalid option!",
                        InvalidChoice::NotANumber => "Invalid input! Please enter a number.",
                    };
                    self.console.writeln(&self.theme.error(message)).await?;
                    self.console.writeln("Redirecting to Help...").await?;
                    self.show(MenuChoice::Help).await?;
                }
            }
        }

        self.console
            .writeln(&self.theme.success("\nExiting... Goodbye!"))
            .await?;
        Ok(())
    }

    async fn show(&mut self, choice: MenuChoice) -> anyhow::Result<()> {
        self.console.write(&self.theme.clear_screen()).await?;
        match choice {
            MenuChoice::Play => {
                play::run_session(&mut self.console, &self.play, self.theme).await?;
            }
            MenuChoice::History => self.print_history().await?,
            MenuChoice::Leaderboard => self.print_leaderboard().await?,
            MenuChoice::Help => {
                let text = screens::help(self.theme, self.play.bank().len(), self.leaderboard_size);
                self.console.write(&text).await?;
            }
            MenuChoice::Exit => return Ok(()),
        }
        self.console.pause().await?;
        Ok(())
    }

    async fn print_history(&mut self) -> anyhow::Result<()> {
        match self.history.list_history().await {
            Ok(items) => {
                self.console
                    .write(&screens::history(self.theme, &items))
                    .await?;
            }
            Err(err) => {
                tracing::warn!(%err, "failed to load history");
                self.console
                    .writeln(&self.theme.error(&format!("Could not load history: {err}")))
                    .await?;
            }
        }
        Ok(())
    }

    async fn print_leaderboard(&mut self) -> anyhow::Result<()> {
        match self.history.leaderboard(self.leaderboard_size).await {
            Ok(entries) => {
                self.console
                    .write(&screens::leaderboard(self.theme, &entries))
                    .await?;
            }
            Err(err) => {
                tracing::warn!(%err, "failed to load leaderboard");
                self.console
                    .writeln(&self.theme.error(&format!("Could not load leaderboard: {err}")))
                    .await?;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.console.into_writer()
    }
}
