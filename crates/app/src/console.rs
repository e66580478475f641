use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Line-based terminal I/O over any async reader/writer pair.
pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Reads one line without its terminator. `Ok(None)` means end of input.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub async fn write(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await
    }

    pub async fn writeln(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Waits for ENTER. End of input counts as a keypress.
    pub async fn pause(&mut self) -> io::Result<()> {
        self.write("\nPress ENTER to continue...").await?;
        match self.read_line().await {
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::debug!(%err, "ignoring unreadable input while paused");
                Ok(())
            }
        }
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn strips_line_terminators() {
        let mut console = Console::new(&b"Ada\r\nB\n\nlast"[..], Vec::new());
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("Ada"));
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("B"));
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some(""));
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("last"));
        assert_eq!(console.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn writes_reach_the_writer() {
        let mut console = Console::new(&b""[..], Vec::new());
        console.writeln("hello").await.unwrap();
        console.pause().await.unwrap();
        let out = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(out, "hello\n\nPress ENTER to continue...");
    }
}
