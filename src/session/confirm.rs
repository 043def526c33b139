// src/session/confirm.rs

use std::future::Future;
use std::io;
use std::pin::Pin;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout,
};

use crate::validator::ValidatedCommand;

/// Gate between validation and execution.
pub trait Confirm: Send {
    /// Show `cmd` and return whether it may run.
    fn confirm<'a>(
        &'a mut self,
        cmd: &'a ValidatedCommand,
    ) -> Pin<Box<dyn Future<Output = io::Result<bool>> + Send + 'a>>;
}

/// Line-oriented terminal: reads user input and prints prompts.
///
/// The interactive loop and the confirmation prompt share one `Console` so
/// buffered input is never split between two readers.
pub struct Console<R, W> {
    lines: Lines<R>,
    writer: W,
}

/// The console used in production.
pub type StdioConsole = Console<BufReader<Stdin>, Stdout>;

impl StdioConsole {
    pub fn stdio() -> Self {
        Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: reader.lines(),
            writer,
        }
    }

    /// Next input line without its line terminator; `None` at EOF.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    pub async fn print(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R, W> Confirm for Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Pressing Enter on an empty line confirms; any other input or EOF
    /// declines.
    fn confirm<'a>(
        &'a mut self,
        cmd: &'a ValidatedCommand,
    ) -> Pin<Box<dyn Future<Output = io::Result<bool>> + Send + 'a>> {
        Box::pin(async move {
            self.print(&format!(
                "Are you sure want to execute the following command? Press Enter to execute this: {cmd}\n"
            ))
            .await?;
            Ok(matches!(self.read_line().await?, Some(line) if line.is_empty()))
        })
    }
}

/// Gate that always confirms (`--yes`), echoing the command to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm {
    pub quiet: bool,
}

impl Confirm for AutoConfirm {
    fn confirm<'a>(
        &'a mut self,
        cmd: &'a ValidatedCommand,
    ) -> Pin<Box<dyn Future<Output = io::Result<bool>> + Send + 'a>> {
        if !self.quiet {
            eprintln!("Executing: {cmd}");
        }
        Box::pin(std::future::ready(Ok(true)))
    }
}
