//! Line-mode front end: viewer output on stdout, commands from stdin.
use crate::cli::Outcome;
use crate::logging::DisplaySurface;
use crate::window::LogWindow;
use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Prints each drained line to stdout in its severity colour.
pub struct StdoutSurface {
    out: io::Stdout,
}

impl StdoutSurface {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl DisplaySurface for StdoutSurface {
    fn append_styled(&mut self, color: Color, text: &str) {
        let mut out = self.out.lock();
        let _ = queue!(out, SetForegroundColor(color), Print(text), ResetColor, Print("\n"));
        let _ = out.flush();
    }

    fn clear(&mut self) {
        let mut out = self.out.lock();
        let _ = queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0));
        let _ = out.flush();
    }
}

/// Reads stdin lines on a plain thread. A blocking read cannot be cancelled,
/// so it must not live on the runtime or shutdown would wait for the next
/// line. The thread ends when stdin closes or the receiver is dropped.
fn spawn_stdin_reader(
    input: impl BufRead + Send + 'static,
) -> io::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

/// Runs until stdin closes, `quit` is entered or Ctrl+C arrives.
pub async fn run(window: LogWindow<StdoutSurface>) -> Result<()> {
    info!("Log window running headless; type 'help' for commands");
    let lines = spawn_stdin_reader(io::BufReader::new(io::stdin()))?;
    drive(window, lines, tokio::signal::ctrl_c()).await;
    Ok(())
}

async fn drive<S: DisplaySurface>(
    mut window: LogWindow<S>,
    mut lines: mpsc::UnboundedReceiver<String>,
    interrupt: impl std::future::Future,
) {
    tokio::pin!(interrupt);
    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(line) => {
                    if window.submit(&line) == Outcome::Quit {
                        break;
                    }
                }
                None => break,
            },
            _ = &mut interrupt => break,
        }
    }
    window.close();
}
