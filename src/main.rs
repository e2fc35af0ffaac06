//! The main entry point for the emu-logview application.
mod app;
mod cli;
mod logging;
mod settings;
mod ui;
mod window;

use anyhow::Result;

/// Parses the command line, opens the log window and runs it until the user
/// quits, in either the terminal or the headless front end.
#[tokio::main]
async fn main() -> Result<()> {
    app::launch().await
}
