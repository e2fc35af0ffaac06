use super::{Scrollback, TerminalUI, UIEvent};
use crate::window::LogWindow;
use anyhow::Result;
use crossterm::event::{self, Event};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// How often the input thread wakes up when no key is pressed. Each wake-up
/// sends a `Tick` so output drained by the timer gets drawn.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run_tui(window: LogWindow<Scrollback>) -> Result<()> {
    info!("Starting log window");

    let (ui_event_tx, ui_event_rx) = mpsc::unbounded_channel::<UIEvent>();

    let mut terminal_ui = TerminalUI::new(window, ui_event_rx);

    // Terminal input is blocking, so it gets its own thread. The thread ends
    // once the UI drops the receiver.
    std::thread::Builder::new()
        .name("terminal-input".to_string())
        .spawn(move || loop {
            let event = match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key_event)) => UIEvent::KeyPress(key_event),
                    Ok(Event::Resize(width, height)) => UIEvent::Resize(width, height),
                    Ok(_) => continue,
                    Err(e) => {
                        debug!("Failed to read terminal event: {}", e);
                        continue;
                    }
                },
                Ok(false) => UIEvent::Tick,
                Err(e) => {
                    debug!("Terminal poll failed: {}", e);
                    break;
                }
            };
            if ui_event_tx.send(event).is_err() {
                break;
            }
        })?;

    terminal_ui.run().await
}
