use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::cli::Outcome;
use crate::ui::input::InputLine;
use crate::ui::{Scrollback, UIEvent};
use crate::window::LogWindow;

pub struct TerminalUI {
    pub(super) window: LogWindow<Scrollback>,
    pub(super) input: InputLine,
    pub(super) event_rx: mpsc::UnboundedReceiver<UIEvent>,
    pub(super) terminal_size: (u16, u16),
    /// Scrollback revision at the last redraw.
    pub(super) drawn_revision: Option<u64>,
    pub(super) dirty: bool,
    pub(super) raw_mode: bool,
}

impl TerminalUI {
    pub fn new(window: LogWindow<Scrollback>, event_rx: mpsc::UnboundedReceiver<UIEvent>) -> Self {
        Self {
            window,
            input: InputLine::new(),
            event_rx,
            terminal_size: (80, 24),
            drawn_revision: None,
            dirty: true,
            raw_mode: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.initialize_terminal()?;

        debug!("Starting terminal UI loop");

        while let Some(event) = self.event_rx.recv().await {
            match self.handle_event(event) {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Continue) => {}
                Err(e) => error!("Error handling UI event: {}", e),
            }

            if self.needs_redraw() {
                self.render()?;
            }
        }

        self.window.close();
        self.cleanup()
    }

    fn needs_redraw(&self) -> bool {
        self.dirty || self.drawn_revision != Some(self.window.surface().lock().revision())
    }
}
