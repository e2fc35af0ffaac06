//! The interactive terminal front end of the log window.
pub mod input;
pub mod runner;
pub mod scrollback;
pub mod terminal;

pub use runner::run_tui;
pub use scrollback::Scrollback;
pub use terminal::TerminalUI;

use crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum UIEvent {
    KeyPress(KeyEvent),
    Resize(u16, u16),
    /// No input arrived within the poll interval.
    Tick,
}
