//! The full-screen log window: side panel, scrollback and command line.
mod controller;
mod events;
mod lifecycle;
mod render;

pub use controller::TerminalUI;
