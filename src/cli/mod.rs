//! The log window's command line: parsing and execution.
pub mod commands;
pub mod execute;

pub use execute::{submit, Outcome};
