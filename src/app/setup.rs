//! This module handles the initial setup of the application.
use super::args::AppArgs;
use crate::logging::{ConsoleSink, FileSink, LogRouter, RouterLayer};
use crate::settings::SettingsStore;
use crate::window::{Outputs, WindowOptions};
use anyhow::Result;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Filter applied to host `tracing` events when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Everything the log window needs, built from the command line.
pub struct PreparedApp {
    pub args: AppArgs,
    pub router: Arc<LogRouter>,
    pub store: SettingsStore,
    pub outputs: Outputs,
    pub options: WindowOptions,
}

/// Prepares the application for running.
///
/// Creates the data directory, loads settings, builds the router and installs
/// the `tracing` bridge into it, then creates the file and console sinks.
pub fn prepare(args: AppArgs) -> Result<PreparedApp> {
    std::fs::create_dir_all(&args.data_dir)?;

    let config_path = args
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&args.data_dir).join("logview.toml"));
    let log_path = args
        .log_file
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&args.data_dir).join("emu.log"));

    print_start_banner(&args, &config_path, &log_path);

    let router = Arc::new(LogRouter::new());
    configure_logging(router.clone());

    let store = SettingsStore::load(&config_path);

    let outputs = Outputs {
        file: Arc::new(FileSink::new(log_path)),
        console: Arc::new(console_sink(args.headless)),
    };

    let options = WindowOptions {
        capacity: args.capacity,
        interval: Duration::from_millis(args.interval_ms),
    };

    Ok(PreparedApp {
        args,
        router,
        store,
        outputs,
        options,
    })
}

/// Routes the process's own `tracing` events through the router.
fn configure_logging(router: Arc<LogRouter>) {
    if let Err(e) = RouterLayer::init_subscriber(router, DEFAULT_FILTER) {
        eprintln!("Failed to install log collector: {}", e);
    }
}

/// The terminal window owns the screen while it runs, so console output is
/// only written when stderr has been redirected away from it.
fn console_sink(headless: bool) -> ConsoleSink {
    if headless || !io::stderr().is_terminal() {
        ConsoleSink::stderr()
    } else {
        ConsoleSink::with_writer(io::sink())
    }
}

/// Prints a banner with startup information.
fn print_start_banner(args: &AppArgs, config_path: &std::path::Path, log_path: &std::path::Path) {
    println!("Starting emu-logview");
    println!(
        "Mode: {}",
        if args.headless { "Headless" } else { "Terminal" }
    );
    println!("Settings: {}", config_path.display());
    println!("Log file: {}", log_path.display());
    println!(
        "Viewer: {} messages every {}ms",
        args.capacity, args.interval_ms
    );
    println!();
}
