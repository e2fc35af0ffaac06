//! Runs parsed commands against a log window.
//!
//! Replies are published at NOTICE on the CONSOLE category so they show up in
//! the viewer like any other message, whatever the verbosity.
use super::commands::{Command, CommandError, SettingsAction, Target, HELP};
use crate::logging::timer::TimerState;
use crate::logging::{DisplaySurface, LogCategory, Severity};
use crate::settings::netplay::CHARACTERS;
use crate::window::LogWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

fn reply<S: DisplaySurface>(window: &LogWindow<S>, text: &str) {
    for line in text.lines() {
        window.reply(Severity::Notice, line);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Parses and runs `line`. Errors are reported in the window, never returned.
pub fn submit<S: DisplaySurface>(window: &mut LogWindow<S>, line: &str) -> Outcome {
    let result = Command::parse(line).and_then(|command| match command {
        Some(command) => {
            reply(window, &format!("> {}", line.trim()));
            execute(window, command)
        }
        None => Ok(Outcome::Continue),
    });

    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            window.reply(Severity::Warning, &e.to_string());
            Outcome::Continue
        }
    }
}

pub fn execute<S: DisplaySurface>(
    window: &mut LogWindow<S>,
    command: Command,
) -> Result<Outcome, CommandError> {
    match command {
        Command::Help => {
            for line in HELP {
                reply(window, line);
            }
        }
        Command::Level(level) => {
            window.set_verbosity(level);
            reply(window, &format!("Verbosity set to {}", level));
        }
        Command::Enable(target) => set_target(window, target, true),
        Command::Disable(target) => set_target(window, target, false),
        Command::Toggle => {
            let enabled = window.toggle_all();
            reply(
                window,
                &format!("All categories {}", if enabled { "enabled" } else { "disabled" }),
            );
        }
        Command::File(enabled) => {
            window.set_write_to_file(enabled);
            reply(window, &format!("Write to file {}", on_off(enabled)));
        }
        Command::Console(enabled) => {
            window.set_write_to_console(enabled);
            reply(window, &format!("Write to console {}", on_off(enabled)));
        }
        Command::Clear => window.clear(),
        Command::List => list(window),
        Command::Stats => {
            let stats = window.stats();
            reply(
                window,
                &format!(
                    "queued {}/{}, dropped {}, delivery failures {}",
                    stats.queued, stats.capacity, stats.dropped, stats.delivery_failures
                ),
            );
            let timer = match stats.timer {
                TimerState::Running => "running",
                TimerState::Stopped => "stopped",
            };
            reply(
                window,
                &format!("refresh every {}ms, timer {}", stats.refresh.as_millis(), timer),
            );
            if let Some(last) = stats.last_failure {
                reply(window, &format!("last failure: {}", last));
            }
        }
        Command::Netplay(action) => netplay(window, action)?,
        Command::Playback(action) => playback(window, action)?,
        Command::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Continue)
}

fn set_target<S: DisplaySurface>(window: &mut LogWindow<S>, target: Target, enabled: bool) {
    let state = if enabled { "enabled" } else { "disabled" };
    match target {
        Target::One(category) => {
            window.set_category_enabled(category, enabled);
            reply(window, &format!("{} {}", category.short_name(), state));
        }
        Target::All => {
            for category in LogCategory::all() {
                window.set_category_enabled(category, enabled);
            }
            reply(window, &format!("All categories {}", state));
        }
    }
}

fn list<S: DisplaySurface>(window: &LogWindow<S>) {
    let rows = window.category_rows();
    reply(window, "category      level    view file cons");
    for row in rows {
        let mark = |flag: bool| if flag { "x" } else { "-" };
        reply(
            window,
            &format!(
                "[{}] {:<10} {:<8} {:^4} {:^4} {:^4}  {}",
                mark(row.checked),
                row.category.short_name(),
                row.level.name(),
                mark(row.viewer),
                mark(row.file),
                mark(row.console),
                row.category.full_name()
            ),
        );
    }
}

fn show_json<S: DisplaySurface>(window: &LogWindow<S>, value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => reply(window, &json),
        Err(e) => window.reply(
            Severity::Warning,
            &format!("Failed to render settings: {}", e),
        ),
    }
}

fn netplay<S: DisplaySurface>(
    window: &mut LogWindow<S>,
    action: SettingsAction,
) -> Result<(), CommandError> {
    match action {
        SettingsAction::Show => {
            show_json(window, window.netplay());
            let banned = window.netplay().banned_characters();
            if !banned.is_empty() {
                reply(window, &format!("banned: {}", banned.join(", ")));
            }
            return Ok(());
        }
        SettingsAction::Set { key, value } => {
            window.netplay_mut().set(&key, &value)?;
            reply(window, &format!("netplay.{} updated", key));
        }
        SettingsAction::Ban(index) => {
            window.netplay_mut().ban(index)?;
            reply(window, &format!("{} banned", CHARACTERS[index]));
        }
        SettingsAction::Unban(index) => {
            window.netplay_mut().unban(index)?;
            reply(window, &format!("{} unbanned", CHARACTERS[index]));
        }
    }
    window.persist()?;
    Ok(())
}

fn playback<S: DisplaySurface>(
    window: &mut LogWindow<S>,
    action: SettingsAction,
) -> Result<(), CommandError> {
    match action {
        SettingsAction::Show => {
            show_json(window, window.playback());
            return Ok(());
        }
        SettingsAction::Set { key, value } => {
            window.playback_mut().set(&key, &value)?;
            reply(window, &format!("playback.{} updated", key));
        }
        SettingsAction::Ban(_) | SettingsAction::Unban(_) => {
            return Err(CommandError::Usage("playback [show|set <key> <value>]"));
        }
    }
    window.persist()?;
    Ok(())
}
