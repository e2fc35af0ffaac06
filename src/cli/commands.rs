//! Parsing of the command lines typed into the log window.
use crate::logging::severity::ParseSeverityError;
use crate::logging::{LogCategory, Severity};
use crate::settings::SettingsError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown log category '{0}'")]
    UnknownCategory(String),
    #[error(transparent)]
    Severity(#[from] ParseSeverityError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Which categories an enable/disable command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    All,
    One(LogCategory),
}

impl FromStr for Target {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Target::All);
        }
        s.parse()
            .map(Target::One)
            .map_err(|_| CommandError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    Show,
    Set { key: String, value: String },
    Ban(usize),
    Unban(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Level(Severity),
    Enable(Target),
    Disable(Target),
    Toggle,
    File(bool),
    Console(bool),
    Clear,
    List,
    Stats,
    Netplay(SettingsAction),
    Playback(SettingsAction),
    Quit,
}

pub const HELP: &[&str] = &[
    "help                          show this list",
    "level <0-4|name>              set verbosity for every category",
    "enable <CATEGORY|all>         check a category",
    "disable <CATEGORY|all>        uncheck a category",
    "toggle                        check or uncheck every category",
    "file <on|off>                 write to the log file",
    "console <on|off>              write to the console",
    "clear                         clear the log window",
    "list                          show categories and their outputs",
    "stats                         show queue and delivery counters",
    "netplay [show|set k v|ban n|unban n]",
    "playback [show|set k v]",
    "quit                          close the window",
];

fn parse_switch(arg: Option<&str>, usage: &'static str) -> Result<bool, CommandError> {
    match arg.map(str::to_ascii_lowercase).as_deref() {
        Some("on" | "true" | "1") => Ok(true),
        Some("off" | "false" | "0") => Ok(false),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_index(arg: Option<&str>, usage: &'static str) -> Result<usize, CommandError> {
    arg.and_then(|a| a.parse().ok())
        .ok_or(CommandError::Usage(usage))
}

fn parse_settings_action(
    parts: &[&str],
    usage: &'static str,
    allow_bans: bool,
) -> Result<SettingsAction, CommandError> {
    match parts.first().copied() {
        None | Some("show") => Ok(SettingsAction::Show),
        Some("set") if parts.len() >= 3 => Ok(SettingsAction::Set {
            key: parts[1].to_string(),
            value: parts[2..].join(" "),
        }),
        Some("ban") if allow_bans => {
            Ok(SettingsAction::Ban(parse_index(parts.get(1).copied(), usage)?))
        }
        Some("unban") if allow_bans => {
            Ok(SettingsAction::Unban(parse_index(parts.get(1).copied(), usage)?))
        }
        _ => Err(CommandError::Usage(usage)),
    }
}

impl Command {
    /// Parses one command line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = parts.split_first() else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "level" => {
                let arg = args
                    .first()
                    .ok_or(CommandError::Usage("level <0-4|error|warning|notice|info|debug>"))?;
                Command::Level(arg.parse()?)
            }
            "enable" => Command::Enable(
                args.first()
                    .ok_or(CommandError::Usage("enable <CATEGORY|all>"))?
                    .parse()?,
            ),
            "disable" => Command::Disable(
                args.first()
                    .ok_or(CommandError::Usage("disable <CATEGORY|all>"))?
                    .parse()?,
            ),
            "toggle" => Command::Toggle,
            "file" => Command::File(parse_switch(args.first().copied(), "file <on|off>")?),
            "console" => Command::Console(parse_switch(args.first().copied(), "console <on|off>")?),
            "clear" | "cls" => Command::Clear,
            "list" => Command::List,
            "stats" => Command::Stats,
            "netplay" => Command::Netplay(parse_settings_action(
                args,
                "netplay [show|set <key> <value>|ban <n>|unban <n>]",
                true,
            )?),
            "playback" => Command::Playback(parse_settings_action(
                args,
                "playback [show|set <key> <value>]",
                false,
            )?),
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_is_not_a_command() {
        assert!(Command::parse("   ").unwrap().is_none());
    }

    #[test]
    fn test_level_accepts_names_and_numbers() {
        assert_eq!(
            Command::parse("level 4").unwrap(),
            Some(Command::Level(Severity::Debug))
        );
        assert_eq!(
            Command::parse("LEVEL warning").unwrap(),
            Some(Command::Level(Severity::Warning))
        );
        assert!(matches!(
            Command::parse("level 9"),
            Err(CommandError::Severity(_))
        ));
        assert!(matches!(Command::parse("level"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_enable_targets() {
        assert_eq!(
            Command::parse("enable netplay").unwrap(),
            Some(Command::Enable(Target::One(LogCategory::Netplay)))
        );
        assert_eq!(
            Command::parse("disable all").unwrap(),
            Some(Command::Disable(Target::All))
        );
        assert!(matches!(
            Command::parse("enable GRAPHICS"),
            Err(CommandError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_switches() {
        assert_eq!(Command::parse("file off").unwrap(), Some(Command::File(false)));
        assert_eq!(
            Command::parse("console ON").unwrap(),
            Some(Command::Console(true))
        );
        assert!(Command::parse("file maybe").is_err());
    }

    #[test]
    fn test_settings_actions() {
        assert_eq!(
            Command::parse("netplay").unwrap(),
            Some(Command::Netplay(SettingsAction::Show))
        );
        assert_eq!(
            Command::parse("netplay set replay_dir /home/me/My Replays").unwrap(),
            Some(Command::Netplay(SettingsAction::Set {
                key: "replay_dir".to_string(),
                value: "/home/me/My Replays".to_string(),
            }))
        );
        assert_eq!(
            Command::parse("netplay ban 3").unwrap(),
            Some(Command::Netplay(SettingsAction::Ban(3)))
        );
        assert!(Command::parse("netplay ban fox").is_err());
        assert!(Command::parse("playback ban 1").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            Command::parse("reboot now"),
            Err(CommandError::Unknown(name)) if name == "reboot"
        ));
    }
}
