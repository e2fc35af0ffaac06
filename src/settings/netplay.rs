//! Online play and replay playback options.
//!
//! These are plain bindings over the settings store; the only logic is the
//! range clamping and input validation the options have always had.
use super::{SettingsError, SettingsStore};
use serde::Serialize;
use strum::{Display, EnumString};

const NETPLAY_SECTION: &str = "Netplay";
const PLAYBACK_SECTION: &str = "Playback";

pub const MIN_DELAY_FRAMES: i64 = 1;
pub const MAX_DELAY_FRAMES: i64 = 9;
pub const DEFAULT_NETPLAY_PORT: u16 = 2626;
pub const MAX_LAN_IP_LEN: usize = 20;

/// Selectable characters, indexed by their bit in the ban list.
pub const CHARACTERS: [&str; 26] = [
    "Captain Falcon",
    "Donkey Kong",
    "Fox",
    "Game & Watch",
    "Kirby",
    "Bowser",
    "Link",
    "Luigi",
    "Mario",
    "Marth",
    "Mewtwo",
    "Ness",
    "Peach",
    "Pikachu",
    "Ice Climbers",
    "Jigglypuff",
    "Samus",
    "Yoshi",
    "Zelda",
    "Sheik",
    "Falco",
    "Young Link",
    "Dr. Mario",
    "Roy",
    "Pichu",
    "Ganondorf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QuickChat {
    #[default]
    Enabled,
    DirectOnly,
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetplaySettings {
    pub save_replays: bool,
    replay_month_folders: bool,
    pub replay_dir: String,
    online_delay: i64,
    pub quick_chat: QuickChat,
    pub anonymize_opponents: bool,
    banlist: u32,
    pub force_netplay_port: bool,
    netplay_port: u16,
    pub force_lan_ip: bool,
    lan_ip: String,
    pub reduce_timing_dispersion: bool,
    pub jukebox_enabled: bool,
    jukebox_volume: i64,
}

impl Default for NetplaySettings {
    fn default() -> Self {
        Self {
            save_replays: true,
            replay_month_folders: false,
            replay_dir: "Slippi".to_string(),
            online_delay: 2,
            quick_chat: QuickChat::Enabled,
            anonymize_opponents: false,
            banlist: 0,
            force_netplay_port: false,
            netplay_port: DEFAULT_NETPLAY_PORT,
            force_lan_ip: false,
            lan_ip: String::new(),
            reduce_timing_dispersion: false,
            jukebox_enabled: true,
            jukebox_volume: 100,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(SettingsError::invalid(key, "expected on/off")),
    }
}

fn parse_int(key: &str, value: &str) -> Result<i64, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::invalid(key, "expected a number"))
}

impl NetplaySettings {
    pub fn load(store: &SettingsStore) -> Self {
        let d = Self::default();
        let mut settings = Self {
            save_replays: store.get_bool(NETPLAY_SECTION, "SaveReplays", d.save_replays),
            replay_month_folders: false,
            replay_dir: store.get_str(NETPLAY_SECTION, "ReplayDir", &d.replay_dir),
            online_delay: d.online_delay,
            quick_chat: store
                .get_str(NETPLAY_SECTION, "QuickChat", "")
                .parse()
                .unwrap_or_default(),
            anonymize_opponents: store.get_bool(
                NETPLAY_SECTION,
                "AnonymizeOpponents",
                d.anonymize_opponents,
            ),
            banlist: 0,
            force_netplay_port: store.get_bool(
                NETPLAY_SECTION,
                "ForceNetplayPort",
                d.force_netplay_port,
            ),
            netplay_port: d.netplay_port,
            force_lan_ip: store.get_bool(NETPLAY_SECTION, "ForceLanIp", d.force_lan_ip),
            lan_ip: String::new(),
            reduce_timing_dispersion: store.get_bool(
                NETPLAY_SECTION,
                "ReduceTimingDispersion",
                d.reduce_timing_dispersion,
            ),
            jukebox_enabled: store.get_bool(NETPLAY_SECTION, "JukeboxEnabled", d.jukebox_enabled),
            jukebox_volume: d.jukebox_volume,
        };
        settings.set_replay_month_folders(store.get_bool(
            NETPLAY_SECTION,
            "ReplayMonthFolders",
            d.replay_month_folders,
        ));
        settings.set_online_delay(store.get_int(NETPLAY_SECTION, "OnlineDelay", d.online_delay));
        settings.set_netplay_port(store.get_int(
            NETPLAY_SECTION,
            "NetplayPort",
            i64::from(d.netplay_port),
        ));
        settings.set_jukebox_volume(store.get_int(
            NETPLAY_SECTION,
            "JukeboxVolume",
            d.jukebox_volume,
        ));
        let banlist = store.get_int(NETPLAY_SECTION, "Banlist", 0);
        settings.banlist = u32::try_from(banlist).unwrap_or(0) & ((1u32 << CHARACTERS.len()) - 1);
        // A stored address that no longer validates is dropped.
        let _ = settings.set_lan_ip(&store.get_str(NETPLAY_SECTION, "LanIp", ""));
        settings
    }

    pub fn save(&self, store: &mut SettingsStore) {
        store.set(NETPLAY_SECTION, "SaveReplays", self.save_replays);
        store.set(NETPLAY_SECTION, "ReplayMonthFolders", self.replay_month_folders);
        store.set(NETPLAY_SECTION, "ReplayDir", self.replay_dir.as_str());
        store.set(NETPLAY_SECTION, "OnlineDelay", self.online_delay);
        store.set(NETPLAY_SECTION, "QuickChat", self.quick_chat.to_string());
        store.set(NETPLAY_SECTION, "AnonymizeOpponents", self.anonymize_opponents);
        store.set(NETPLAY_SECTION, "Banlist", i64::from(self.banlist));
        store.set(NETPLAY_SECTION, "ForceNetplayPort", self.force_netplay_port);
        store.set(NETPLAY_SECTION, "NetplayPort", i64::from(self.netplay_port));
        store.set(NETPLAY_SECTION, "ForceLanIp", self.force_lan_ip);
        store.set(NETPLAY_SECTION, "LanIp", self.lan_ip.as_str());
        store.set(
            NETPLAY_SECTION,
            "ReduceTimingDispersion",
            self.reduce_timing_dispersion,
        );
        store.set(NETPLAY_SECTION, "JukeboxEnabled", self.jukebox_enabled);
        store.set(NETPLAY_SECTION, "JukeboxVolume", self.jukebox_volume);
    }

    /// Turning replay saving off also turns monthly subfolders off.
    pub fn set_save_replays(&mut self, enabled: bool) {
        self.save_replays = enabled;
        if !enabled {
            self.replay_month_folders = false;
        }
    }

    pub fn replay_month_folders(&self) -> bool {
        self.replay_month_folders
    }

    /// Only takes effect while replay saving is on.
    pub fn set_replay_month_folders(&mut self, enabled: bool) {
        self.replay_month_folders = self.save_replays && enabled;
    }

    pub fn online_delay(&self) -> i64 {
        self.online_delay
    }

    pub fn set_online_delay(&mut self, frames: i64) {
        self.online_delay = frames.clamp(MIN_DELAY_FRAMES, MAX_DELAY_FRAMES);
    }

    pub fn netplay_port(&self) -> u16 {
        self.netplay_port
    }

    pub fn set_netplay_port(&mut self, port: i64) {
        self.netplay_port = port.clamp(1, i64::from(u16::MAX)) as u16;
    }

    pub fn lan_ip(&self) -> &str {
        &self.lan_ip
    }

    /// Accepts up to 20 characters of digits and dots.
    pub fn set_lan_ip(&mut self, ip: &str) -> Result<(), SettingsError> {
        if ip.len() > MAX_LAN_IP_LEN {
            return Err(SettingsError::invalid(
                "lan_ip",
                format!("at most {} characters", MAX_LAN_IP_LEN),
            ));
        }
        if !ip.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(SettingsError::invalid("lan_ip", "only digits and '.' allowed"));
        }
        self.lan_ip = ip.to_string();
        Ok(())
    }

    pub fn jukebox_volume(&self) -> i64 {
        self.jukebox_volume
    }

    pub fn set_jukebox_volume(&mut self, volume: i64) {
        self.jukebox_volume = volume.clamp(0, 100);
    }

    pub fn banlist(&self) -> u32 {
        self.banlist
    }

    fn character_bit(index: usize) -> Result<u32, SettingsError> {
        if index >= CHARACTERS.len() {
            return Err(SettingsError::invalid(
                "banlist",
                format!("character index must be below {}", CHARACTERS.len()),
            ));
        }
        Ok(1 << index)
    }

    pub fn ban(&mut self, index: usize) -> Result<(), SettingsError> {
        self.banlist |= Self::character_bit(index)?;
        Ok(())
    }

    pub fn unban(&mut self, index: usize) -> Result<(), SettingsError> {
        self.banlist &= !Self::character_bit(index)?;
        Ok(())
    }

    pub fn is_banned(&self, index: usize) -> bool {
        Self::character_bit(index).is_ok_and(|bit| self.banlist & bit != 0)
    }

    pub fn banned_characters(&self) -> Vec<&'static str> {
        CHARACTERS
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_banned(*i))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Sets an option by its snake_case name from textual input.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        match key {
            "save_replays" => self.set_save_replays(parse_bool(key, value)?),
            "replay_month_folders" => self.set_replay_month_folders(parse_bool(key, value)?),
            "replay_dir" => self.replay_dir = value.to_string(),
            "online_delay" => self.set_online_delay(parse_int(key, value)?),
            "quick_chat" => {
                self.quick_chat = value.parse().map_err(|_| {
                    SettingsError::invalid(key, "expected enabled, direct_only or off")
                })?
            }
            "anonymize_opponents" => self.anonymize_opponents = parse_bool(key, value)?,
            "force_netplay_port" => self.force_netplay_port = parse_bool(key, value)?,
            "netplay_port" => self.set_netplay_port(parse_int(key, value)?),
            "force_lan_ip" => self.force_lan_ip = parse_bool(key, value)?,
            "lan_ip" => self.set_lan_ip(value)?,
            "reduce_timing_dispersion" => self.reduce_timing_dispersion = parse_bool(key, value)?,
            "jukebox_enabled" => self.jukebox_enabled = parse_bool(key, value)?,
            "jukebox_volume" => self.set_jukebox_volume(parse_int(key, value)?),
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackSettings {
    pub display_frame_index: bool,
}

impl PlaybackSettings {
    pub fn load(store: &SettingsStore) -> Self {
        Self {
            display_frame_index: store.get_bool(PLAYBACK_SECTION, "DisplayFrameIndex", false),
        }
    }

    pub fn save(&self, store: &mut SettingsStore) {
        store.set(PLAYBACK_SECTION, "DisplayFrameIndex", self.display_frame_index);
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        match key {
            "display_frame_index" => self.display_frame_index = parse_bool(key, value)?,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
