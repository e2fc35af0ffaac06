//! The fixed set of emulator subsystems that produce log output.
use std::fmt;
use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A named subsystem whose messages can be enabled and thresholded independently.
///
/// The string form (`NETPLAY`, `DSPHLE`, ...) is the short name used as a
/// settings key and on formatted log lines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum LogCategory {
    #[strum(serialize = "MASTER")]
    Master,
    #[strum(serialize = "ACTIONREPLAY")]
    ActionReplay,
    #[strum(serialize = "AUDIO")]
    Audio,
    #[strum(serialize = "BOOT")]
    Boot,
    #[strum(serialize = "COMMON")]
    Common,
    #[strum(serialize = "CONSOLE")]
    Console,
    #[strum(serialize = "DSPHLE")]
    DspHle,
    #[strum(serialize = "DSPLLE")]
    DspLle,
    #[strum(serialize = "DVDINTERFACE")]
    DvdInterface,
    #[strum(serialize = "EXI")]
    ExpansionInterface,
    #[strum(serialize = "GPFIFO")]
    GpFifo,
    #[strum(serialize = "MEMCARD")]
    MemcardManager,
    #[strum(serialize = "NETPLAY")]
    Netplay,
    #[strum(serialize = "OSREPORT")]
    OsReport,
    #[strum(serialize = "PAD")]
    Pad,
    #[strum(serialize = "PE")]
    PixelEngine,
    #[strum(serialize = "POWERPC")]
    PowerPc,
    #[strum(serialize = "SI")]
    SerialInterface,
    #[strum(serialize = "SLIPPI")]
    Slippi,
    #[strum(serialize = "VIDEO")]
    Video,
    #[strum(serialize = "WII_IPC")]
    WiiIpc,
}

impl LogCategory {
    /// Position of this category in [`LogCategory::all`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = LogCategory> {
        Self::iter()
    }

    pub fn count() -> usize {
        Self::COUNT
    }

    pub fn short_name(self) -> &'static str {
        self.into()
    }

    /// Human-readable name shown in the category list.
    pub fn full_name(self) -> &'static str {
        match self {
            LogCategory::Master => "Master Log",
            LogCategory::ActionReplay => "ActionReplay",
            LogCategory::Audio => "Audio Emulator",
            LogCategory::Boot => "Boot",
            LogCategory::Common => "Common",
            LogCategory::Console => "Dolphin Console",
            LogCategory::DspHle => "DSP HLE",
            LogCategory::DspLle => "DSP LLE",
            LogCategory::DvdInterface => "DVD Interface",
            LogCategory::ExpansionInterface => "Expansion Interface",
            LogCategory::GpFifo => "GPFifo",
            LogCategory::MemcardManager => "Memory Card Manager",
            LogCategory::Netplay => "Netplay",
            LogCategory::OsReport => "OSReport",
            LogCategory::Pad => "Pad",
            LogCategory::PixelEngine => "Pixel Engine",
            LogCategory::PowerPc => "IBM CPU",
            LogCategory::SerialInterface => "Serial Interface",
            LogCategory::Slippi => "Slippi",
            LogCategory::Video => "Video Backend",
            LogCategory::WiiIpc => "WII IPC",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_match_iteration_order() {
        for (i, category) in LogCategory::all().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert_eq!(LogCategory::all().count(), LogCategory::count());
    }

    #[test]
    fn test_short_name_round_trips_case_insensitively() {
        assert_eq!("netplay".parse::<LogCategory>(), Ok(LogCategory::Netplay));
        assert_eq!(LogCategory::ExpansionInterface.short_name(), "EXI");
        assert!("NOT_A_CATEGORY".parse::<LogCategory>().is_err());
    }

    #[test]
    fn test_short_names_are_unique() {
        let mut names: Vec<_> = LogCategory::all().map(LogCategory::short_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LogCategory::count());
    }
}
