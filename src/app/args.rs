use clap::builder::RangedU64ValueParser;
use clap::Parser;

/// Largest `--capacity` accepted. The queue allocates every slot up front.
pub const MAX_CAPACITY: u64 = 100_000;

#[derive(Parser, Debug, Clone)]
#[command(name = "emu-logview")]
#[command(about = "Routes emulator log output to a live viewer, a log file and the console")]
pub struct AppArgs {
    #[arg(long, help = "Settings file path (defaults to <data-dir>/logview.toml)")]
    pub config: Option<String>,

    #[arg(long, default_value = "data", help = "Data directory")]
    pub data_dir: String,

    #[arg(long, help = "Log file path (defaults to <data-dir>/emu.log)")]
    pub log_file: Option<String>,

    #[arg(
        long,
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Milliseconds between viewer refreshes"
    )]
    pub interval_ms: u64,

    #[arg(
        long,
        default_value_t = 100,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_CAPACITY),
        help = "Messages the viewer keeps between refreshes"
    )]
    pub capacity: usize,

    #[arg(long, help = "Print the viewer to stdout and read commands from stdin")]
    pub headless: bool,

    #[arg(long, help = "Spawn simulated producers that log across all categories")]
    pub demo: bool,
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = AppArgs::parse_from(["emu-logview"]);
        assert_eq!(args.interval_ms, 100);
        assert_eq!(args.capacity, 100);
        assert_eq!(args.data_dir, "data");
        assert!(!args.headless);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(AppArgs::try_parse_from(["emu-logview", "--interval-ms", "0"]).is_err());
    }

    #[test]
    fn test_capacity_is_bounded() {
        let args = AppArgs::try_parse_from(["emu-logview", "--capacity", "100000"]).unwrap();
        assert_eq!(args.capacity, 100_000);
        assert!(AppArgs::try_parse_from(["emu-logview", "--capacity", "100001"]).is_err());
        assert!(AppArgs::try_parse_from(["emu-logview", "--capacity", "0"]).is_err());
        assert!(
            AppArgs::try_parse_from(["emu-logview", "--capacity", "18446744073709551615"])
                .is_err()
        );
    }
}
