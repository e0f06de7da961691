use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rain_engine::ClientSettings;

/// Terminal console for browsing, uploading and searching Rain log bundles
#[derive(Parser, Debug)]
#[command(name = "rain", version, about)]
pub struct Cli {
    /// Base URL of the Rain backend
    #[arg(long, env = "RAIN_API_BASE_URL", default_value = "http://localhost:8080")]
    pub api_base_url: String,

    /// Seconds allowed for establishing a connection
    #[arg(long, env = "RAIN_CONNECT_TIMEOUT_SECS", default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Seconds allowed for a whole request, upload included
    #[arg(long, env = "RAIN_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Directory holding the recent-bundle list and the log file
    #[arg(long, env = "RAIN_STATE_DIR", default_value = ".rain")]
    pub state_dir: PathBuf,

    /// Where log output goes
    #[arg(long, env = "RAIN_LOG", value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log level (error, warn, info, debug, trace, off)
    #[arg(long, env = "RAIN_LOG_LEVEL", default_value = "info", value_parser = parse_log_level)]
    pub log_level: LevelFilter,

    /// Run these console commands in order and exit instead of reading stdin
    #[arg(short = 'e', long = "exec", value_name = "COMMAND")]
    pub exec: Vec<String>,
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    /// Write to rain.log in the state directory.
    File,
    /// Write to the terminal (stderr).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

impl Cli {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// How long the console waits for outstanding replies before prompting again.
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs + self.request_timeout_secs)
    }
}

fn parse_log_level(raw: &str) -> Result<LevelFilter, String> {
    rain_logging::parse_level(raw).ok_or_else(|| format!("unknown log level `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_backend() {
        let cli = Cli::try_parse_from(["rain"]).unwrap();
        let settings = cli.client_settings();
        if std::env::var_os("RAIN_API_BASE_URL").is_none() {
            assert_eq!(settings.base_url, "http://localhost:8080");
        }
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(cli.log, LogDestination::File);
        assert_eq!(cli.log_level, LevelFilter::Info);
        assert_eq!(cli.settle_timeout(), Duration::from_secs(40));
    }

    #[test]
    fn exec_commands_keep_order() {
        let cli = Cli::try_parse_from([
            "rain",
            "--api-base-url",
            "http://rain:9000",
            "-e",
            "issue CN013",
            "-e",
            "pick 1",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.api_base_url, "http://rain:9000");
        assert_eq!(cli.exec, vec!["issue CN013", "pick 1"]);
        assert_eq!(cli.log_level, LevelFilter::Debug);
    }

    #[test]
    fn bad_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["rain", "--log-level", "loud"]).is_err());
    }
}
