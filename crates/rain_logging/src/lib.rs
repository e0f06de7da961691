#![deny(missing_docs)]
//! Logging front door for the Rain crates.
//!
//! Core, engine and console code log through the `rain_*` macros, which land in
//! whatever sink the `rain` binary installed from its `--log` option.
//! [`parse_level`] backs `--log-level`.

use log::LevelFilter;

/// `log::trace!` under the Rain name.
#[macro_export]
macro_rules! rain_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// `log::debug!` under the Rain name; request URLs are logged at this level.
#[macro_export]
macro_rules! rain_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// `log::info!` under the Rain name.
#[macro_export]
macro_rules! rain_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// `log::warn!` under the Rain name.
#[macro_export]
macro_rules! rain_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// `log::error!` under the Rain name.
#[macro_export]
macro_rules! rain_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Parses a `--log-level` value such as `info` or `DEBUG`; surrounding whitespace is ignored.
///
/// Unknown names yield `None`; the console turns that into a usage error.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse::<LevelFilter>().ok()
}

/// Installs a terminal logger so `update` traces show up in `rain_core` test output.
///
/// Does nothing when a logger is already installed.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
