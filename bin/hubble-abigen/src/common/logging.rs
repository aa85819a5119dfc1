//! Logging configuration for the hubble-abigen CLI tool.
//!
//! Provides CLI arguments for configuring tracing/logging output with support for:
//! - Verbosity levels via `-v/-vv/-vvv` flags
//! - Custom log filters via `RUST_LOG` environment variable
//! - Log file output via `--log.file` flag
//! - Colorful console output unless `--log.no-color` is given

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Args;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use super::{CliError, Result};

/// Logging configuration arguments.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Increase logging verbosity (-v = error, -vv = warn, -vvv = info, -vvvv = debug, -vvvvv =
    /// trace)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log file path. If specified, logs are written to this file instead of stderr.
    #[arg(long = "log.file", visible_aliases = ["log-file"], global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable colorful console logging. Only applies when logging to stderr (no --log.file).
    #[arg(long = "log.no-color", visible_aliases = ["log-no-color"], global = true)]
    pub log_no_color: bool,
}

impl LogArgs {
    /// Builds the filter from `RUST_LOG` or, when unset, from the `-v` count.
    ///
    /// Without `RUST_LOG` and without `-v` nothing is logged.
    pub fn filter(&self) -> EnvFilter {
        if std::env::var("RUST_LOG").is_ok() {
            return EnvFilter::from_default_env();
        }
        match self.level() {
            Some(level) => EnvFilter::new(format!("hubble_abigen={level},hubble_bindgen={level}")),
            None => EnvFilter::new("off"),
        }
    }

    /// Level selected by the `-v` count, `None` when logging is off.
    pub const fn level(&self) -> Option<Level> {
        match self.verbose {
            0 => None,
            1 => Some(Level::ERROR),
            2 => Some(Level::WARN),
            3 => Some(Level::INFO),
            4 => Some(Level::DEBUG),
            _ => Some(Level::TRACE),
        }
    }

    /// Initialize the tracing subscriber based on the logging configuration.
    ///
    /// Log target is only shown for DEBUG level and above.
    pub fn init(&self) -> Result<()> {
        let filter = self.filter();
        let show_target = self.verbose >= 4;

        if let Some(ref log_file) = self.log_file {
            let file = File::create(log_file)
                .map_err(|source| CliError::LogFile { path: log_file.clone(), source })?;
            fmt()
                .with_env_filter(filter)
                .with_target(show_target)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        } else {
            fmt()
                .with_env_filter(filter)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .with_ansi(!self.log_no_color)
                .init();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        let level = |verbose| LogArgs { verbose, ..Default::default() }.level();
        assert_eq!(level(0), None);
        assert_eq!(level(1), Some(Level::ERROR));
        assert_eq!(level(3), Some(Level::INFO));
        assert_eq!(level(9), Some(Level::TRACE));
    }
}
