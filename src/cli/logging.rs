//! Log subscriber setup.

use super::CliError;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "geoquest=info";

/// Where log lines go.
#[derive(Debug, Clone)]
pub(crate) enum LogTarget {
    /// Standard error.
    Stderr,
    /// A file, truncated on start.
    File(PathBuf),
    /// Nowhere; the TUI owns the terminal.
    Off,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a subscriber is
/// already installed.
pub(crate) fn init(target: LogTarget) -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            let file = File::create(&path).map_err(|e| {
                CliError::new(format!("Failed to create log file {}: {e}", path.display()))
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    result.map_err(|e| CliError::new(format!("Failed to install logger: {e}")))
}
