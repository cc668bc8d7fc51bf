//! CLI command implementations for geoquest.

pub(crate) mod logging;
pub(crate) mod play;
pub(crate) mod simulate;
pub(crate) mod validate;

mod output;

use clap::{Args, ValueEnum};
use geoquest::{CityMode, ConfigError, Dataset, DatasetError, GameConfig, GeoProjector};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Options shared by every command that starts a game.
#[derive(Args, Debug, Clone)]
pub(crate) struct GameArgs {
    /// Game config file (JSON); missing fields keep their defaults
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Dataset file (JSON); the built-in dataset is used otherwise
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,

    /// Random seed (default: random)
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Ask for a random city by its fact instead of the capital
    #[arg(long)]
    pub(crate) fact_mode: bool,
}

impl GameArgs {
    /// City mode selected on the command line.
    pub(crate) fn mode(&self) -> CityMode {
        if self.fact_mode {
            CityMode::Fact
        } else {
            CityMode::Capital
        }
    }

    /// Seed from the command line, or from the clock.
    pub(crate) fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(geoquest::rng::seed_from_clock)
    }

    /// Load the config and dataset named on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be loaded, or if some region
    /// or city cannot be placed on the map.
    pub(crate) fn load(&self) -> Result<(GameConfig, Arc<Dataset>), CliError> {
        let config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        let dataset = match &self.dataset {
            Some(path) => Dataset::load(path)?,
            None => Dataset::builtin()?,
        };
        GeoProjector::albers_usa().check_dataset(&dataset)?;
        info!(regions = dataset.len(), "game data ready");
        Ok((config, Arc::new(dataset)))
    }
}

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<DatasetError> for CliError {
    fn from(e: DatasetError) -> Self {
        Self::new(format!("dataset: {e}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(format!("config: {e}"))
    }
}
