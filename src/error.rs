//! Error types for dataset and config loading.
//!
//! Gameplay itself has no error paths: wrong-phase actions are ignored and
//! unknown regions score as wrong answers. The only fallible step is getting
//! a usable dataset and config in front of the game.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a configuration file cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected shape.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but cannot be used.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Reasons a dataset cannot be used to start a game.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not valid JSON for the expected shape.
    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// There are no playable regions.
    #[error("dataset has no regions")]
    Empty,

    /// Two regions or territories share an id.
    #[error("duplicate region id {0:?}")]
    DuplicateId(String),

    /// A region has no cities to ask about.
    #[error("region {0:?} has no cities")]
    NoCities(String),

    /// A region's capital is missing from its city list.
    #[error("region {region:?} names capital {capital:?} but has no such city")]
    MissingCapital {
        /// Region id.
        region: String,
        /// Capital name as written in the dataset.
        capital: String,
    },

    /// A boundary ring has too few vertices to enclose anything.
    #[error("boundary of {id:?} has {vertices} vertices, need at least 3")]
    DegenerateBoundary {
        /// Region or territory id.
        id: String,
        /// Number of vertices found.
        vertices: usize,
    },

    /// Part of a region or territory cannot be placed on the map.
    #[error("{what} of {id:?} lies outside the map projection")]
    OutsideProjection {
        /// Region or territory id.
        id: String,
        /// `"boundary"` or the city name.
        what: String,
    },

    /// A coordinate is not a valid longitude/latitude pair.
    #[error("coordinate ({lon}, {lat}) in {id:?} is out of range")]
    CoordinateOutOfRange {
        /// Region or territory id.
        id: String,
        /// Longitude in degrees.
        lon: f64,
        /// Latitude in degrees.
        lat: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DatasetError::MissingCapital {
            region: "CO".to_string(),
            capital: "Denver".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "region \"CO\" names capital \"Denver\" but has no such city"
        );

        let err = DatasetError::DegenerateBoundary {
            id: "KS".to_string(),
            vertices: 2,
        };
        assert!(err.to_string().contains("2 vertices"));
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DatasetError = parse.into();
        assert!(matches!(err, DatasetError::Parse(_)));
    }
}
