//! Tunable game constants.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::viewport::{FitOptions, ScaleExtent};

/// Delays and durations of the deferred UI effects, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Camera fit / reset animation length.
    pub camera_ms: u64,
    /// How long wrong-guess feedback stays visible.
    pub feedback_visible_ms: u64,
    /// Fade-out after the visible period before the text is cleared.
    pub feedback_fade_ms: u64,
    /// Correct/wrong flash on a clicked region.
    pub flash_ms: u64,
    /// Delay before new city markers start growing.
    pub marker_delay_ms: u64,
    /// Time for markers to grow to full size.
    pub marker_grow_ms: u64,
    /// Time after a correct region guess before markers accept clicks.
    pub marker_interactive_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            camera_ms: 1000,
            feedback_visible_ms: 3000,
            feedback_fade_ms: 300,
            flash_ms: 500,
            marker_delay_ms: 400,
            marker_grow_ms: 500,
            marker_interactive_ms: 800,
        }
    }
}

impl Timings {
    /// Camera animation length.
    #[must_use]
    pub const fn camera(&self) -> Duration {
        Duration::from_millis(self.camera_ms)
    }

    /// Feedback visible period.
    #[must_use]
    pub const fn feedback_visible(&self) -> Duration {
        Duration::from_millis(self.feedback_visible_ms)
    }

    /// Feedback fade period.
    #[must_use]
    pub const fn feedback_fade(&self) -> Duration {
        Duration::from_millis(self.feedback_fade_ms)
    }

    /// Region flash length.
    #[must_use]
    pub const fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    /// Marker reveal delay.
    #[must_use]
    pub const fn marker_delay(&self) -> Duration {
        Duration::from_millis(self.marker_delay_ms)
    }

    /// Marker grow length.
    #[must_use]
    pub const fn marker_grow(&self) -> Duration {
        Duration::from_millis(self.marker_grow_ms)
    }

    /// Delay before markers are clickable.
    #[must_use]
    pub const fn marker_interactive(&self) -> Duration {
        Duration::from_millis(self.marker_interactive_ms)
    }
}

/// Configuration for a game session and its controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Points gained for a correct guess and lost for a wrong one.
    pub points: i32,
    /// Marker radius in screen pixels at any zoom level.
    pub marker_radius: f64,
    /// Extra screen pixels around a marker that still count as a hit.
    pub pick_tolerance: f64,
    /// Camera fit when a region is found.
    pub fit: FitOptions,
    /// Scale range for user zoom.
    pub zoom_extent: ScaleExtent,
    /// UI effect timings.
    pub timings: Timings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            points: 10,
            marker_radius: 6.0,
            pick_tolerance: 2.0,
            fit: FitOptions::default(),
            zoom_extent: ScaleExtent::USER,
            timings: Timings::default(),
        }
    }
}

impl GameConfig {
    /// Load a config file; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can drive a game.
    ///
    /// Scale ranges must be finite, positive, and ordered; the fit fill and
    /// marker sizes must be finite and non-negative (fill strictly positive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_extent("zoom_extent", self.zoom_extent)?;
        check_extent("fit.extent", self.fit.extent)?;
        if !self.fit.fill.is_finite() || self.fit.fill <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fit.fill must be positive, got {}",
                self.fit.fill
            )));
        }
        for (name, value) in [
            ("marker_radius", self.marker_radius),
            ("pick_tolerance", self.pick_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn check_extent(name: &str, extent: ScaleExtent) -> Result<(), ConfigError> {
    let ScaleExtent { min, max } = extent;
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
        return Err(ConfigError::Invalid(format!(
            "{name} must satisfy 0 < min <= max, got [{min}, {max}]"
        )));
    }
    Ok(())
}
