// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Geoquest: a map quiz game. Find the state, then find the city.
//!
//! This crate provides the game core with no rendering attached:
//! - A round/phase state machine with scoring and targets drawn without replacement
//! - An Albers equal-area projection and point-in-polygon hit testing
//! - An animated pan/zoom camera that fits regions into the viewport
//! - An input controller that turns clicks into guesses and timed feedback
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   InteractionController (+Timers)   │
//! ├──────────────────┬──────────────────┤
//! │   GameSession    │ ViewportTransform│
//! │ (RoundSelector)  │   GeoProjector   │
//! ├──────────────────┴──────────────────┤
//! │        Dataset (read-only)          │
//! └─────────────────────────────────────┘
//! ```
//!
//! Time never comes from a clock inside the crate: every time-dependent call
//! takes `now` as a [`Duration`](std::time::Duration) since the controller
//! started, so a whole game replays exactly from a seed and a list of events.

pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod game;
pub mod geo;
pub mod rng;
pub mod sim;
pub mod viewport;

pub use config::{GameConfig, Timings};
pub use controller::{InteractionController, ViewModel};
pub use dataset::{CityName, Dataset, GeoCoord, Region, RegionId, Territory};
pub use error::{ConfigError, DatasetError, DatasetResult};

// Re-export key game types at crate root for convenience
pub use game::{Action, CityMode, GameEvent, GameSession, Outcome, Phase};
pub use geo::{GeoProjector, HitTester, ScreenPoint};
pub use rng::Rng;
pub use viewport::{Transform, ViewportTransform};
