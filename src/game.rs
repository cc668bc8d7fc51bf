//! Game rules for geoquest.
//!
//! Implements the quiz on top of the dataset:
//! - Target regions drawn without replacement
//! - Two phases per round (find the region, then the city)
//! - Scoring of every guess that is not ignored
//! - Capital and fact modes for the city target

mod event;
mod phase;
mod selector;
mod session;

pub use event::{Action, CityGuess, GameComplete, GameEvent, Outcome, RegionGuess, RoundStart};
pub use phase::{CityMode, Phase};
pub use selector::RoundSelector;
pub use session::{GameSession, Prompt};
