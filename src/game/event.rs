//! Player actions and the events they produce.

use serde::Serialize;

use crate::dataset::{CityName, RegionId};
use crate::game::CityMode;

/// Whether a guess hit the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    /// The guess matched the target.
    Correct,
    /// The guess did not match.
    Wrong,
}

impl Outcome {
    /// Check if this is `Correct`.
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

/// A finished pass over every region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameComplete {
    /// Score just before it was reset.
    pub final_score: i32,
    /// Number of rounds in the finished game.
    pub rounds: usize,
}

/// A newly started round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundStart {
    /// The region to find.
    pub target: RegionId,
    /// Set when this round began a new game.
    pub completed: Option<GameComplete>,
}

/// Result of a region guess that was not ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RegionGuess {
    /// The clicked region is the target; the round moves on to the city.
    Correct {
        /// The region that was found.
        region: RegionId,
        /// The city to find next.
        city: CityName,
    },
    /// The clicked region is not the target.
    Wrong {
        /// What was clicked.
        guessed: RegionId,
        /// Display name of what was clicked.
        guessed_name: String,
        /// The region still being looked for.
        target: RegionId,
    },
}

impl RegionGuess {
    /// Whether the guess was right.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        match self {
            RegionGuess::Correct { .. } => Outcome::Correct,
            RegionGuess::Wrong { .. } => Outcome::Wrong,
        }
    }
}

/// Result of a city guess that was not ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityGuess {
    /// Whether the city was the target.
    pub outcome: Outcome,
    /// The city that was clicked.
    pub city: CityName,
    /// Region the city belongs to.
    pub region: RegionId,
    /// Fact about the clicked city, if known.
    pub fact: Option<String>,
}

/// Something a player can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Begin the next round.
    StartRound,
    /// Click on a region.
    GuessRegion(RegionId),
    /// Click on a city marker.
    GuessCity(CityName),
    /// Flip between capital and fact mode.
    ToggleMode,
}

/// What an applied action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// A round started.
    RoundStarted(RoundStart),
    /// A region guess was scored.
    Region(RegionGuess),
    /// A city guess was scored.
    City(CityGuess),
    /// The city mode changed.
    ModeChanged(CityMode),
}
