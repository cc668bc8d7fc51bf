//! Round phases and city modes.

use std::fmt;

use serde::Serialize;

/// Where the player is within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Phase {
    /// Looking for the target region on the map.
    #[default]
    MapSelection,
    /// Region found; looking for the target city inside it.
    CitySelection,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::MapSelection => write!(f, "map selection"),
            Phase::CitySelection => write!(f, "city selection"),
        }
    }
}

/// How the target city is chosen once the region is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CityMode {
    /// The target is always the region's capital.
    #[default]
    Capital,
    /// The target is a random city, described by a fact.
    Fact,
}

impl CityMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            CityMode::Capital => CityMode::Fact,
            CityMode::Fact => CityMode::Capital,
        }
    }

    /// Short label for the mode switch.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            CityMode::Capital => "Capital",
            CityMode::Fact => "Fact",
        }
    }
}
