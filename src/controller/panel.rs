//! The fact panel shown after a city guess.

use crate::dataset::CityName;
use crate::game::{CityGuess, Outcome};

/// Full-screen result of a city guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactPanel {
    /// Whether the guess was right.
    pub outcome: Outcome,
    /// The guessed city.
    pub city: CityName,
    /// Fact about the guessed city; empty when the dataset has none.
    pub fact: String,
}

impl FactPanel {
    /// Panel for a scored city guess.
    #[must_use]
    pub fn from_guess(guess: &CityGuess) -> Self {
        Self {
            outcome: guess.outcome,
            city: guess.city.clone(),
            fact: guess.fact.clone().unwrap_or_default(),
        }
    }

    /// Status heading.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self.outcome {
            Outcome::Correct => "CORRECT",
            Outcome::Wrong => "INCORRECT",
        }
    }

    /// Label of the acknowledge button.
    #[must_use]
    pub const fn action_label(&self) -> &'static str {
        match self.outcome {
            Outcome::Correct => "Next Mission",
            Outcome::Wrong => "Keep Searching",
        }
    }
}
