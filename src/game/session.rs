//! The round/phase state machine.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::dataset::{CityName, Dataset, Region, UNKNOWN_TERRITORY};
use crate::game::{
    Action, CityGuess, CityMode, GameComplete, GameEvent, Outcome, Phase, RegionGuess,
    RoundSelector, RoundStart,
};
use crate::rng::Rng;

/// Text describing what the player should look for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Prompt {
    /// Short label above the prompt ("Find State" / "Find").
    pub label: String,
    /// The main instruction: a region name, "The capital of …", or a fact.
    pub main: String,
    /// Abbreviation of the target region.
    pub target: String,
}

/// One player's game: phase, targets, score, and visited regions.
///
/// The session is the only writer of game state. Every mutation goes through
/// one of the operations below, each of which either applies in full or is
/// ignored (returning `None`) when it does not fit the current phase.
#[derive(Debug, Clone)]
pub struct GameSession {
    dataset: Arc<Dataset>,
    points: i32,
    rng: Rng,
    selector: RoundSelector,
    phase: Phase,
    mode: CityMode,
    target_region: Option<usize>,
    target_city: Option<CityName>,
    resolved_cities: HashSet<CityName>,
    city_found: bool,
    /// A wrong region was clicked this round.
    region_missed: bool,
    score: i32,
    rounds_started: u64,
    games_completed: u32,
}

impl GameSession {
    /// Create a session. No round is running until [`start_round`](Self::start_round).
    #[must_use]
    pub fn new(dataset: Arc<Dataset>, config: &GameConfig, seed: u64) -> Self {
        let ids = dataset.regions().iter().map(|r| r.id.clone()).collect();
        Self {
            dataset,
            points: config.points,
            rng: Rng::new(seed),
            selector: RoundSelector::new(ids),
            phase: Phase::MapSelection,
            mode: CityMode::Capital,
            target_region: None,
            target_city: None,
            resolved_cities: HashSet::new(),
            city_found: false,
            region_missed: false,
            score: 0,
            rounds_started: 0,
            games_completed: 0,
        }
    }

    /// Start in the given city mode.
    #[must_use]
    pub fn with_mode(mut self, mode: CityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shared dataset.
    #[must_use]
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current city mode.
    #[must_use]
    pub const fn mode(&self) -> CityMode {
        self.mode
    }

    /// Whether the target city will be (or is) the capital.
    #[must_use]
    pub const fn is_capital_mode(&self) -> bool {
        matches!(self.mode, CityMode::Capital)
    }

    /// Current score; may be negative.
    #[must_use]
    pub const fn score(&self) -> i32 {
        self.score
    }

    /// Region to find this round.
    #[must_use]
    pub fn target_region(&self) -> Option<&Region> {
        self.target_region
            .and_then(|index| self.dataset.regions().get(index))
    }

    /// City to find; only set during city selection.
    #[must_use]
    pub fn target_city(&self) -> Option<&str> {
        self.target_city.as_deref()
    }

    /// Regions drawn so far in this game, the current target included.
    #[must_use]
    pub const fn visited_count(&self) -> usize {
        self.selector.visited_count()
    }

    /// Whether a region has been drawn in this game.
    #[must_use]
    pub fn is_visited(&self, id: &str) -> bool {
        self.selector.is_visited_id(id)
    }

    /// Whether a city was already guessed this round.
    #[must_use]
    pub fn is_resolved(&self, city: &str) -> bool {
        self.resolved_cities.contains(city)
    }

    /// Whether the target city has been found this round.
    #[must_use]
    pub const fn is_round_won(&self) -> bool {
        self.city_found
    }

    /// Rounds started since the session was created.
    #[must_use]
    pub const fn rounds_started(&self) -> u64 {
        self.rounds_started
    }

    /// Full passes over the dataset completed.
    #[must_use]
    pub const fn games_completed(&self) -> u32 {
        self.games_completed
    }

    /// Begin a round with a fresh target.
    ///
    /// When every region has been visited the game is complete: visited
    /// regions and the score are reset before drawing, and the returned
    /// [`RoundStart`] carries the finished game's result.
    pub fn start_round(&mut self) -> RoundStart {
        let mut completed = None;
        if self.selector.is_exhausted() {
            let result = GameComplete {
                final_score: self.score,
                rounds: self.selector.len(),
            };
            info!(
                final_score = result.final_score,
                rounds = result.rounds,
                "game complete"
            );
            self.selector.reset();
            self.score = 0;
            self.games_completed += 1;
            completed = Some(result);
        }

        // Validated datasets are never empty, so a pick always exists here
        let index = self.selector.pick_unvisited(&mut self.rng).unwrap_or(0);
        self.selector.mark_visited(index);

        self.target_region = Some(index);
        self.target_city = None;
        self.phase = Phase::MapSelection;
        self.resolved_cities.clear();
        self.city_found = false;
        self.region_missed = false;
        self.rounds_started += 1;

        let target = self.selector.id(index).unwrap_or_default().to_string();
        info!(round = self.rounds_started, %target, "round started");
        RoundStart { target, completed }
    }

    /// Score a click on a region.
    ///
    /// Ignored outside map selection and before the first round.
    pub fn submit_region_guess(&mut self, clicked: &str) -> Option<RegionGuess> {
        if self.phase != Phase::MapSelection {
            debug!(clicked, phase = %self.phase, "region guess ignored");
            return None;
        }
        let dataset = Arc::clone(&self.dataset);
        let target = self.target_region.and_then(|i| dataset.regions().get(i))?;

        if clicked == target.id {
            self.score += self.points;
            let city = self.choose_city(target);
            self.phase = Phase::CitySelection;
            self.target_city = Some(city.clone());
            debug!(region = %target.id, %city, score = self.score, "region found");
            Some(RegionGuess::Correct {
                region: target.id.clone(),
                city,
            })
        } else {
            self.score -= self.points;
            self.region_missed = true;
            let guessed_name = dataset
                .display_name(clicked)
                .unwrap_or(UNKNOWN_TERRITORY)
                .to_string();
            debug!(clicked, target = %target.id, score = self.score, "wrong region");
            Some(RegionGuess::Wrong {
                guessed: clicked.to_string(),
                guessed_name,
                target: target.id.clone(),
            })
        }
    }

    /// Score a click on a city.
    ///
    /// Ignored outside city selection, for a city already guessed this
    /// round, and once the target city has been found.
    pub fn submit_city_guess(&mut self, city: &str) -> Option<CityGuess> {
        if self.phase != Phase::CitySelection {
            debug!(city, phase = %self.phase, "city guess ignored");
            return None;
        }
        if self.city_found || self.resolved_cities.contains(city) {
            debug!(city, "city already resolved");
            return None;
        }
        let dataset = Arc::clone(&self.dataset);
        let region = self.target_region.and_then(|i| dataset.regions().get(i))?;

        self.resolved_cities.insert(city.to_string());
        let outcome = if self.target_city.as_deref() == Some(city) {
            self.score += self.points;
            self.city_found = true;
            Outcome::Correct
        } else {
            self.score -= self.points;
            Outcome::Wrong
        };
        debug!(city, ?outcome, score = self.score, "city guess");

        Some(CityGuess {
            outcome,
            city: city.to_string(),
            region: region.id.clone(),
            fact: region.fact(city).map(str::to_string),
        })
    }

    /// Flip between capital and fact mode.
    ///
    /// Ignored during city selection so the target cannot change mid-round.
    pub fn toggle_city_mode(&mut self) -> Option<CityMode> {
        if self.phase != Phase::MapSelection {
            debug!("mode toggle ignored during city selection");
            return None;
        }
        self.mode = self.mode.toggled();
        Some(self.mode)
    }

    /// Apply an action, returning what happened or `None` if it was ignored.
    pub fn apply(&mut self, action: Action) -> Option<GameEvent> {
        match action {
            Action::StartRound => Some(GameEvent::RoundStarted(self.start_round())),
            Action::GuessRegion(id) => self.submit_region_guess(&id).map(GameEvent::Region),
            Action::GuessCity(city) => self.submit_city_guess(&city).map(GameEvent::City),
            Action::ToggleMode => self.toggle_city_mode().map(GameEvent::ModeChanged),
        }
    }

    /// What the player should be looking for right now.
    #[must_use]
    pub fn prompt(&self) -> Prompt {
        let Some(region) = self.target_region() else {
            return Prompt::default();
        };

        match (self.phase, self.target_city.as_deref()) {
            (Phase::CitySelection, Some(city)) => {
                let main = match self.mode {
                    CityMode::Capital => format!("The capital of {}", region.name),
                    CityMode::Fact => region
                        .fact(city)
                        .map_or_else(|| format!("A city in {}", region.name), str::to_string),
                };
                Prompt {
                    label: "Find".to_string(),
                    main,
                    target: region.id.clone(),
                }
            }
            _ => Prompt {
                label: if self.region_missed { "Find" } else { "Find State" }.to_string(),
                main: region.name.clone(),
                target: region.id.clone(),
            },
        }
    }

    fn choose_city(&mut self, region: &Region) -> CityName {
        match self.mode {
            CityMode::Capital => region.capital.clone(),
            CityMode::Fact => {
                let names: Vec<&str> = region.city_names().collect();
                self.rng
                    .choose(&names)
                    .map_or_else(|| region.capital.clone(), |name| (*name).to_string())
            }
        }
    }
}
