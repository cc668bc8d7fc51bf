//! Headless autoplay.
//!
//! A seeded bot plays one complete game by clicking screen positions, so
//! projection, camera, hit testing, timers, and scoring all run exactly as
//! they do behind a real pointer.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GameConfig;
use crate::controller::{InteractionController, MarkerState};
use crate::dataset::{Dataset, GeoCoord};
use crate::game::{CityMode, GameEvent, GameSession, Phase};
use crate::geo::ScreenPoint;
use crate::rng::Rng;

/// Surface size the bot plays on.
pub const SIM_WIDTH: f64 = 960.0;
/// Surface height the bot plays on.
pub const SIM_HEIGHT: f64 = 600.0;

const BOT_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// How the bot plays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotProfile {
    /// Chance in `[0, 1]` that any single click goes to the right answer.
    pub accuracy: f64,
    /// Time between clicks.
    pub think_ms: u64,
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            accuracy: 0.8,
            think_ms: 250,
        }
    }
}

/// Outcome of one simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GameReport {
    /// Session seed.
    pub seed: u64,
    /// Whether every region was played before the action limit.
    pub completed: bool,
    /// Score at the end of the game.
    pub final_score: i32,
    /// Rounds played.
    pub rounds: usize,
    /// Region clicks on the target.
    pub region_correct: u32,
    /// Region clicks elsewhere.
    pub region_wrong: u32,
    /// City clicks on the target.
    pub city_correct: u32,
    /// City clicks on another city.
    pub city_wrong: u32,
    /// Clicks that hit nothing or were ignored.
    pub missed_clicks: u32,
    /// Simulated time the game took.
    pub elapsed_ms: u64,
}

impl GameReport {
    /// All scored guesses.
    #[must_use]
    pub const fn guesses(&self) -> u32 {
        self.region_correct + self.region_wrong + self.city_correct + self.city_wrong
    }
}

/// Play one full game with a bot and report how it went.
///
/// The game ends when the round after the last region reports completion.
#[must_use]
pub fn play_game(
    dataset: Arc<Dataset>,
    config: GameConfig,
    mode: CityMode,
    seed: u64,
    profile: BotProfile,
) -> GameReport {
    let session = GameSession::new(dataset, &config, seed).with_mode(mode);
    let mut ctl = InteractionController::new(session, config, SIM_WIDTH, SIM_HEIGHT);
    let dataset = Arc::clone(ctl.session().dataset());
    let mut bot = Rng::new(seed ^ BOT_SALT);

    let step = Duration::from_millis(profile.think_ms);
    let settle = config
        .timings
        .camera()
        .max(config.timings.marker_interactive());
    let max_cities = dataset
        .regions()
        .iter()
        .map(|r| r.cities.len())
        .max()
        .unwrap_or(0);
    let limit = dataset.len() * (dataset.len() + max_cities + 2) * 4;

    let mut report = GameReport {
        seed,
        ..GameReport::default()
    };
    let mut now = Duration::ZERO;
    ctl.start_round(now);

    for _ in 0..limit {
        now += step;
        let Some(point) = choose_click(&ctl, &dataset, &mut bot, profile.accuracy, now) else {
            break;
        };

        match ctl.click(point, now) {
            Some(GameEvent::Region(guess)) => {
                if guess.outcome().is_correct() {
                    report.region_correct += 1;
                    now += settle;
                } else {
                    report.region_wrong += 1;
                }
            }
            Some(GameEvent::City(guess)) => {
                now += step;
                if !guess.outcome.is_correct() {
                    report.city_wrong += 1;
                    ctl.acknowledge(now);
                    continue;
                }
                report.city_correct += 1;
                let completed = ctl.acknowledge(now).and_then(|start| start.completed);
                if let Some(done) = completed {
                    report.completed = true;
                    report.final_score = done.final_score;
                    report.rounds = done.rounds;
                    break;
                }
            }
            _ => report.missed_clicks += 1,
        }
    }

    if !report.completed {
        report.final_score = ctl.session().score();
        report.rounds = ctl.session().visited_count();
    }
    report.elapsed_ms = u64::try_from(now.as_millis()).unwrap_or(u64::MAX);
    debug!(seed, score = report.final_score, "simulated game finished");
    report
}

/// Screen point of the bot's next click.
fn choose_click(
    ctl: &InteractionController,
    dataset: &Dataset,
    bot: &mut Rng,
    accuracy: f64,
    now: Duration,
) -> Option<ScreenPoint> {
    let session = ctl.session();
    let target = session.target_region()?;
    let right = bot.next_f64() < accuracy;

    let coord: GeoCoord = match session.phase() {
        Phase::MapSelection => {
            let others: Vec<_> = dataset
                .regions()
                .iter()
                .filter(|r| r.id != target.id)
                .collect();
            let region = match bot.choose(&others) {
                Some(other) if !right => *other,
                _ => target,
            };
            region.city(&region.capital)?
        }
        Phase::CitySelection => {
            let wanted = session.target_city()?;
            let markers = ctl.markers()?;
            let decoys: Vec<_> = markers
                .markers()
                .iter()
                .filter(|m| m.state == MarkerState::Open && m.city != wanted)
                .collect();
            match bot.choose(&decoys) {
                Some(decoy) if !right => decoy.coord,
                _ => markers.marker(wanted)?.coord,
            }
        }
    };
    ctl.locate(coord, now)
}
