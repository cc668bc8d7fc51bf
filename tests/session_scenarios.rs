//! End-to-end game scenarios on the built-in dataset.
//!
//! These drive the session directly and through the interaction controller,
//! covering whole games rather than single operations.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use geoquest::controller::Visibility;
use geoquest::game::RegionGuess;
use geoquest::{
    Action, CityMode, Dataset, DatasetError, GameConfig, GameEvent, GameSession,
    InteractionController, Phase,
};

fn builtin() -> Arc<Dataset> {
    Arc::new(Dataset::builtin().unwrap())
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Answer every round correctly through the session API.
fn play_perfect_round(session: &mut GameSession) {
    let target = session.target_region().unwrap().id.clone();
    session.apply(Action::GuessRegion(target)).unwrap();
    let city = session.target_city().unwrap().to_string();
    let event = session.apply(Action::GuessCity(city)).unwrap();
    assert!(matches!(event, GameEvent::City(ref g) if g.outcome.is_correct()));
}

#[test]
fn test_perfect_game_visits_every_region_once() {
    let dataset = builtin();
    let regions = dataset.len();
    let mut session = GameSession::new(Arc::clone(&dataset), &GameConfig::default(), 7);

    let mut seen = Vec::new();
    for _ in 0..regions {
        let start = session.start_round();
        assert!(start.completed.is_none());
        assert!(!seen.contains(&start.target), "{} drawn twice", start.target);
        seen.push(start.target);
        play_perfect_round(&mut session);
    }
    assert_eq!(session.score(), 20 * i32::try_from(regions).unwrap());
    assert_eq!(session.visited_count(), regions);

    // The next round closes the game and starts a fresh one
    let start = session.start_round();
    let done = start.completed.unwrap();
    assert_eq!(done.final_score, 20 * i32::try_from(regions).unwrap());
    assert_eq!(done.rounds, regions);
    assert_eq!(session.score(), 0);
    assert_eq!(session.visited_count(), 1);
    assert_eq!(session.games_completed(), 1);
}

#[test]
fn test_capital_mode_always_asks_for_the_capital() {
    let dataset = builtin();
    let mut session = GameSession::new(Arc::clone(&dataset), &GameConfig::default(), 3);

    for _ in 0..dataset.len() {
        session.start_round();
        let region = session.target_region().unwrap().clone();
        session.submit_region_guess(&region.id).unwrap();
        assert_eq!(session.target_city(), Some(region.capital.as_str()));
        assert_eq!(
            session.prompt().main,
            format!("The capital of {}", region.name)
        );
        let capital = region.capital.clone();
        session.submit_city_guess(&capital).unwrap();
    }
}

#[test]
fn test_fact_mode_prompt_is_the_target_fact() {
    let dataset = builtin();
    let mut session =
        GameSession::new(Arc::clone(&dataset), &GameConfig::default(), 11).with_mode(CityMode::Fact);

    for _ in 0..dataset.len() {
        session.start_round();
        let region = session.target_region().unwrap().clone();
        session.submit_region_guess(&region.id).unwrap();

        let city = session.target_city().unwrap().to_string();
        assert!(region.cities.contains_key(&city));
        assert_eq!(session.prompt().main, region.fact(&city).unwrap());
        session.submit_city_guess(&city).unwrap();
    }
}

#[test]
fn test_wrong_guesses_cost_points_and_keep_the_round() {
    let dataset = builtin();
    let mut session = GameSession::new(Arc::clone(&dataset), &GameConfig::default(), 5);
    let start = session.start_round();

    let decoy = dataset
        .regions()
        .iter()
        .find(|r| r.id != start.target)
        .unwrap()
        .id
        .clone();
    let guess = session.submit_region_guess(&decoy).unwrap();
    assert!(matches!(guess, RegionGuess::Wrong { .. }));
    assert_eq!(session.score(), -10);
    assert_eq!(session.phase(), Phase::MapSelection);

    // Territories are never targets but still cost points
    let guess = session.submit_region_guess("DC").unwrap();
    match guess {
        RegionGuess::Wrong { guessed_name, .. } => assert_eq!(guessed_name, "Washington DC"),
        RegionGuess::Correct { .. } => panic!("DC is not a target"),
    }
    assert_eq!(session.score(), -20);

    session.submit_region_guess(&start.target).unwrap();
    assert_eq!(session.score(), -10);
    assert_eq!(session.phase(), Phase::CitySelection);
}

#[test]
fn test_controller_round_by_screen_clicks() {
    let config = GameConfig::default();
    let session = GameSession::new(builtin(), &config, 21);
    let mut ctl = InteractionController::new(session, config, 960.0, 600.0);

    let mut now = Duration::ZERO;
    ctl.start_round(now);
    let target = ctl.session().target_region().unwrap().clone();

    // Click a different region's capital first
    let other = ctl
        .session()
        .dataset()
        .regions()
        .iter()
        .find(|r| r.id != target.id)
        .unwrap()
        .clone();
    now += ms(100);
    let p = ctl.locate(other.city(&other.capital).unwrap(), now).unwrap();
    let event = ctl.click(p, now).unwrap();
    assert!(matches!(event, GameEvent::Region(RegionGuess::Wrong { .. })));
    assert_eq!(
        ctl.view(now).feedback.as_deref(),
        Some(format!("That is {}", other.name).as_str())
    );

    // Then the right one
    now += ms(100);
    let p = ctl.locate(target.city(&target.capital).unwrap(), now).unwrap();
    let event = ctl.click(p, now).unwrap();
    assert!(matches!(event, GameEvent::Region(RegionGuess::Correct { .. })));
    assert!(ctl.view(now).feedback.is_none());
    assert_eq!(ctl.focus(), Some(target.id.as_str()));

    // Markers ignore clicks until they are interactive
    let city = ctl.session().target_city().unwrap().to_string();
    let coord = target.city(&city).unwrap();
    let p = ctl.locate(coord, now).unwrap();
    assert!(ctl.click(p, now).is_none());

    now += config.timings.camera().max(config.timings.marker_interactive()) + ms(1);
    let p = ctl.locate(coord, now).unwrap();
    let event = ctl.click(p, now).unwrap();
    assert!(matches!(event, GameEvent::City(ref g) if g.outcome.is_correct()));
    assert_eq!(ctl.session().score(), 10);

    let view = ctl.view(now);
    let panel = view.panel.unwrap();
    assert_eq!(panel.status(), "CORRECT");
    assert_eq!(panel.action_label(), "Next Mission");

    // Acknowledging starts the next round on a different region
    let next = ctl.acknowledge(now).unwrap();
    assert_ne!(next.target, target.id);
    assert_eq!(ctl.session().phase(), Phase::MapSelection);
    assert!(ctl.markers().is_none());
    assert!(ctl.focus().is_none());
}

#[test]
fn test_feedback_fades_then_clears() {
    let config = GameConfig::default();
    let session = GameSession::new(builtin(), &config, 2);
    let mut ctl = InteractionController::new(session, config, 960.0, 600.0);
    ctl.start_round(Duration::ZERO);

    let target = ctl.session().target_region().unwrap().id.clone();
    let decoy = ctl
        .session()
        .dataset()
        .regions()
        .iter()
        .find(|r| r.id != target)
        .unwrap()
        .id
        .clone();
    ctl.click_region(&decoy, Duration::ZERO).unwrap();

    let visible = config.timings.feedback_visible();
    let fade = config.timings.feedback_fade();

    let view = ctl.view(visible - ms(1));
    assert_eq!(view.feedback_visibility, Visibility::Visible);

    ctl.tick(visible);
    assert_eq!(ctl.view(visible).feedback_visibility, Visibility::Fading);
    assert!(ctl.view(visible).feedback.is_some());

    ctl.tick(visible + fade);
    let view = ctl.view(visible + fade);
    assert_eq!(view.feedback_visibility, Visibility::Hidden);
    assert!(view.feedback.is_none());
}

#[test]
fn test_dataset_file_loads_and_bad_files_fail() {
    let mut good = tempfile::NamedTempFile::new().unwrap();
    write!(
        good,
        r#"{{
            "regions": {{
                "XX": {{
                    "name": "Exampleland",
                    "group": "west",
                    "capital": "Capitol",
                    "boundary": [[-101.0, 39.0], [-99.0, 39.0], [-99.0, 41.0], [-101.0, 41.0]],
                    "cities": {{ "Capitol": [-100.0, 40.0] }},
                    "facts": {{ "Capitol": "It has a dome." }}
                }}
            }}
        }}"#
    )
    .unwrap();
    let dataset = Dataset::load(good.path()).unwrap();
    assert_eq!(dataset.len(), 1);
    assert!(dataset.territories().is_empty());
    assert_eq!(dataset.display_name("XX"), Some("Exampleland"));

    let mut bad = tempfile::NamedTempFile::new().unwrap();
    write!(bad, r#"{{ "regions": {{}} }}"#).unwrap();
    assert!(matches!(Dataset::load(bad.path()), Err(DatasetError::Empty)));

    let missing = good.path().with_extension("missing");
    assert!(matches!(
        Dataset::load(&missing),
        Err(DatasetError::Io { .. })
    ));
}
