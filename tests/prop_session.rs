//! Property-based tests for the game session and the camera math.
//!
//! Run with: cargo test --release prop_session

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use geoquest::geo::{point_in_polygon, ScreenBounds};
use geoquest::viewport::{FitOptions, ScaleExtent};
use geoquest::{Action, Dataset, GameConfig, GameEvent, GameSession, ScreenPoint, Transform};

fn builtin() -> Arc<Dataset> {
    Arc::new(Dataset::builtin().unwrap())
}

/// Map a generated (kind, index) pair to an action on the built-in dataset.
fn action(dataset: &Dataset, kind: u8, index: usize) -> Action {
    match kind % 4 {
        0 => Action::StartRound,
        1 => {
            let ids: Vec<&str> = dataset
                .regions()
                .iter()
                .map(|r| r.id.as_str())
                .chain(dataset.territories().iter().map(|t| t.id.as_str()))
                .collect();
            Action::GuessRegion(ids[index % ids.len()].to_string())
        }
        2 => {
            let cities: Vec<&str> = dataset
                .regions()
                .iter()
                .flat_map(|r| r.city_names())
                .collect();
            Action::GuessCity(cities[index % cities.len()].to_string())
        }
        _ => Action::ToggleMode,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every region is drawn exactly once per game.
    #[test]
    fn prop_rounds_draw_without_replacement(seed in any::<u64>()) {
        let dataset = builtin();
        let mut session = GameSession::new(Arc::clone(&dataset), &GameConfig::default(), seed);

        let mut drawn = HashSet::new();
        for _ in 0..dataset.len() {
            let start = session.start_round();
            prop_assert!(start.completed.is_none());
            prop_assert!(drawn.insert(start.target));
        }
        prop_assert_eq!(drawn.len(), dataset.len());

        let start = session.start_round();
        prop_assert!(start.completed.is_some());
        prop_assert_eq!(session.visited_count(), 1);
    }

    /// Scored guesses move the score by exactly one step; ignored actions change nothing.
    #[test]
    fn prop_score_moves_in_single_steps(
        seed in any::<u64>(),
        steps in prop::collection::vec((any::<u8>(), any::<usize>()), 1..200)
    ) {
        let dataset = builtin();
        let config = GameConfig::default();
        let mut session = GameSession::new(Arc::clone(&dataset), &config, seed);

        for (kind, index) in steps {
            let before_score = session.score();
            let before_phase = session.phase();
            let before_mode = session.mode();

            match session.apply(action(&dataset, kind, index)) {
                None => {
                    prop_assert_eq!(session.score(), before_score);
                    prop_assert_eq!(session.phase(), before_phase);
                    prop_assert_eq!(session.mode(), before_mode);
                }
                Some(GameEvent::Region(guess)) => {
                    let delta = if guess.outcome().is_correct() { config.points } else { -config.points };
                    prop_assert_eq!(session.score(), before_score + delta);
                }
                Some(GameEvent::City(guess)) => {
                    let delta = if guess.outcome.is_correct() { config.points } else { -config.points };
                    prop_assert_eq!(session.score(), before_score + delta);
                }
                Some(GameEvent::RoundStarted(start)) => {
                    let expected = if start.completed.is_some() { 0 } else { before_score };
                    prop_assert_eq!(session.score(), expected);
                }
                Some(GameEvent::ModeChanged(mode)) => {
                    prop_assert_eq!(session.score(), before_score);
                    prop_assert_ne!(mode, before_mode);
                }
            }
        }
    }

    /// A fitted box is centered and its scale stays inside the fit range.
    #[test]
    fn prop_fit_centers_and_clamps(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        w in 0.0f64..800.0,
        h in 0.0f64..800.0,
        vw in 50.0f64..2000.0,
        vh in 50.0f64..2000.0,
    ) {
        let bounds = ScreenBounds::new(ScreenPoint::new(x, y), ScreenPoint::new(x + w, y + h));
        let options = FitOptions::default();
        let t = Transform::fit(&bounds, vw, vh, options);

        prop_assert!(t.k >= options.extent.min && t.k <= options.extent.max);
        let center = t.apply(bounds.midpoint());
        prop_assert!((center.x - vw / 2.0).abs() < 1e-6);
        prop_assert!((center.y - vh / 2.0).abs() < 1e-6);

        // Fitting is a pure function of its inputs
        prop_assert!(t.approx_eq(&Transform::fit(&bounds, vw, vh, options), 1e-12));
    }

    /// Zooming keeps the anchor fixed and the scale inside the user range.
    #[test]
    fn prop_zoom_keeps_anchor(
        k in 1.0f64..15.0,
        factor in 0.01f64..100.0,
        ax in 0.0f64..960.0,
        ay in 0.0f64..600.0,
    ) {
        let extent = ScaleExtent::USER;
        let t = Transform::new(12.0, -30.0, k);
        let anchor = ScreenPoint::new(ax, ay);
        let zoomed = t.zoomed(factor, anchor, extent);

        prop_assert!(zoomed.k >= extent.min && zoomed.k <= extent.max);
        let before = t.invert(anchor);
        let after = zoomed.invert(anchor);
        prop_assert!((before.x - after.x).abs() < 1e-6);
        prop_assert!((before.y - after.y).abs() < 1e-6);
    }

    /// Points strictly inside a rectangle hit it; points beyond it miss.
    #[test]
    fn prop_point_in_rectangle(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        w in 1.0f64..100.0,
        h in 1.0f64..100.0,
        u in 0.01f64..0.99,
        v in 0.01f64..0.99,
    ) {
        let ring = [
            ScreenPoint::new(x, y),
            ScreenPoint::new(x + w, y),
            ScreenPoint::new(x + w, y + h),
            ScreenPoint::new(x, y + h),
        ];
        prop_assert!(point_in_polygon(ScreenPoint::new(x + u * w, y + v * h), &ring));
        prop_assert!(!point_in_polygon(ScreenPoint::new(x + w + 1.0, y + v * h), &ring));
        prop_assert!(!point_in_polygon(ScreenPoint::new(x + u * w, y - 1.0), &ring));
    }
}
