#![no_main]

use std::sync::Arc;
use std::time::Duration;

use arbitrary::Arbitrary;
use geoquest::{Dataset, GameConfig, GameSession, InteractionController, ScreenPoint};
use libfuzzer_sys::fuzz_target;

/// One user input.
#[derive(Arbitrary, Debug)]
enum Input {
    Click { x: i16, y: i16 },
    Hover { x: i16, y: i16 },
    Zoom { factor: u8, x: i16, y: i16 },
    Pan { dx: i8, dy: i8 },
    Acknowledge,
    ToggleMode,
    ResetView,
    Resize { w: u16, h: u16 },
}

/// Structured input for controller fuzzing.
#[derive(Arbitrary, Debug)]
struct InputScript {
    /// Session seed.
    seed: u64,
    /// Inputs with the milliseconds elapsed before each.
    steps: Vec<(u16, Input)>,
}

fuzz_target!(|script: InputScript| {
    let Ok(dataset) = Dataset::builtin() else {
        return;
    };
    let config = GameConfig::default();
    let session = GameSession::new(Arc::new(dataset), &config, script.seed);
    let mut ctl = InteractionController::new(session, config, 960.0, 600.0);

    let mut now = Duration::ZERO;
    ctl.start_round(now);

    // Cap inputs to keep runs short
    for (dt, input) in script.steps.into_iter().take(500) {
        now += Duration::from_millis(u64::from(dt));
        match input {
            Input::Click { x, y } => {
                ctl.click(ScreenPoint::new(f64::from(x), f64::from(y)), now);
            }
            Input::Hover { x, y } => {
                ctl.hover(ScreenPoint::new(f64::from(x), f64::from(y)), now);
            }
            Input::Zoom { factor, x, y } => {
                let factor = f64::from(factor.max(1)) / 32.0;
                ctl.zoom(factor, ScreenPoint::new(f64::from(x), f64::from(y)), now);
            }
            Input::Pan { dx, dy } => ctl.pan(f64::from(dx), f64::from(dy), now),
            Input::Acknowledge => {
                ctl.acknowledge(now);
            }
            Input::ToggleMode => {
                ctl.toggle_mode();
            }
            Input::ResetView => ctl.reset_view(now),
            Input::Resize { w, h } => ctl.resize(f64::from(w.max(1)), f64::from(h.max(1))),
        }

        ctl.tick(now);
        let view = ctl.view(now);
        let extent = config.zoom_extent;
        assert!(view.transform.k >= extent.min.min(config.fit.extent.min) - 1e-9);
        assert!(view.transform.k <= extent.max.max(config.fit.extent.max) + 1e-9);
        assert!(ctl.session().visited_count() <= ctl.session().dataset().len());
        if view.panel.is_some() {
            assert!(ctl.markers().is_some());
        }
    }
});
