//! Input orchestration: pointer events in, game actions and view state out.
//!
//! The controller owns no game rules. It resolves what was clicked, hands
//! the guess to the [`GameSession`], then drives the camera, markers, and
//! feedback from the returned outcome. Every deferred effect goes through
//! [`Timers`], so a newer event always cancels a stale one of the same kind.

mod feedback;
mod markers;
mod panel;
mod timers;
mod view;

pub use feedback::{Feedback, Visibility};
pub use markers::{Marker, MarkerLayer, MarkerState};
pub use panel::FactPanel;
pub use timers::{Fired, TimerId, TimerKind, Timers};
pub use view::{MarkerView, RegionStyle, ViewModel};

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::GameConfig;
use crate::dataset::{CityName, GeoCoord, RegionId};
use crate::game::{CityMode, GameEvent, GameSession, Outcome, Phase, RegionGuess, RoundStart};
use crate::geo::{GeoProjector, HitTester, ScreenPoint};
use crate::viewport::ViewportTransform;

/// Drives one [`GameSession`] from pointer and keyboard input.
#[derive(Debug, Clone)]
pub struct InteractionController {
    session: GameSession,
    config: GameConfig,
    projector: GeoProjector,
    hits: HitTester,
    viewport: ViewportTransform,
    timers: Timers,
    feedback: Feedback,
    markers: Option<MarkerLayer>,
    panel: Option<FactPanel>,
    flashes: BTreeMap<RegionId, Outcome>,
    focus: Option<RegionId>,
    hovered: Option<CityName>,
}

impl InteractionController {
    /// Fit the map to a `width` x `height` surface and wrap a session.
    ///
    /// No round is started; call [`start_round`](Self::start_round).
    #[must_use]
    pub fn new(session: GameSession, config: GameConfig, width: f64, height: f64) -> Self {
        let dataset = Arc::clone(session.dataset());
        let projector = GeoProjector::albers_usa().fit(dataset.boundary_points(), width, height);
        let hits = HitTester::build(&dataset, &projector);
        let viewport = ViewportTransform::new(width, height)
            .with_user_extent(config.zoom_extent)
            .with_fit_options(config.fit);

        Self {
            session,
            config,
            projector,
            hits,
            viewport,
            timers: Timers::new(),
            feedback: Feedback::default(),
            markers: None,
            panel: None,
            flashes: BTreeMap::new(),
            focus: None,
            hovered: None,
        }
    }

    /// The wrapped session.
    #[must_use]
    pub const fn session(&self) -> &GameSession {
        &self.session
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Projection fitted to the current surface size.
    #[must_use]
    pub const fn projector(&self) -> &GeoProjector {
        &self.projector
    }

    /// Projected region and territory shapes.
    #[must_use]
    pub const fn hit_tester(&self) -> &HitTester {
        &self.hits
    }

    /// Camera state.
    #[must_use]
    pub const fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    /// Pending deferred effects.
    #[must_use]
    pub const fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Wrong-guess feedback line.
    #[must_use]
    pub const fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Open fact panel.
    #[must_use]
    pub const fn panel(&self) -> Option<&FactPanel> {
        self.panel.as_ref()
    }

    /// Markers of the region being searched.
    #[must_use]
    pub const fn markers(&self) -> Option<&MarkerLayer> {
        self.markers.as_ref()
    }

    /// Region the camera is focused on.
    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Clear everything round-scoped, reset the camera, and start a round.
    pub fn start_round(&mut self, now: Duration) -> RoundStart {
        self.timers.cancel_all();
        self.feedback.clear();
        self.markers = None;
        self.panel = None;
        self.flashes.clear();
        self.focus = None;
        self.hovered = None;
        self.viewport.reset(self.config.timings.camera(), now);
        self.session.start_round()
    }

    /// Handle a click at a screen position.
    ///
    /// Markers take precedence over the region beneath them. Returns `None`
    /// when the click hit nothing or was ignored.
    pub fn click(&mut self, p: ScreenPoint, now: Duration) -> Option<GameEvent> {
        self.tick(now);
        if self.panel.is_some() {
            debug!("click ignored while fact panel is open");
            return None;
        }

        let transform = self.viewport.transform_at(now);
        let marker = self.markers.as_ref().and_then(|layer| {
            layer
                .marker_at(p, &transform, now, self.config.pick_tolerance)
                .map(|m| m.city.clone())
        });
        if let Some(city) = marker {
            return self.click_city(&city, now);
        }

        let id = self.hits.region_at(transform.invert(p))?.to_string();
        self.click_region(&id, now)
    }

    /// Handle a click on a region or territory by id.
    pub fn click_region(&mut self, id: &str, now: Duration) -> Option<GameEvent> {
        self.tick(now);
        if self.panel.is_some() {
            debug!(id, "region click ignored while fact panel is open");
            return None;
        }

        let guess = self.session.submit_region_guess(id)?;
        if self.hits.shape(id).is_some() {
            self.flash(id, guess.outcome(), now);
        }
        match &guess {
            RegionGuess::Correct { region, .. } => self.enter_city_phase(region, now),
            RegionGuess::Wrong { guessed_name, .. } => self.show_wrong(guessed_name, now),
        }
        Some(GameEvent::Region(guess))
    }

    /// Handle a click on a city marker by name.
    ///
    /// Ignored until the markers are interactive and for markers already
    /// guessed this round.
    pub fn click_city(&mut self, city: &str, now: Duration) -> Option<GameEvent> {
        self.tick(now);
        if self.panel.is_some() {
            debug!(city, "city click ignored while fact panel is open");
            return None;
        }

        let layer = self.markers.as_ref()?;
        if !layer.is_interactive() {
            debug!(city, "markers not interactive yet");
            return None;
        }
        if layer.marker(city).is_none() || layer.is_resolved(city) {
            return None;
        }

        let guess = self.session.submit_city_guess(city)?;
        if let Some(layer) = self.markers.as_mut() {
            layer.resolve(city, guess.outcome);
        }
        self.panel = Some(FactPanel::from_guess(&guess));
        Some(GameEvent::City(guess))
    }

    /// Press the fact panel's button.
    ///
    /// After a correct guess this starts the next round; after a wrong one it
    /// only closes the panel.
    pub fn acknowledge(&mut self, now: Duration) -> Option<RoundStart> {
        let panel = self.panel.take()?;
        if panel.outcome.is_correct() {
            Some(self.start_round(now))
        } else {
            None
        }
    }

    /// Flip capital/fact mode; ignored during city selection.
    pub fn toggle_mode(&mut self) -> Option<CityMode> {
        self.session.toggle_city_mode()
    }

    /// Track the pointer for the city tooltip. Returns the city under it.
    pub fn hover(&mut self, p: ScreenPoint, now: Duration) -> Option<&str> {
        let transform = self.viewport.transform_at(now);
        self.hovered = self.markers.as_ref().and_then(|layer| {
            layer
                .marker_at(p, &transform, now, self.config.pick_tolerance)
                .filter(|_| layer.growth_at(now) > 0.0)
                .map(|m| m.city.clone())
        });
        self.hovered.as_deref()
    }

    /// Scroll zoom around a screen point.
    pub fn zoom(&mut self, factor: f64, anchor: ScreenPoint, now: Duration) {
        self.viewport.zoom_by(factor, anchor, now);
    }

    /// Drag pan by a screen-space offset.
    pub fn pan(&mut self, dx: f64, dy: f64, now: Duration) {
        self.viewport.pan_by(dx, dy, now);
    }

    /// Animate the camera back to the full map.
    pub fn reset_view(&mut self, now: Duration) {
        self.viewport.reset(self.config.timings.camera(), now);
    }

    /// Re-fit the map to a new surface size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.projector.refit(width, height);
        self.hits = HitTester::build(self.session.dataset(), &self.projector);
        self.viewport.resize(width, height);
        if let Some(layer) = self.markers.as_mut() {
            layer.reproject(&self.projector);
        }
        debug!(width, height, "surface resized");
    }

    /// Advance the clock: settle animations and fire due timers.
    pub fn tick(&mut self, now: Duration) {
        self.viewport.tick(now);
        for fired in self.timers.take_due(now) {
            match fired.kind {
                TimerKind::FeedbackFade => self.feedback.fade(),
                TimerKind::FeedbackClear => self.feedback.clear(),
                TimerKind::Flash(id) => {
                    self.flashes.remove(&id);
                }
                TimerKind::MarkerReveal => {
                    if let Some(layer) = self.markers.as_mut() {
                        layer.reveal(fired.deadline);
                    }
                }
                TimerKind::MarkersInteractive => {
                    if let Some(layer) = self.markers.as_mut() {
                        layer.set_interactive();
                    }
                }
            }
        }
    }

    /// Screen position of a coordinate at `now`, camera included.
    #[must_use]
    pub fn locate(&self, coord: GeoCoord, now: Duration) -> Option<ScreenPoint> {
        self.projector
            .project(coord)
            .map(|p| self.viewport.apply(p, now))
    }

    /// Everything needed to draw a frame at `now`.
    ///
    /// Reads state only; call [`tick`](Self::tick) first so due timers apply.
    #[must_use]
    pub fn view(&self, now: Duration) -> ViewModel {
        let transform = self.viewport.transform_at(now);
        let dataset = self.session.dataset();

        let regions = self
            .hits
            .shapes()
            .iter()
            .map(|shape| RegionStyle {
                id: shape.id.clone(),
                group: dataset.group(&shape.id).unwrap_or_default().to_string(),
                flash: self.flashes.get(&shape.id).copied(),
                focused: self.focus.as_deref() == Some(shape.id.as_str()),
            })
            .collect();

        let markers = self
            .markers
            .as_ref()
            .map(|layer| {
                let radius = layer.radius_at(now, transform.k);
                layer
                    .markers()
                    .iter()
                    .map(|m| MarkerView {
                        city: m.city.clone(),
                        position: m.position,
                        radius,
                        state: m.state,
                    })
                    .collect()
            })
            .unwrap_or_default();

        ViewModel {
            prompt: self.session.prompt(),
            score: self.session.score(),
            phase: self.session.phase(),
            mode: self.session.mode(),
            mode_enabled: self.session.phase() == Phase::MapSelection,
            feedback: self.feedback.text().map(str::to_string),
            feedback_visibility: self.feedback.visibility(),
            panel: self.panel.clone(),
            regions,
            markers,
            hovered: self.hovered.clone(),
            transform,
        }
    }

    fn flash(&mut self, id: &str, outcome: Outcome, now: Duration) {
        self.flashes.insert(id.to_string(), outcome);
        self.timers.schedule(
            TimerKind::Flash(id.to_string()),
            now + self.config.timings.flash(),
        );
    }

    fn enter_city_phase(&mut self, id: &str, now: Duration) {
        let timings = self.config.timings;
        self.focus = Some(id.to_string());
        self.feedback.clear();
        self.timers.cancel(&TimerKind::FeedbackFade);
        self.timers.cancel(&TimerKind::FeedbackClear);

        if let Some(bounds) = self.hits.shape(id).map(|s| s.bounds) {
            self.viewport.fit_to(&bounds, timings.camera(), now);
        }

        let dataset = Arc::clone(self.session.dataset());
        self.markers = dataset.region(id).map(|region| {
            MarkerLayer::new(
                region,
                &self.projector,
                self.config.marker_radius,
                timings.marker_grow(),
            )
        });
        self.timers
            .schedule(TimerKind::MarkerReveal, now + timings.marker_delay());
        self.timers.schedule(
            TimerKind::MarkersInteractive,
            now + timings.marker_interactive(),
        );
    }

    fn show_wrong(&mut self, name: &str, now: Duration) {
        let timings = self.config.timings;
        self.feedback.show(format!("That is {name}"));
        self.timers
            .schedule(TimerKind::FeedbackFade, now + timings.feedback_visible());
        self.timers.schedule(
            TimerKind::FeedbackClear,
            now + timings.feedback_visible() + timings.feedback_fade(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn controller(seed: u64) -> InteractionController {
        let dataset = Arc::new(Dataset::builtin().unwrap());
        let config = GameConfig::default();
        let session = GameSession::new(dataset, &config, seed);
        InteractionController::new(session, config, 960.0, 600.0)
    }

    fn capital_point(ctl: &InteractionController, id: &str, now: Duration) -> ScreenPoint {
        let region = ctl.session().dataset().region(id).unwrap();
        ctl.locate(region.city(&region.capital).unwrap(), now).unwrap()
    }

    fn other_region(ctl: &InteractionController, target: &str) -> String {
        ctl.session()
            .dataset()
            .regions()
            .iter()
            .find(|r| r.id != target)
            .unwrap()
            .id
            .clone()
    }

    #[test]
    fn test_full_round_by_clicks() {
        let mut ctl = controller(3);
        let target = ctl.start_round(ms(0)).target;

        let p = capital_point(&ctl, &target, ms(0));
        let event = ctl.click(p, ms(0)).unwrap();
        assert!(matches!(event, GameEvent::Region(RegionGuess::Correct { .. })));
        assert_eq!(ctl.session().phase(), Phase::CitySelection);
        assert_eq!(ctl.focus(), Some(target.as_str()));
        assert!(ctl.viewport().is_animating(ms(500)));

        // Markers exist but are not clickable yet
        assert!(!ctl.markers().unwrap().is_interactive());
        let city = ctl.session().target_city().unwrap().to_string();
        assert!(ctl.click_city(&city, ms(100)).is_none());

        let now = ms(1200);
        ctl.tick(now);
        assert!(ctl.markers().unwrap().is_interactive());
        let p = capital_point(&ctl, &target, now);
        let Some(GameEvent::City(guess)) = ctl.click(p, now) else {
            panic!("expected city guess");
        };
        assert!(guess.outcome.is_correct());
        assert_eq!(ctl.panel().unwrap().action_label(), "Next Mission");
        assert_eq!(ctl.session().score(), 20);

        let next = ctl.acknowledge(ms(1300)).unwrap();
        assert_ne!(next.target, target);
        assert!(ctl.panel().is_none());
        assert!(ctl.markers().is_none());
        assert!(ctl.focus().is_none());
    }

    #[test]
    fn test_wrong_region_feedback_expires() {
        let mut ctl = controller(5);
        let target = ctl.start_round(ms(0)).target;
        let wrong = other_region(&ctl, &target);
        let name = ctl.session().dataset().display_name(&wrong).unwrap().to_string();

        let p = capital_point(&ctl, &wrong, ms(0));
        assert!(ctl.click(p, ms(0)).is_some());
        assert_eq!(ctl.feedback().text(), Some(format!("That is {name}").as_str()));
        let view = ctl.view(ms(0));
        let style = view.regions.iter().find(|r| r.id == wrong).unwrap();
        assert_eq!(style.flash, Some(Outcome::Wrong));

        ctl.tick(ms(500));
        assert!(ctl.view(ms(500)).regions.iter().all(|r| r.flash.is_none()));

        ctl.tick(ms(3000));
        assert_eq!(ctl.feedback().visibility(), Visibility::Fading);
        ctl.tick(ms(3300));
        assert_eq!(ctl.feedback().text(), None);
    }

    #[test]
    fn test_newer_wrong_guess_cancels_pending_feedback() {
        let mut ctl = controller(5);
        let target = ctl.start_round(ms(0)).target;
        let wrong = other_region(&ctl, &target);

        ctl.click_region(&wrong, ms(0));
        ctl.click_region(&wrong, ms(2000));
        assert_eq!(ctl.session().score(), -20);

        ctl.tick(ms(3100));
        assert_eq!(ctl.feedback().visibility(), Visibility::Visible);
        ctl.tick(ms(5000));
        assert_eq!(ctl.feedback().visibility(), Visibility::Fading);
        ctl.tick(ms(5300));
        assert_eq!(ctl.feedback().visibility(), Visibility::Hidden);
    }

    #[test]
    fn test_territory_click_uses_dataset_name() {
        let mut ctl = controller(8);
        ctl.start_round(ms(0));

        let p = ctl.locate(GeoCoord::new(-77.03, 38.89), ms(0)).unwrap();
        let Some(GameEvent::Region(RegionGuess::Wrong { guessed, guessed_name, .. })) =
            ctl.click(p, ms(0))
        else {
            panic!("expected wrong guess");
        };
        assert_eq!(guessed, "DC");
        assert_eq!(guessed_name, "Washington DC");
    }

    #[test]
    fn test_click_on_empty_map_does_nothing() {
        let mut ctl = controller(8);
        ctl.start_round(ms(0));
        assert!(ctl.click(ScreenPoint::new(-50.0, -50.0), ms(0)).is_none());
        assert_eq!(ctl.session().score(), 0);
    }

    #[test]
    fn test_wrong_city_keeps_round_and_marker_resolved() {
        let mut ctl = controller(13);
        let target = ctl.start_round(ms(0)).target;
        ctl.click_region(&target, ms(0));
        ctl.tick(ms(1000));

        let city = ctl.session().target_city().unwrap().to_string();
        let wrong = ctl
            .markers()
            .unwrap()
            .markers()
            .iter()
            .find(|m| m.city != city)
            .unwrap()
            .city
            .clone();

        assert!(ctl.click_city(&wrong, ms(1000)).is_some());
        assert_eq!(ctl.panel().unwrap().status(), "INCORRECT");

        // Map clicks are ignored while the panel is open
        assert!(ctl.click_city(&city, ms(1100)).is_none());
        assert!(ctl.acknowledge(ms(1200)).is_none());
        assert!(ctl.panel().is_none());
        assert_eq!(ctl.session().phase(), Phase::CitySelection);

        assert!(ctl.click_city(&wrong, ms(1300)).is_none());
        assert_eq!(
            ctl.markers().unwrap().marker(&wrong).unwrap().state,
            MarkerState::Wrong
        );
        assert_eq!(ctl.session().score(), 0);
    }

    #[test]
    fn test_round_start_cancels_pending_timers() {
        let mut ctl = controller(21);
        let target = ctl.start_round(ms(0)).target;
        let wrong = other_region(&ctl, &target);
        ctl.click_region(&wrong, ms(0));
        assert!(!ctl.timers().is_empty());

        ctl.start_round(ms(100));
        assert!(ctl.timers().is_empty());
        assert_eq!(ctl.feedback().text(), None);
    }

    #[test]
    fn test_marker_radius_tracks_live_scale() {
        let mut ctl = controller(34);
        let target = ctl.start_round(ms(0)).target;
        ctl.click_region(&target, ms(0));

        for t in [600, 700, 800, 950] {
            ctl.tick(ms(t));
            let view = ctl.view(ms(t));
            let marker = &view.markers[0];
            let growth = ctl.markers().unwrap().growth_at(ms(t));
            let on_screen = marker.radius * view.transform.k;
            assert!((on_screen - 6.0 * growth).abs() < 1e-9);
        }
    }

    #[test]
    fn test_mode_toggle_disabled_in_city_phase() {
        let mut ctl = controller(55);
        let target = ctl.start_round(ms(0)).target;
        assert!(ctl.view(ms(0)).mode_enabled);
        assert_eq!(ctl.toggle_mode(), Some(CityMode::Fact));

        ctl.click_region(&target, ms(0));
        assert!(!ctl.view(ms(0)).mode_enabled);
        assert!(ctl.toggle_mode().is_none());
    }

    #[test]
    fn test_user_zoom_is_clamped() {
        let mut ctl = controller(1);
        ctl.start_round(ms(0));
        ctl.tick(ms(1000));
        ctl.zoom(100.0, ScreenPoint::new(480.0, 300.0), ms(1000));
        assert!((ctl.viewport().scale_at(ms(1000)) - 15.0).abs() < 1e-9);
        ctl.zoom(0.001, ScreenPoint::new(480.0, 300.0), ms(1000));
        assert!((ctl.viewport().scale_at(ms(1000)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_keeps_hit_testing_consistent() {
        let mut ctl = controller(2);
        let target = ctl.start_round(ms(0)).target;
        ctl.resize(480.0, 300.0);
        let (w, h) = ctl.projector().viewport();
        assert!((w - 480.0).abs() < f64::EPSILON && (h - 300.0).abs() < f64::EPSILON);

        let p = capital_point(&ctl, &target, ms(0));
        assert!(p.x <= 480.0 && p.y <= 300.0);
        assert!(matches!(
            ctl.click(p, ms(0)),
            Some(GameEvent::Region(RegionGuess::Correct { .. }))
        ));
    }

    #[test]
    fn test_hover_reports_revealed_marker() {
        let mut ctl = controller(89);
        let target = ctl.start_round(ms(0)).target;
        ctl.click_region(&target, ms(0));

        let p = capital_point(&ctl, &target, ms(100));
        assert!(ctl.hover(p, ms(100)).is_none());

        ctl.tick(ms(1000));
        let p = capital_point(&ctl, &target, ms(1000));
        let capital = ctl.session().dataset().region(&target).unwrap().capital.clone();
        assert_eq!(ctl.hover(p, ms(1000)), Some(capital.as_str()));
        assert_eq!(ctl.view(ms(1000)).hovered, Some(capital));
    }
}
