//! City markers for the region being searched.

use std::time::Duration;

use crate::dataset::{CityName, GeoCoord, Region, RegionId};
use crate::game::Outcome;
use crate::geo::{GeoProjector, ScreenPoint};
use crate::viewport::{ease_cubic_in_out, progress, Transform};

/// Whether a marker has been guessed this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerState {
    /// Not guessed yet.
    #[default]
    Open,
    /// Guessed and right.
    Correct,
    /// Guessed and wrong; stays unclickable for the rest of the round.
    Wrong,
}

impl From<Outcome> for MarkerState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Correct => MarkerState::Correct,
            Outcome::Wrong => MarkerState::Wrong,
        }
    }
}

/// One city marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// City name.
    pub city: CityName,
    /// Geographic location.
    pub coord: GeoCoord,
    /// Projected location in map space.
    pub position: ScreenPoint,
    /// Guess state.
    pub state: MarkerState,
}

/// The markers of one region, with their reveal animation.
///
/// Markers start at zero radius. Once revealed they grow to
/// `base_radius / scale`, so on screen they always end up `base_radius`
/// pixels across whatever the zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayer {
    region: RegionId,
    markers: Vec<Marker>,
    base_radius: f64,
    grow: Duration,
    reveal_start: Option<Duration>,
    interactive: bool,
}

impl MarkerLayer {
    /// Project a region's cities. Cities outside the projection are dropped.
    #[must_use]
    pub fn new(region: &Region, projector: &GeoProjector, base_radius: f64, grow: Duration) -> Self {
        let markers = region
            .cities
            .iter()
            .filter_map(|(city, coord)| {
                projector.project(*coord).map(|position| Marker {
                    city: city.clone(),
                    coord: *coord,
                    position,
                    state: MarkerState::Open,
                })
            })
            .collect();

        Self {
            region: region.id.clone(),
            markers,
            base_radius,
            grow,
            reveal_start: None,
            interactive: false,
        }
    }

    /// Region the markers belong to.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// All markers.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Marker for a city.
    #[must_use]
    pub fn marker(&self, city: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.city == city)
    }

    /// Start growing at `start`.
    pub fn reveal(&mut self, start: Duration) {
        self.reveal_start = Some(start);
    }

    /// Allow clicks.
    pub fn set_interactive(&mut self) {
        self.interactive = true;
    }

    /// Whether clicks are accepted.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Growth fraction in `[0, 1]` at `now`.
    #[must_use]
    pub fn growth_at(&self, now: Duration) -> f64 {
        self.reveal_start
            .map_or(0.0, |start| ease_cubic_in_out(progress(start, self.grow, now)))
    }

    /// Map-space radius at `now` under a given view scale.
    #[must_use]
    pub fn radius_at(&self, now: Duration, scale: f64) -> f64 {
        if scale <= 0.0 {
            return 0.0;
        }
        self.base_radius / scale * self.growth_at(now)
    }

    /// Record a guess on a marker. Returns false if there is no such marker.
    pub fn resolve(&mut self, city: &str, outcome: Outcome) -> bool {
        match self.markers.iter_mut().find(|m| m.city == city) {
            Some(marker) => {
                marker.state = outcome.into();
                true
            }
            None => false,
        }
    }

    /// Whether a marker was already guessed.
    #[must_use]
    pub fn is_resolved(&self, city: &str) -> bool {
        self.marker(city)
            .is_some_and(|m| m.state != MarkerState::Open)
    }

    /// Closest marker under a screen point.
    ///
    /// A marker is hit when the point lies within its on-screen radius plus
    /// `tolerance` pixels.
    #[must_use]
    pub fn marker_at(
        &self,
        p: ScreenPoint,
        transform: &Transform,
        now: Duration,
        tolerance: f64,
    ) -> Option<&Marker> {
        let reach = self.radius_at(now, transform.k) * transform.k + tolerance;
        self.markers
            .iter()
            .map(|m| (m, transform.apply(m.position).distance(p)))
            .filter(|(_, d)| *d <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _)| m)
    }

    /// Re-project every marker after the projector was re-fitted.
    pub fn reproject(&mut self, projector: &GeoProjector) {
        for marker in &mut self.markers {
            if let Some(position) = projector.project(marker.coord) {
                marker.position = position;
            }
        }
    }
}
