//! Albers equal-area conic projection fitted to a viewport.

use crate::dataset::{Dataset, GeoCoord};
use crate::error::{DatasetError, DatasetResult};
use crate::geo::{ScreenBounds, ScreenPoint};

/// Longitude/latitude box a projector accepts.
///
/// Points outside it project to `None`, the same way a composite US
/// projection refuses points that fall in none of its insets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoDomain {
    /// Western edge in degrees.
    pub min_lon: f64,
    /// Eastern edge in degrees.
    pub max_lon: f64,
    /// Southern edge in degrees.
    pub min_lat: f64,
    /// Northern edge in degrees.
    pub max_lat: f64,
}

impl GeoDomain {
    /// The contiguous United States with a small margin.
    pub const CONTIGUOUS_US: Self = Self {
        min_lon: -125.5,
        max_lon: -66.0,
        min_lat: 24.0,
        max_lat: 50.0,
    };

    /// Check whether a coordinate falls inside the domain.
    #[must_use]
    pub fn contains(&self, coord: GeoCoord) -> bool {
        coord.is_valid()
            && (self.min_lon..=self.max_lon).contains(&coord.lon)
            && (self.min_lat..=self.max_lat).contains(&coord.lat)
    }
}

/// Parameters of an Albers conic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicParams {
    /// Standard parallels in degrees.
    pub parallels: [f64; 2],
    /// Longitude mapped to the vertical center line.
    pub central_meridian: f64,
    /// Latitude mapped to y = 0 before fitting.
    pub origin_lat: f64,
}

impl ConicParams {
    /// The classic USA parameters (29.5°N / 45.5°N, centered on 96°W).
    pub const USA: Self = Self {
        parallels: [29.5, 45.5],
        central_meridian: -96.0,
        origin_lat: 38.7,
    };
}

/// Maps geographic coordinates onto a viewport.
///
/// The projector is deterministic for a given fit: the same points and the
/// same viewport size always give the same scale and translation, so it can
/// be re-fitted on resize without drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjector {
    n: f64,
    c: f64,
    rho0: f64,
    lambda0: f64,
    domain: GeoDomain,
    /// Extent of the fitted points at unit scale.
    raw_extent: Option<ScreenBounds>,
    scale: f64,
    translate: ScreenPoint,
    width: f64,
    height: f64,
}

impl GeoProjector {
    /// Create an unfitted projector (unit scale, no translation).
    #[must_use]
    pub fn new(params: ConicParams, domain: GeoDomain) -> Self {
        let phi1 = params.parallels[0].to_radians();
        let phi2 = params.parallels[1].to_radians();
        let n = (phi1.sin() + phi2.sin()) / 2.0;
        let c = phi1.cos().powi(2) + 2.0 * n * phi1.sin();
        let rho0 = (c - 2.0 * n * params.origin_lat.to_radians().sin()).sqrt() / n;

        Self {
            n,
            c,
            rho0,
            lambda0: params.central_meridian.to_radians(),
            domain,
            raw_extent: None,
            scale: 1.0,
            translate: ScreenPoint::default(),
            width: 0.0,
            height: 0.0,
        }
    }

    /// Albers conic for the contiguous US.
    #[must_use]
    pub fn albers_usa() -> Self {
        Self::new(ConicParams::USA, GeoDomain::CONTIGUOUS_US)
    }

    /// Fit the projection so the given points exactly fill the viewport.
    ///
    /// The limiting axis is filled edge to edge and the other is centered.
    /// Points outside the domain are ignored.
    #[must_use]
    pub fn fit(
        mut self,
        points: impl IntoIterator<Item = GeoCoord>,
        width: f64,
        height: f64,
    ) -> Self {
        self.raw_extent = ScreenBounds::from_points(
            points
                .into_iter()
                .filter(|c| self.domain.contains(*c))
                .map(|c| self.raw(c)),
        );
        self.refit(width, height);
        self
    }

    /// Re-fit the stored extent to a new viewport size.
    pub fn refit(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;

        let Some(extent) = self.raw_extent else {
            self.scale = 1.0;
            self.translate = ScreenPoint::default();
            return;
        };

        let kx = if extent.width() > 0.0 {
            width / extent.width()
        } else {
            f64::INFINITY
        };
        let ky = if extent.height() > 0.0 {
            height / extent.height()
        } else {
            f64::INFINITY
        };
        let k = kx.min(ky);
        self.scale = if k.is_finite() && k > 0.0 { k } else { 1.0 };

        self.translate = ScreenPoint::new(
            (width - self.scale * (extent.min.x + extent.max.x)) / 2.0,
            (height - self.scale * (extent.min.y + extent.max.y)) / 2.0,
        );
    }

    /// Project a coordinate to screen space.
    ///
    /// Returns `None` when the coordinate is outside the projectable domain.
    #[must_use]
    pub fn project(&self, coord: GeoCoord) -> Option<ScreenPoint> {
        if !self.domain.contains(coord) {
            return None;
        }
        let raw = self.raw(coord);
        Some(ScreenPoint::new(
            self.translate.x + self.scale * raw.x,
            self.translate.y + self.scale * raw.y,
        ))
    }

    /// Check that every boundary vertex and every city of a dataset projects.
    ///
    /// A region the projector cannot place has no clickable shape, so a game
    /// that draws it as the target could never move on.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::OutsideProjection`] for the first area or city
    /// outside the domain.
    pub fn check_dataset(&self, dataset: &Dataset) -> DatasetResult<()> {
        let outside = |id: &str, what: &str| DatasetError::OutsideProjection {
            id: id.to_string(),
            what: what.to_string(),
        };

        for region in dataset.regions() {
            if !region.boundary.iter().all(|c| self.domain.contains(*c)) {
                return Err(outside(&region.id, "boundary"));
            }
            if let Some((city, _)) = region
                .cities
                .iter()
                .find(|(_, coord)| !self.domain.contains(**coord))
            {
                return Err(outside(&region.id, city));
            }
        }
        for territory in dataset.territories() {
            if !territory.boundary.iter().all(|c| self.domain.contains(*c)) {
                return Err(outside(&territory.id, "boundary"));
            }
        }
        Ok(())
    }

    /// Project a boundary ring, dropping unprojectable vertices.
    #[must_use]
    pub fn project_ring(&self, ring: &[GeoCoord]) -> Vec<ScreenPoint> {
        ring.iter().filter_map(|c| self.project(*c)).collect()
    }

    /// Screen-space bounding box of a projected ring.
    #[must_use]
    pub fn bounds_of(&self, ring: &[GeoCoord]) -> Option<ScreenBounds> {
        ScreenBounds::from_points(ring.iter().filter_map(|c| self.project(*c)))
    }

    /// Viewport size the projector is fitted to.
    #[must_use]
    pub const fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Current projection scale (pixels per unit-sphere radian).
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Unit-scale projection with y flipped to point down.
    fn raw(&self, coord: GeoCoord) -> ScreenPoint {
        let phi = coord.lat.to_radians();
        let lambda = coord.lon.to_radians() - self.lambda0;
        let rho = (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n;
        let theta = self.n * lambda;
        ScreenPoint::new(rho * theta.sin(), -(self.rho0 - rho * theta.cos()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> Vec<GeoCoord> {
        vec![
            GeoCoord::new(-124.7, 48.4),
            GeoCoord::new(-67.0, 47.0),
            GeoCoord::new(-80.0, 25.0),
            GeoCoord::new(-117.0, 32.5),
        ]
    }

    fn dataset_with(extra: &str) -> Dataset {
        let json = format!(
            r#"{{ "regions": {{
                "CO": {{
                    "name": "Colorado", "capital": "Denver",
                    "boundary": [[-109.05, 41.0], [-102.05, 41.0], [-102.05, 37.0], [-109.05, 37.0]],
                    "cities": {{ "Denver": [-104.99, 39.74] }}
                }}{extra}
            }} }}"#
        );
        Dataset::from_json(&json).unwrap()
    }

    #[test]
    fn test_check_dataset_accepts_builtin() {
        let projector = GeoProjector::albers_usa();
        assert!(projector.check_dataset(&Dataset::builtin().unwrap()).is_ok());
        assert!(projector.check_dataset(&dataset_with("")).is_ok());
    }

    #[test]
    fn test_check_dataset_rejects_region_off_the_map() {
        let dataset = dataset_with(
            r#", "AK": {
                "name": "Alaska", "capital": "Juneau",
                "boundary": [[-168.0, 54.0], [-141.0, 54.0], [-141.0, 71.0], [-168.0, 71.0]],
                "cities": { "Juneau": [-134.42, 58.3] }
            }"#,
        );
        let err = GeoProjector::albers_usa().check_dataset(&dataset).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::OutsideProjection { ref id, ref what } if id == "AK" && what == "boundary"
        ));
    }

    #[test]
    fn test_check_dataset_rejects_city_off_the_map() {
        let dataset = dataset_with(
            r#", "KS": {
                "name": "Kansas", "capital": "Topeka",
                "boundary": [[-102.05, 40.0], [-94.6, 40.0], [-94.6, 37.0], [-102.05, 37.0]],
                "cities": { "Topeka": [-95.68, 39.05], "Honolulu": [-157.86, 21.31] }
            }"#,
        );
        let err = GeoProjector::albers_usa().check_dataset(&dataset).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::OutsideProjection { ref id, ref what } if id == "KS" && what == "Honolulu"
        ));
    }

    #[test]
    fn test_origin_projects_to_raw_zero() {
        let projector = GeoProjector::albers_usa();
        let p = projector.project(GeoCoord::new(-96.0, 38.7)).unwrap();
        assert!(p.x.abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn test_north_is_up_and_east_is_right() {
        let projector = GeoProjector::albers_usa().fit(corners(), 960.0, 600.0);
        let denver = projector.project(GeoCoord::new(-104.99, 39.74)).unwrap();
        let cheyenne = projector.project(GeoCoord::new(-104.82, 41.14)).unwrap();
        let topeka = projector.project(GeoCoord::new(-95.68, 39.05)).unwrap();

        assert!(cheyenne.y < denver.y);
        assert!(topeka.x > denver.x);
    }

    #[test]
    fn test_fit_fills_viewport() {
        let projector = GeoProjector::albers_usa().fit(corners(), 960.0, 600.0);
        let ring = corners();
        let bounds = projector.bounds_of(&ring).unwrap();

        // One axis fills exactly, the other fits inside and is centered
        let fills_x = (bounds.width() - 960.0).abs() < 1e-6;
        let fills_y = (bounds.height() - 600.0).abs() < 1e-6;
        assert!(fills_x || fills_y);
        assert!(bounds.min.x >= -1e-6 && bounds.max.x <= 960.0 + 1e-6);
        assert!(bounds.min.y >= -1e-6 && bounds.max.y <= 600.0 + 1e-6);
        let mid = bounds.midpoint();
        assert!((mid.x - 480.0).abs() < 1e-6);
        assert!((mid.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_outside_domain_is_none() {
        let projector = GeoProjector::albers_usa().fit(corners(), 960.0, 600.0);
        // Honolulu and London
        assert!(projector.project(GeoCoord::new(-157.86, 21.31)).is_none());
        assert!(projector.project(GeoCoord::new(-0.13, 51.51)).is_none());
        assert!(projector.project(GeoCoord::new(f64::NAN, 40.0)).is_none());
    }

    #[test]
    fn test_projection_is_deterministic_across_refit() {
        let mut projector = GeoProjector::albers_usa().fit(corners(), 960.0, 600.0);
        let denver = GeoCoord::new(-104.99, 39.74);
        let before = projector.project(denver).unwrap();

        projector.refit(400.0, 300.0);
        assert_ne!(projector.viewport(), (960.0, 600.0));
        projector.refit(960.0, 600.0);

        let after = projector.project(denver).unwrap();
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_fit_with_no_points_is_identity() {
        let projector = GeoProjector::albers_usa().fit(Vec::new(), 960.0, 600.0);
        assert!((projector.scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_project_ring_drops_outside_vertices() {
        let projector = GeoProjector::albers_usa().fit(corners(), 960.0, 600.0);
        let ring = [
            GeoCoord::new(-100.0, 40.0),
            GeoCoord::new(-157.0, 21.0),
            GeoCoord::new(-99.0, 41.0),
        ];
        assert_eq!(projector.project_ring(&ring).len(), 2);
    }
}
