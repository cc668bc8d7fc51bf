//! Point-in-region hit testing.

use crate::dataset::{Dataset, RegionId};
use crate::geo::{GeoProjector, ScreenBounds, ScreenPoint};

/// A projected, clickable area.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Region or territory id.
    pub id: RegionId,
    /// Whether this is a playable region (as opposed to a territory).
    pub playable: bool,
    /// Projected boundary ring in map space.
    pub ring: Vec<ScreenPoint>,
    /// Bounding box of `ring`, checked before the full polygon test.
    pub bounds: ScreenBounds,
}

/// Resolves map-space points to the region under them.
///
/// Shapes live in map space (before the viewport transform), so callers
/// invert the current transform before asking.
#[derive(Debug, Clone, Default)]
pub struct HitTester {
    shapes: Vec<Shape>,
}

impl HitTester {
    /// Project every region and territory of a dataset.
    ///
    /// Areas whose ring projects to fewer than three points are skipped.
    #[must_use]
    pub fn build(dataset: &Dataset, projector: &GeoProjector) -> Self {
        let regions = dataset
            .regions()
            .iter()
            .map(|r| (&r.id, true, r.boundary.as_slice()));
        let territories = dataset
            .territories()
            .iter()
            .map(|t| (&t.id, false, t.boundary.as_slice()));

        let shapes = regions
            .chain(territories)
            .filter_map(|(id, playable, boundary)| {
                let ring = projector.project_ring(boundary);
                if ring.len() < 3 {
                    return None;
                }
                let bounds = ScreenBounds::from_points(ring.iter().copied())?;
                Some(Shape {
                    id: id.clone(),
                    playable,
                    ring,
                    bounds,
                })
            })
            .collect();

        Self { shapes }
    }

    /// All projected shapes, regions first.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Projected shape for an id.
    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// The region or territory containing a map-space point.
    ///
    /// Regions win over territories when both contain the point.
    #[must_use]
    pub fn region_at(&self, p: ScreenPoint) -> Option<&str> {
        self.shapes
            .iter()
            .filter(|s| s.bounds.contains(p))
            .find(|s| point_in_polygon(p, &s.ring))
            .map(|s| s.id.as_str())
    }
}

/// Even-odd rule point-in-polygon test.
///
/// The ring is treated as closed; repeating the first vertex is optional.
#[must_use]
pub fn point_in_polygon(p: ScreenPoint, ring: &[ScreenPoint]) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for (i, a) in ring.iter().enumerate() {
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
