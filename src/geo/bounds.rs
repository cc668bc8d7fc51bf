//! Screen-space points and bounding boxes.

/// A point in screen (map) space, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position, growing downward.
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenBounds {
    /// Create bounds from two corners.
    #[must_use]
    pub const fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = ScreenPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center of the box.
    #[must_use]
    pub fn midpoint(&self) -> ScreenPoint {
        ScreenPoint::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Check whether a point lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bounds = ScreenBounds::from_points([
            ScreenPoint::new(3.0, 4.0),
            ScreenPoint::new(-1.0, 10.0),
            ScreenPoint::new(5.0, 2.0),
        ])
        .unwrap();

        assert_eq!(bounds.min, ScreenPoint::new(-1.0, 2.0));
        assert_eq!(bounds.max, ScreenPoint::new(5.0, 10.0));
        assert!((bounds.width() - 6.0).abs() < 1e-12);
        assert!((bounds.height() - 8.0).abs() < 1e-12);
        assert_eq!(bounds.midpoint(), ScreenPoint::new(2.0, 6.0));
    }

    #[test]
    fn test_from_no_points() {
        assert!(ScreenBounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_contains_edges() {
        let bounds = ScreenBounds::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(2.0, 2.0));
        assert!(bounds.contains(ScreenPoint::new(0.0, 2.0)));
        assert!(bounds.contains(ScreenPoint::new(1.0, 1.0)));
        assert!(!bounds.contains(ScreenPoint::new(2.1, 1.0)));
    }

    #[test]
    fn test_distance() {
        let a = ScreenPoint::new(0.0, 0.0);
        let b = ScreenPoint::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }
}
