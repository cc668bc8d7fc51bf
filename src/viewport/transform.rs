//! Pan/zoom transforms and bounding-box fitting.

use serde::{Deserialize, Serialize};

use crate::geo::{ScreenBounds, ScreenPoint};

/// Allowed range for the zoom scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleExtent {
    /// Smallest scale.
    pub min: f64,
    /// Largest scale.
    pub max: f64,
}

impl ScaleExtent {
    /// Range used when the camera fits a region.
    pub const FIT: Self = Self { min: 1.0, max: 10.0 };
    /// Range reachable by scrolling and dragging.
    pub const USER: Self = Self { min: 1.0, max: 15.0 };

    /// Clamp a scale into the range.
    #[must_use]
    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }
}

/// How much of the viewport a fitted box should occupy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Fraction of the limiting viewport dimension the box fills.
    pub fill: f64,
    /// Scale clamp applied to the result.
    pub extent: ScaleExtent,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            fill: 0.7,
            extent: ScaleExtent::FIT,
        }
    }
}

/// A uniform scale followed by a translation: `screen = t + k * map`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
    /// Scale factor.
    pub k: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No pan, no zoom.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    /// Create a transform from translation and scale.
    #[must_use]
    pub const fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Compute the transform that centers `bounds` in the viewport.
    ///
    /// `scale = clamp(fill / max(bw / vw, bh / vh))` and the box midpoint
    /// lands on the viewport center. A zero-size box gets the largest scale;
    /// an empty viewport gets the identity.
    #[must_use]
    pub fn fit(bounds: &ScreenBounds, width: f64, height: f64, options: FitOptions) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::IDENTITY;
        }

        let ratio = (bounds.width() / width).max(bounds.height() / height);
        let k = if ratio > 0.0 {
            options.extent.clamp(options.fill / ratio)
        } else {
            options.extent.max
        };

        let mid = bounds.midpoint();
        Self::new(width / 2.0 - k * mid.x, height / 2.0 - k * mid.y, k)
    }

    /// Map space to screen space.
    #[must_use]
    pub fn apply(&self, p: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.x + self.k * p.x, self.y + self.k * p.y)
    }

    /// Screen space back to map space.
    #[must_use]
    pub fn invert(&self, p: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Rescale around a fixed screen point, clamping to `extent`.
    #[must_use]
    pub fn zoomed(&self, factor: f64, anchor: ScreenPoint, extent: ScaleExtent) -> Self {
        let k = extent.clamp(self.k * factor);
        let fixed = self.invert(anchor);
        Self::new(anchor.x - k * fixed.x, anchor.y - k * fixed.y, k)
    }

    /// Shift by a screen-space offset.
    #[must_use]
    pub fn panned(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.k)
    }

    /// Component-wise interpolation; `t` is not clamped.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.k + (other.k - self.k) * t,
        )
    }

    /// Equality within a tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.k - other.k).abs() <= eps
    }
}
