//! Camera state: pan, zoom, and animated fits.
//!
//! User input and programmatic moves share one transform. The last write
//! wins: any new command interrupts an in-flight animation, starting from
//! wherever that animation had reached.

mod animation;
mod transform;

pub use animation::{ease_cubic_in_out, progress, Animation};
pub use transform::{FitOptions, ScaleExtent, Transform};

use std::time::Duration;

use tracing::debug;

use crate::geo::{ScreenBounds, ScreenPoint};

/// The viewport's pan/zoom state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    settled: Transform,
    animation: Option<Animation>,
    width: f64,
    height: f64,
    user_extent: ScaleExtent,
    fit_options: FitOptions,
}

impl ViewportTransform {
    /// Create an identity viewport of the given size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            settled: Transform::IDENTITY,
            animation: None,
            width,
            height,
            user_extent: ScaleExtent::USER,
            fit_options: FitOptions::default(),
        }
    }

    /// Override the scale range reachable by user zoom.
    #[must_use]
    pub fn with_user_extent(mut self, extent: ScaleExtent) -> Self {
        self.user_extent = extent;
        self
    }

    /// Override how region fits are computed.
    #[must_use]
    pub fn with_fit_options(mut self, options: FitOptions) -> Self {
        self.fit_options = options;
        self
    }

    /// Viewport size.
    #[must_use]
    pub const fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Change the viewport size; the transform is kept.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Transform in effect at `now`, mid-animation included.
    #[must_use]
    pub fn transform_at(&self, now: Duration) -> Transform {
        match &self.animation {
            Some(anim) => anim.value_at(now),
            None => self.settled,
        }
    }

    /// Scale in effect at `now`; marker sizes divide by this.
    #[must_use]
    pub fn scale_at(&self, now: Duration) -> f64 {
        self.transform_at(now).k
    }

    /// Whether a camera move is still running at `now`.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.animation.is_some_and(|a| !a.is_done(now))
    }

    /// Transform that fits `bounds` into this viewport.
    #[must_use]
    pub fn fit(&self, bounds: &ScreenBounds) -> Transform {
        Transform::fit(bounds, self.width, self.height, self.fit_options)
    }

    /// Start animating toward `target`, interrupting any running move.
    pub fn animate_to(&mut self, target: Transform, duration: Duration, now: Duration) {
        let from = self.interrupt(now);
        if duration.is_zero() {
            self.settled = target;
            return;
        }
        self.animation = Some(Animation {
            from,
            to: target,
            start: now,
            duration,
        });
    }

    /// Fit `bounds` and animate there. Returns the target transform.
    pub fn fit_to(&mut self, bounds: &ScreenBounds, duration: Duration, now: Duration) -> Transform {
        let target = self.fit(bounds);
        debug!(k = target.k, x = target.x, y = target.y, "camera fit");
        self.animate_to(target, duration, now);
        target
    }

    /// Animate back to the identity transform.
    pub fn reset(&mut self, duration: Duration, now: Duration) {
        self.animate_to(Transform::IDENTITY, duration, now);
    }

    /// User zoom around a screen point.
    pub fn zoom_by(&mut self, factor: f64, anchor: ScreenPoint, now: Duration) {
        let current = self.interrupt(now);
        self.settled = current.zoomed(factor, anchor, self.user_extent);
    }

    /// User pan by a screen-space offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64, now: Duration) {
        let current = self.interrupt(now);
        self.settled = current.panned(dx, dy);
    }

    /// Drop a finished animation, keeping its final value.
    pub fn tick(&mut self, now: Duration) {
        if let Some(anim) = self.animation
            && anim.is_done(now)
        {
            self.settled = anim.to;
            self.animation = None;
        }
    }

    /// Map space to screen space at `now`.
    #[must_use]
    pub fn apply(&self, p: ScreenPoint, now: Duration) -> ScreenPoint {
        self.transform_at(now).apply(p)
    }

    /// Screen space to map space at `now`.
    #[must_use]
    pub fn invert(&self, p: ScreenPoint, now: Duration) -> ScreenPoint {
        self.transform_at(now).invert(p)
    }

    /// Stop any running animation where it is and return that value.
    fn interrupt(&mut self, now: Duration) -> Transform {
        let current = self.transform_at(now);
        if self.animation.take().is_some() {
            debug!("camera animation interrupted");
        }
        self.settled = current;
        current
    }
}
