//! Time-based interpolation between transforms.

use std::time::Duration;

use crate::viewport::Transform;

/// Cubic ease-in-out on `t` in `[0, 1]`.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Fraction of `duration` elapsed at `now`, clamped to `[0, 1]`.
#[must_use]
pub fn progress(start: Duration, duration: Duration, now: Duration) -> f64 {
    if duration.is_zero() {
        return if now >= start { 1.0 } else { 0.0 };
    }
    let elapsed = now.saturating_sub(start).as_secs_f64();
    (elapsed / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// An in-flight camera move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    /// Transform at `start`.
    pub from: Transform,
    /// Transform once finished.
    pub to: Transform,
    /// When the move began.
    pub start: Duration,
    /// How long the move takes.
    pub duration: Duration,
}

impl Animation {
    /// Interpolated transform at `now`.
    #[must_use]
    pub fn value_at(&self, now: Duration) -> Transform {
        let t = ease_cubic_in_out(progress(self.start, self.duration, now));
        self.from.lerp(&self.to, t)
    }

    /// Whether the move has finished at `now`.
    #[must_use]
    pub fn is_done(&self, now: Duration) -> bool {
        now >= self.start + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints_and_midpoint() {
        assert!(ease_cubic_in_out(0.0).abs() < 1e-12);
        assert!((ease_cubic_in_out(1.0) - 1.0).abs() < 1e-12);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_easing_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = ease_cubic_in_out(f64::from(i) / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_progress() {
        let start = Duration::from_millis(100);
        let dur = Duration::from_millis(1000);
        assert!(progress(start, dur, Duration::from_millis(50)).abs() < 1e-12);
        assert!((progress(start, dur, Duration::from_millis(600)) - 0.5).abs() < 1e-12);
        assert!((progress(start, dur, Duration::from_millis(5000)) - 1.0).abs() < 1e-12);
        assert!((progress(start, Duration::ZERO, start) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_animation_value_tracks_time() {
        let anim = Animation {
            from: Transform::IDENTITY,
            to: Transform::new(-400.0, -200.0, 5.0),
            start: Duration::ZERO,
            duration: Duration::from_millis(1000),
        };

        assert_eq!(anim.value_at(Duration::ZERO), Transform::IDENTITY);
        let mid = anim.value_at(Duration::from_millis(500));
        assert!((mid.k - 3.0).abs() < 1e-9);
        assert!(!anim.is_done(Duration::from_millis(999)));
        assert!(anim.is_done(Duration::from_millis(1000)));
        assert!(anim
            .value_at(Duration::from_millis(1000))
            .approx_eq(&anim.to, 1e-12));
    }
}
