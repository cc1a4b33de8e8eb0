//! Eased Transform Animation
//!
//! At most one animation is in flight at any time. It interpolates the
//! transform toward a pre-clamped target over a fixed duration with a
//! quartic ease-out, and is cancelled in place by any user input or new
//! programmatic move.

use std::time::Instant;

use crate::transform::Transform;

/// Quartic ease-out: `1 - (1 - p)^4`.
#[must_use]
pub fn ease_out_quart(p: f32) -> f32 {
    let q = 1.0 - p;
    1.0 - q * q * q * q
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// An in-flight ease toward a target transform.
#[derive(Debug, Clone)]
pub struct TransformAnimation {
    start: Instant,
    duration_ms: f32,
    from: Transform,
    to: Transform,
}

impl TransformAnimation {
    /// Starts an animation. The target must already be constrained.
    #[must_use]
    pub fn new(from: Transform, to: Transform, duration_ms: f32) -> Self {
        Self {
            start: Instant::now(),
            duration_ms,
            from,
            to,
        }
    }

    /// The (pre-clamped) target transform.
    #[must_use]
    pub fn target(&self) -> Transform {
        self.to
    }

    /// Samples the animation at `now`.
    ///
    /// Returns the interpolated transform and whether the animation finished.
    /// A zero or negative duration finishes immediately at the target.
    #[must_use]
    pub fn sample(&self, now: Instant) -> (Transform, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let elapsed_ms = now.duration_since(self.start).as_secs_f32() * 1000.0;
        let progress = (elapsed_ms / self.duration_ms).min(1.0);
        if progress >= 1.0 {
            return (self.to, true);
        }
        let eased = ease_out_quart(progress);
        let transform = Transform {
            scale: lerp(self.from.scale, self.to.scale, eased),
            tx: lerp(self.from.tx, self.to.tx, eased),
            ty: lerp(self.from.ty, self.to.ty, eased),
        };
        (transform, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn ease_endpoints() {
        assert!((ease_out_quart(0.0) - 0.0).abs() < 1e-6);
        assert!((ease_out_quart(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ease_is_monotone() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let value = ease_out_quart(i as f32 / 100.0);
            assert!(value >= prev);
            prev = value;
        }
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let from = Transform::centered(1.0);
        let to = Transform::centered(2.0);
        let anim = TransformAnimation::new(from, to, 0.0);
        let (transform, done) = anim.sample(Instant::now());
        assert!(done);
        assert_eq!(transform, to);
    }

    #[test]
    fn finishes_exactly_at_target() {
        let from = Transform::new(1.0, 0.0, 0.0);
        let to = Transform::new(2.0, 10.0, -5.0);
        let anim = TransformAnimation::new(from, to, 1.0);
        let (transform, done) = anim.sample(Instant::now() + Duration::from_millis(50));
        assert!(done);
        assert_eq!(transform, to);
    }
}
