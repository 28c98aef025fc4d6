//! The live pixels-per-hour value every coordinate transform reads.

use timegrid_protocol::TimelineConfig;

use crate::observe::{Observable, SubscriberId};

/// An in-flight interpolation toward a target scale.
#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    to: f64,
    started_at_ms: f64,
    duration_ms: f64,
}

impl Animation {
    /// Interpolated value at `now_ms`, eased, clamped to the endpoint.
    fn value_at(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let t = ((now_ms - self.started_at_ms) / self.duration_ms).clamp(0.0, 1.0);
        // Smoothstep: gentle in and out, like the host framework's
        // default timing curve.
        let eased = t * t * (3.0 - 2.0 * t);
        self.from + (self.to - self.from) * eased
    }

    fn finished(&self, now_ms: f64) -> bool {
        now_ms - self.started_at_ms >= self.duration_ms
    }
}

/// The vertical zoom factor, pixels per hour.
///
/// Owned by the gesture/zoom subsystem — the single writer. Layout code
/// only ever reads it. Two mutation paths exist: `set_immediate` during
/// an active pinch (no latency, cancels any animation) and `animate_to`
/// for discrete transitions, advanced by the host calling `tick` once
/// per display frame. Retargeting an animation restarts from the live
/// interpolated value, never from the original start, so there is no
/// visual discontinuity.
pub struct TimeScale {
    value: Observable<f64>,
    min: f64,
    max: f64,
    animation: Option<Animation>,
}

impl TimeScale {
    pub fn new(config: &TimelineConfig) -> Self {
        let min = config.min_pixels_per_hour;
        let max = config.max_pixels_per_hour.max(min);
        Self {
            value: Observable::new(config.initial_pixels_per_hour.clamp(min, max)),
            min,
            max,
            animation: None,
        }
    }

    /// Current pixels-per-hour factor.
    pub fn current(&self) -> f64 {
        *self.value.get()
    }

    /// Version counter of the underlying cell; bumped on every
    /// effective change, including each animation step.
    pub fn version(&self) -> u64 {
        self.value.version()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Apply a pinch-gesture value with no animation latency. Cancels
    /// any in-flight animation outright; the immediate value wins.
    pub fn set_immediate(&mut self, pixels_per_hour: f64) {
        self.animation = None;
        if pixels_per_hour.is_finite() {
            self.value.set(pixels_per_hour.clamp(self.min, self.max));
        }
    }

    /// Start an animated transition toward `target`. A newer call
    /// supersedes an in-flight one, starting from whatever value is
    /// currently showing.
    pub fn animate_to(&mut self, target: f64, duration_ms: u64, now_ms: f64) {
        if !target.is_finite() {
            return;
        }
        let to = target.clamp(self.min, self.max);
        if duration_ms == 0 {
            self.set_immediate(to);
            return;
        }
        self.animation = Some(Animation {
            from: self.current(),
            to,
            started_at_ms: now_ms,
            duration_ms: duration_ms as f64,
        });
    }

    /// Advance the in-flight animation, if any. Called by the host UI
    /// loop once per frame; returns `true` when the value changed so
    /// the host knows a re-derivation is due.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let next = anim.value_at(now_ms);
        if anim.finished(now_ms) {
            self.animation = None;
        }
        self.value.set(next)
    }

    pub fn subscribe(&mut self, f: impl FnMut(&f64) + 'static) -> SubscriberId {
        self.value.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.value.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> TimeScale {
        TimeScale::new(&TimelineConfig::default())
    }

    #[test]
    fn initial_value_is_clamped_to_bounds() {
        let config = TimelineConfig {
            initial_pixels_per_hour: 500.0,
            ..TimelineConfig::default()
        };
        let s = TimeScale::new(&config);
        assert_eq!(s.current(), config.max_pixels_per_hour);
    }

    #[test]
    fn set_immediate_applies_without_tick() {
        let mut s = scale();
        s.set_immediate(80.0);
        assert_eq!(s.current(), 80.0);
        assert!(!s.is_animating());
    }

    #[test]
    fn set_immediate_ignores_non_finite() {
        let mut s = scale();
        let before = s.current();
        s.set_immediate(f64::NAN);
        assert_eq!(s.current(), before);
    }

    #[test]
    fn animation_reaches_target_and_stops() {
        let mut s = scale();
        s.animate_to(100.0, 200, 0.0);
        assert!(s.is_animating());

        assert!(s.tick(100.0));
        let midway = s.current();
        assert!(midway > 60.0 && midway < 100.0, "midway={midway}");

        assert!(s.tick(200.0));
        assert_eq!(s.current(), 100.0);
        assert!(!s.is_animating());
        // Ticking after completion changes nothing.
        assert!(!s.tick(300.0));
    }

    #[test]
    fn set_immediate_cancels_animation_with_no_residual_interpolation() {
        let mut s = scale();
        s.animate_to(100.0, 200, 0.0);
        s.tick(50.0);
        s.set_immediate(45.0);
        assert_eq!(s.current(), 45.0);
        // No residual drift toward the abandoned target.
        assert!(!s.tick(150.0));
        assert_eq!(s.current(), 45.0);
    }

    #[test]
    fn retarget_starts_from_live_value() {
        let mut s = scale();
        s.animate_to(120.0, 200, 0.0);
        s.tick(100.0);
        let live = s.current();

        s.animate_to(30.0, 200, 100.0);
        // Immediately after retargeting, the value is still the live one.
        s.tick(100.0);
        assert!((s.current() - live).abs() < 1e-9);

        s.tick(300.0);
        assert_eq!(s.current(), 30.0);
    }

    #[test]
    fn zero_duration_animation_is_immediate() {
        let mut s = scale();
        s.animate_to(90.0, 0, 0.0);
        assert_eq!(s.current(), 90.0);
        assert!(!s.is_animating());
    }

    #[test]
    fn version_advances_with_each_step() {
        let mut s = scale();
        let v0 = s.version();
        s.animate_to(100.0, 100, 0.0);
        s.tick(50.0);
        s.tick(100.0);
        assert!(s.version() >= v0 + 2);
    }
}
