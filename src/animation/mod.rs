use std::time::Duration;

use keyframe::functions::{EaseInCubic, EaseInQuad, EaseOutCubic, EaseOutQuad};
use keyframe::EasingFunction;

mod clock;
pub use clock::Clock;

mod scalar;
pub use scalar::{AnimatedScalar, AnimationOutcome, RequestId};

mod spring;
pub use spring::{Spring, SpringParams};

/// A single value moving from `from` to `to` over time.
#[derive(Debug, Clone)]
pub struct Animation {
    from: f64,
    to: f64,
    duration: Duration,
    start_time: Duration,
    clock: Clock,
    kind: Kind,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Easing { curve: Curve },
    Spring(Spring),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear,
    EaseInQuad,
    EaseInCubic,
    EaseOutQuad,
    EaseOutCubic,
}

impl Animation {
    /// Creates an animation according to the configured timing or spring parameters.
    pub fn new(
        clock: Clock,
        from: f64,
        to: f64,
        initial_velocity: f64,
        config: bakesale_config::Animation,
    ) -> Self {
        if config.off {
            return Self::ease(clock, from, to, 0, Curve::Linear);
        }

        // Keep the release velocity meaningful under slowdown.
        let initial_velocity = initial_velocity / clock.rate().max(0.001);

        match config.kind {
            bakesale_config::animations::Kind::Easing(p) => Self::ease(
                clock,
                from,
                to,
                u64::from(p.duration_ms),
                Curve::from(p.curve),
            ),
            bakesale_config::animations::Kind::Spring(p) => {
                let spring = Spring {
                    from,
                    to,
                    initial_velocity,
                    params: SpringParams::from(p),
                };
                Self::spring(clock, spring)
            }
        }
    }

    /// Creates an easing animation; easing curves start from rest.
    pub fn ease(clock: Clock, from: f64, to: f64, duration_ms: u64, curve: Curve) -> Self {
        Self {
            from,
            to,
            duration: Duration::from_millis(duration_ms),
            start_time: clock.now(),
            clock,
            kind: Kind::Easing { curve },
        }
    }

    pub fn spring(clock: Clock, spring: Spring) -> Self {
        let _span = tracy_client::span!("Animation::spring");

        Self {
            from: spring.from,
            to: spring.to,
            duration: spring.duration(),
            start_time: clock.now(),
            clock,
            kind: Kind::Spring(spring),
        }
    }

    pub fn is_done(&self) -> bool {
        if self.clock.should_complete_instantly() {
            return true;
        }

        self.clock.now() >= self.end_time()
    }

    pub fn value_at(&self, at: Duration) -> f64 {
        if at <= self.start_time {
            // Within the frame an animation was started in, it hasn't moved yet.
            return self.from;
        } else if self.end_time() <= at || self.clock.should_complete_instantly() {
            return self.to;
        }

        let passed = at - self.start_time;

        match self.kind {
            Kind::Easing { curve } => {
                let x = (passed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0., 1.);
                curve.y(x) * (self.to - self.from) + self.from
            }
            Kind::Spring(spring) => {
                let value = spring.value_at(passed);

                // Keep numerical blowups of stiff springs within a sane range.
                let range = (self.to - self.from).abs().max(1.) * 10.;
                let (lo, hi) = (self.from.min(self.to), self.from.max(self.to));
                value.clamp(lo - range, hi + range)
            }
        }
    }

    pub fn value(&self) -> f64 {
        self.value_at(self.clock.now())
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn end_time(&self) -> Duration {
        self.start_time.saturating_add(self.duration)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_spring(&self) -> bool {
        matches!(self.kind, Kind::Spring(_))
    }
}

impl Curve {
    pub fn y(self, x: f64) -> f64 {
        match self {
            Curve::Linear => x,
            Curve::EaseInQuad => EaseInQuad.y(x),
            Curve::EaseInCubic => EaseInCubic.y(x),
            Curve::EaseOutQuad => EaseOutQuad.y(x),
            Curve::EaseOutCubic => EaseOutCubic.y(x),
        }
    }
}

impl From<bakesale_config::animations::Curve> for Curve {
    fn from(value: bakesale_config::animations::Curve) -> Self {
        match value {
            bakesale_config::animations::Curve::Linear => Curve::Linear,
            bakesale_config::animations::Curve::EaseInQuad => Curve::EaseInQuad,
            bakesale_config::animations::Curve::EaseInCubic => Curve::EaseInCubic,
            bakesale_config::animations::Curve::EaseOutQuad => Curve::EaseOutQuad,
            bakesale_config::animations::Curve::EaseOutCubic => Curve::EaseOutCubic,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use bakesale_config::animations::{EasingParams, Kind as ConfigKind};

    use super::*;

    fn easing(
        duration_ms: u32,
        curve: bakesale_config::animations::Curve,
    ) -> bakesale_config::Animation {
        bakesale_config::Animation {
            off: false,
            kind: ConfigKind::Easing(EasingParams { duration_ms, curve }),
        }
    }

    #[test]
    fn ease_in_starts_slow() {
        let mut clock = Clock::with_time(Duration::ZERO);
        let anim = Animation::new(
            clock.clone(),
            0.,
            400.,
            0.,
            easing(250, bakesale_config::animations::Curve::EaseInCubic),
        );

        clock.set_unadjusted(Duration::from_millis(125));
        // Halfway through in time, an ease-in curve has covered well under half the distance.
        assert!(anim.value() < 100.);
        assert!(!anim.is_done());

        clock.set_unadjusted(Duration::from_millis(250));
        assert_abs_diff_eq!(anim.value(), 400.);
        assert!(anim.is_done());
    }

    #[test]
    fn value_holds_at_start_within_same_frame() {
        let clock = Clock::with_time(Duration::from_secs(3));
        let anim = Animation::new(
            clock,
            -400.,
            0.,
            0.,
            bakesale_config::animations::CarouselEntryAnim::default().0,
        );
        assert!(anim.is_spring());
        assert_abs_diff_eq!(anim.value(), -400.);
    }

    #[test]
    fn off_completes_on_first_frame() {
        let mut clock = Clock::with_time(Duration::ZERO);
        let anim = Animation::new(
            clock.clone(),
            0.,
            1.,
            0.,
            bakesale_config::Animation::new_off(),
        );
        assert_eq!(anim.duration(), Duration::ZERO);
        assert!(anim.is_done());

        clock.set_unadjusted(Duration::from_millis(1));
        assert_abs_diff_eq!(anim.value(), 1.);
    }

    #[test]
    fn complete_instantly_jumps_to_target() {
        let mut clock = Clock::with_time(Duration::ZERO);
        let anim = Animation::ease(clock.clone(), 0., 10., 1000, Curve::Linear);
        clock.set_unadjusted(Duration::from_millis(1));
        clock.set_complete_instantly(true);
        assert!(anim.is_done());
        assert_abs_diff_eq!(anim.value(), 10.);
    }
}
