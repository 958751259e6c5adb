#![forbid(unsafe_code)]

//! Animation primitives: the [`Animation`] trait, timed fades, delays,
//! spring physics, spring profiles, and staggered transitions.
//!
//! Every animation is driven by explicit `tick(dt)` calls from the host
//! loop; nothing here reads a clock.

pub mod profile;
pub mod spring;
pub mod stagger;

use std::time::Duration;

pub use profile::{AnimationType, SpringParams, select_spring_config};
pub use spring::Spring;
pub use stagger::{StaggeredTransition, StyleChannel, stagger_offsets};

/// Easing curve applied to normalized time.
pub type EasingFn = fn(f32) -> f32;

/// A time-driven animation producing a value in `[0.0, 1.0]`.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has finished.
    fn is_complete(&self) -> bool;

    /// Current normalized value.
    fn value(&self) -> f32;
}

/// Identity easing.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-out.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Linear progress over a fixed duration, shaped by an easing curve.
#[derive(Debug, Clone)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade lasting `duration`. Zero durations are clamped to 1ns.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: duration.max(Duration::from_nanos(1)),
            easing: linear,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Uneased progress in `[0.0, 1.0]`.
    #[must_use]
    pub fn raw_progress(&self) -> f32 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    /// Configured duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }
}

/// Holds an inner animation at its initial value until `delay` has passed.
#[derive(Debug, Clone)]
pub struct Delayed<A> {
    delay: Duration,
    waited: Duration,
    inner: A,
}

impl<A: Animation> Delayed<A> {
    /// Borrow the wrapped animation.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Wrap `inner` so it starts after `offset`.
#[must_use]
pub fn delay<A: Animation>(offset: Duration, inner: A) -> Delayed<A> {
    Delayed {
        delay: offset,
        waited: Duration::ZERO,
        inner,
    }
}

impl<A: Animation> Animation for Delayed<A> {
    fn tick(&mut self, dt: Duration) {
        let remaining = self.delay.saturating_sub(self.waited);
        if dt <= remaining {
            self.waited += dt;
            return;
        }
        self.waited = self.delay;
        self.inner.tick(dt - remaining);
    }

    fn is_complete(&self) -> bool {
        self.waited >= self.delay && self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        self.inner.value()
    }
}
