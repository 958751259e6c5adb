#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) over panel heights.
//!
//! Based on the classical damped spring equation with mass:
//!
//!   m·a = -stiffness × (position - target) - damping × velocity
//!
//! Positions are pixels, velocities pixels per second.
//!
//! # Integration
//!
//! Semi-implicit Euler. `advance()` accepts a `Duration` and subdivides it
//! into steps of at most 4ms so high-stiffness profiles stay stable even
//! when the host drops frames.
//!
//! # Invariants
//!
//! 1. Stiffness and mass are always positive; damping is never negative.
//! 2. A spring at rest does not move.
//! 3. On reaching rest the position snaps exactly to the target and the
//!    velocity to zero.
//!
//! # Failure Modes
//!
//! - Zero damping never settles. Every [`AnimationType`] profile carries
//!   positive damping, so the driver never builds such a spring.
//!
//! [`AnimationType`]: super::AnimationType

use std::time::Duration;

use super::SpringParams;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta (px) below which the spring may come to rest.
const REST_THRESHOLD: f64 = 0.1;

/// Speed (px/s) below which the spring may come to rest.
const VELOCITY_THRESHOLD: f64 = 1.0;

const MIN_STIFFNESS: f64 = 0.1;
const MIN_MASS: f64 = 0.01;

/// A damped spring moving a single height value toward a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    params: SpringParams,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `initial` heading to `target` using the snappy
    /// profile's parameters.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            params: SpringParams::new(28.0, 300.0, 1.0),
            at_rest: false,
        }
    }

    /// Apply a parameter set (builder pattern). Stiffness and mass are
    /// clamped to small positive minimums, damping to zero.
    #[must_use]
    pub fn with_params(mut self, params: SpringParams) -> Self {
        self.params = SpringParams::new(
            params.damping.max(0.0),
            params.stiffness.max(MIN_STIFFNESS),
            params.mass.max(MIN_MASS),
        );
        self
    }

    /// Set the starting velocity in px/s (builder pattern).
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    fn step(&mut self, dt: f64) {
        let SpringParams {
            damping,
            stiffness,
            mass,
        } = self.params;
        let acceleration =
            (-stiffness * (self.position - self.target) - damping * self.velocity) / mass;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        if (self.position - self.target).abs() < REST_THRESHOLD
            && self.velocity.abs() < VELOCITY_THRESHOLD
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
