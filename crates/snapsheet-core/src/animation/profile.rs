#![forbid(unsafe_code)]

//! Named spring profiles and velocity-adaptive selection.
//!
//! The profile table is constant. [`select_spring_config`] picks parameters
//! for a release: very fast releases get a bouncier version of the requested
//! profile, very slow releases a smoother one, and everything in between
//! uses [`AnimationType::Snappy`] unmodified.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Releases faster than this (px/s) lower damping.
pub const FAST_RELEASE_VELOCITY: f64 = 1000.0;

/// Releases slower than this (px/s) raise damping.
pub const SLOW_RELEASE_VELOCITY: f64 = 100.0;

const FAST_DAMPING_SCALE: f64 = 0.8;
const SLOW_DAMPING_SCALE: f64 = 1.2;

/// Physical parameters of a damped spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    /// Velocity drag coefficient.
    pub damping: f64,
    /// Restoring force strength.
    pub stiffness: f64,
    /// Moving mass.
    pub mass: f64,
}

impl SpringParams {
    /// Create a parameter set.
    #[must_use]
    pub const fn new(damping: f64, stiffness: f64, mass: f64) -> Self {
        Self {
            damping,
            stiffness,
            mass,
        }
    }

    /// Damping coefficient at which this spring stops oscillating.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Damping ratio (1.0 = critically damped).
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    /// Copy with damping multiplied by `scale`.
    #[must_use]
    pub fn scale_damping(self, scale: f64) -> Self {
        Self {
            damping: self.damping * scale,
            ..self
        }
    }
}

/// Named motion profile for panel animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum AnimationType {
    /// Soft and slow.
    Gentle,
    /// Quick with a hint of overshoot.
    #[default]
    Snappy,
    /// Visible overshoot before settling.
    Bouncy,
    /// Overdamped; no overshoot.
    Smooth,
}

impl AnimationType {
    /// All profiles in table order.
    pub const ALL: [Self; 4] = [Self::Gentle, Self::Snappy, Self::Bouncy, Self::Smooth];

    /// Spring parameters for this profile.
    #[must_use]
    pub const fn params(self) -> SpringParams {
        match self {
            Self::Gentle => SpringParams::new(20.0, 120.0, 1.0),
            Self::Snappy => SpringParams::new(28.0, 300.0, 1.0),
            Self::Bouncy => SpringParams::new(12.0, 280.0, 1.0),
            Self::Smooth => SpringParams::new(30.0, 150.0, 1.0),
        }
    }

    /// Lowercase profile name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gentle => "gentle",
            Self::Snappy => "snappy",
            Self::Bouncy => "bouncy",
            Self::Smooth => "smooth",
        }
    }
}

impl std::fmt::Display for AnimationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick spring parameters for a release at `velocity` (px/s, any sign).
#[must_use]
pub fn select_spring_config(velocity: f64, animation_type: AnimationType) -> SpringParams {
    let speed = velocity.abs();
    if speed > FAST_RELEASE_VELOCITY {
        animation_type.params().scale_damping(FAST_DAMPING_SCALE)
    } else if speed < SLOW_RELEASE_VELOCITY {
        animation_type.params().scale_damping(SLOW_DAMPING_SCALE)
    } else {
        AnimationType::Snappy.params()
    }
}
