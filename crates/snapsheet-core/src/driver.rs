#![forbid(unsafe_code)]

//! Spring-driven height animation with run identity.
//!
//! Every call to [`AnimationDriver::animate_to`] starts a new run tagged with
//! a fresh [`RunId`]. Starting a run while another is in flight supersedes it
//! from the live position, so the panel never jumps. Only the current run
//! can ever report [`Settled`], which makes stale completions impossible
//! rather than merely unlikely.
//!
//! # Invariants
//!
//! 1. At most one run is active.
//! 2. `Settled` is reported exactly once per run that reaches rest, and
//!    never for a superseded or interrupted run.
//! 3. `translate_y == max_height - height` for every produced frame.
//! 4. Targets are clamped into the height range; carried velocity is
//!    clamped to ±2000 px/s.

use std::time::Duration;

use crate::animation::{AnimationType, Spring, SpringParams, select_spring_config};
use crate::geometry::HeightRange;

/// Largest release velocity (px/s) carried into a spring.
pub const MAX_CARRIED_VELOCITY: f64 = 2000.0;

/// Identity of one animation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u64);

impl RunId {
    /// Raw generation number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Height and vertical offset sampled from the same spring step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelFrame {
    /// Panel height in pixels.
    pub height: f64,
    /// Offset of the panel from the fully expanded position.
    pub translate_y: f64,
}

/// Completion of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settled {
    /// The run that completed.
    pub run: RunId,
    /// The exact resting height (the run's target).
    pub height: f64,
}

#[derive(Debug, Clone)]
struct Run {
    id: RunId,
    spring: Spring,
}

/// Drives the panel height toward targets with damped springs.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    range: HeightRange,
    height: f64,
    generation: u64,
    run: Option<Run>,
}

impl AnimationDriver {
    /// Create an idle driver resting at `initial_height`.
    #[must_use]
    pub fn new(range: HeightRange, initial_height: f64) -> Self {
        Self {
            range,
            height: initial_height,
            generation: 0,
            run: None,
        }
    }

    /// Animate to `target` with the profile chosen from the release velocity.
    ///
    /// `velocity_y` is in screen coordinates (negative = upward).
    pub fn animate_to(&mut self, target: f64, velocity_y: f64, animation: AnimationType) -> RunId {
        let params = select_spring_config(velocity_y, animation);
        self.animate_with(target, velocity_y, params)
    }

    /// Animate to `target` with fixed spring parameters.
    pub fn animate_with(&mut self, target: f64, velocity_y: f64, params: SpringParams) -> RunId {
        let target = self.range.clamp(target);
        let velocity = if velocity_y.is_finite() {
            (-velocity_y).clamp(-MAX_CARRIED_VELOCITY, MAX_CARRIED_VELOCITY)
        } else {
            0.0
        };

        self.generation += 1;
        let id = RunId(self.generation);
        if let Some(previous) = self.run.take() {
            tracing::debug!(
                target: "snapsheet.driver",
                superseded = %previous.id,
                by = %id,
                height = self.height,
                "run superseded"
            );
        }

        tracing::debug!(
            target: "snapsheet.driver",
            run = %id,
            from = self.height,
            to = target,
            velocity,
            stiffness = params.stiffness,
            damping = params.damping,
            "animation started"
        );

        self.run = Some(Run {
            id,
            spring: Spring::new(self.height, target)
                .with_params(params)
                .with_velocity(velocity),
        });
        id
    }

    /// Advance the active run. Returns its completion when it comes to rest
    /// during this tick.
    pub fn tick(&mut self, dt: Duration) -> Option<Settled> {
        let run = self.run.as_mut()?;
        run.spring.advance(dt);
        self.height = run.spring.position();
        if !run.spring.is_at_rest() {
            return None;
        }
        let settled = Settled {
            run: run.id,
            height: run.spring.target(),
        };
        self.height = settled.height;
        self.run = None;
        tracing::debug!(
            target: "snapsheet.driver",
            run = %settled.run,
            height = settled.height,
            "animation settled"
        );
        Some(settled)
    }

    /// Cancel the active run, returning the live height it stopped at.
    pub fn interrupt(&mut self) -> Option<f64> {
        let run = self.run.take()?;
        tracing::debug!(
            target: "snapsheet.driver",
            run = %run.id,
            height = self.height,
            "animation interrupted"
        );
        Some(self.height)
    }

    /// Set the height directly, cancelling any run. The height is clamped.
    pub fn jump_to(&mut self, height: f64) -> f64 {
        self.interrupt();
        self.height = self.range.clamp(height);
        self.height
    }

    /// Follow an external writer (a drag) without animating.
    pub fn track(&mut self, height: f64) {
        self.height = height;
    }

    /// Whether a run is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.run.is_some()
    }

    /// Target of the run in flight.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.run.as_ref().map(|r| r.spring.target())
    }

    /// Current height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Height and offset as last written by a run, a drag, or a jump.
    #[must_use]
    pub fn frame(&self) -> PanelFrame {
        PanelFrame {
            height: self.height,
            translate_y: self.range.max - self.height,
        }
    }
}
