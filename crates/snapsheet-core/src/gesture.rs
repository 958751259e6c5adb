#![forbid(unsafe_code)]

//! Drag gesture coordination.
//!
//! [`GestureCoordinator`] turns a stream of [`DragEvent`]s into panel heights
//! while a finger is down, and into a single [`Release`] decision when it
//! lifts.
//!
//! # State Machine
//!
//! ```text
//! Idle ──start──▶ Dragging ──end──▶ Snapping ──settle──▶ Idle
//!                    │
//!                    └──end (beyond bounds)──▶ RubberBandRecovering ──settle──▶ Idle
//! ```
//!
//! # Invariants
//!
//! 1. `on_drag_update` and `on_drag_end` outside a drag are ignored.
//! 2. A start while already dragging is ignored.
//! 3. Each drag produces exactly one [`Release`].
//! 4. `is_over_dragging` is true exactly when the raw, undamped height lies
//!    outside the bounds.
//! 5. Updates with a non-finite translation are dropped, so the tracked
//!    height is always finite.
//!
//! # Failure Modes
//!
//! - If the host loses focus mid-drag it calls [`GestureCoordinator::cancel`],
//!   which releases with zero velocity.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::config::SheetConfig;
use crate::geometry::{HeightRange, rubber_band};
use crate::snap::{SnapPointSet, SnapResolver};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Phase of a raw drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum DragPhase {
    /// Finger down.
    Start,
    /// Finger moved.
    Update,
    /// Finger lifted.
    End,
    /// Gesture cancelled by the host.
    Cancel,
}

/// A raw drag event in screen coordinates (positive y points down).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct DragEvent {
    /// Event phase.
    pub phase: DragPhase,
    /// Cumulative translation since the drag started (px).
    #[cfg_attr(feature = "config", serde(default))]
    pub translation_y: f64,
    /// Current velocity (px/s).
    #[cfg_attr(feature = "config", serde(default))]
    pub velocity_y: f64,
}

impl DragEvent {
    /// A drag start.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            phase: DragPhase::Start,
            translation_y: 0.0,
            velocity_y: 0.0,
        }
    }

    /// A drag move.
    #[must_use]
    pub const fn update(translation_y: f64, velocity_y: f64) -> Self {
        Self {
            phase: DragPhase::Update,
            translation_y,
            velocity_y,
        }
    }

    /// A drag release.
    #[must_use]
    pub const fn end(translation_y: f64, velocity_y: f64) -> Self {
        Self {
            phase: DragPhase::End,
            translation_y,
            velocity_y,
        }
    }

    /// A host cancellation.
    #[must_use]
    pub const fn cancel() -> Self {
        Self {
            phase: DragPhase::Cancel,
            translation_y: 0.0,
            velocity_y: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Coordinator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GesturePhase {
    /// No gesture activity.
    #[default]
    Idle,
    /// Finger down; the drag owns the height.
    Dragging,
    /// Released; animating to a snap point.
    Snapping,
    /// Released beyond a bound; animating back to it.
    RubberBandRecovering,
}

/// Result of one drag update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    /// Displayed height (after rubber band or clamp).
    pub height: f64,
    /// Undamped height `start - translation_y`.
    pub raw_height: f64,
    /// The raw height lies outside the bounds.
    pub is_over_dragging: bool,
    /// The displayed height is within some snap point's magnetic range.
    pub is_near_snap_point: bool,
    /// Fraction of the height range covered, in `[0, 1]`.
    pub drag_progress: f64,
}

/// What to animate to after a release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// Return to a bound with the bouncy profile, ignoring velocity.
    RecoverToBound {
        /// `min_height` or `max_height`.
        bound: f64,
    },
    /// Animate to a resolved snap point carrying the release velocity.
    SnapTo {
        /// Index into the snap point set.
        index: usize,
        /// Target height.
        height: f64,
        /// Release velocity in screen coordinates.
        velocity_y: f64,
    },
}

impl Release {
    /// Target height of the release.
    #[must_use]
    pub fn target(&self) -> f64 {
        match *self {
            Self::RecoverToBound { bound } => bound,
            Self::SnapTo { height, .. } => height,
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct RubberBand {
    enabled: bool,
    factor: f64,
    max_overshoot: f64,
}

/// Drag state machine over panel heights.
#[derive(Debug, Clone)]
pub struct GestureCoordinator {
    range: HeightRange,
    rubber_band: RubberBand,
    resolver: SnapResolver,
    phase: GesturePhase,
    start_height: f64,
    height: f64,
    velocity_y: f64,
}

impl GestureCoordinator {
    /// Create an idle coordinator from sheet configuration.
    #[must_use]
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            range: config.range(),
            rubber_band: RubberBand {
                enabled: config.enable_rubber_band,
                factor: config.rubber_band_factor,
                max_overshoot: config.max_overshoot,
            },
            resolver: SnapResolver::new(&config.snap),
            phase: GesturePhase::Idle,
            start_height: config.initial_height,
            height: config.initial_height,
            velocity_y: 0.0,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Whether a finger is down.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == GesturePhase::Dragging
    }

    /// Last observed drag velocity.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity_y
    }

    /// Begin a drag from the live height. Returns `false` if a drag is
    /// already in progress.
    pub fn on_drag_start(&mut self, live_height: f64) -> bool {
        if self.is_dragging() {
            tracing::debug!(target: "snapsheet.gesture", "drag start ignored: already dragging");
            return false;
        }
        self.phase = GesturePhase::Dragging;
        self.start_height = live_height;
        self.height = live_height;
        self.velocity_y = 0.0;
        tracing::debug!(target: "snapsheet.gesture", start_height = live_height, "drag started");
        true
    }

    /// Map a drag translation to a height. `None` outside a drag.
    pub fn on_drag_update(
        &mut self,
        translation_y: f64,
        velocity_y: f64,
        points: &SnapPointSet,
    ) -> Option<DragSample> {
        if !self.is_dragging() {
            tracing::debug!(target: "snapsheet.gesture", "drag update ignored: not dragging");
            return None;
        }
        if !translation_y.is_finite() {
            tracing::debug!(
                target: "snapsheet.gesture",
                translation_y,
                "drag update ignored: non-finite translation"
            );
            return None;
        }
        let raw_height = self.start_height - translation_y;
        let height = self.constrain(raw_height);
        self.height = height;
        if velocity_y.is_finite() {
            self.velocity_y = velocity_y;
        }
        let sample = DragSample {
            height,
            raw_height,
            is_over_dragging: !self.range.contains(raw_height),
            is_near_snap_point: points.is_near(height),
            drag_progress: self.range.progress(height),
        };
        tracing::trace!(
            target: "snapsheet.gesture",
            raw = raw_height,
            height,
            over = sample.is_over_dragging,
            "drag update"
        );
        Some(sample)
    }

    /// Decide the release target. `None` outside a drag.
    pub fn on_drag_end(&mut self, velocity_y: f64, points: &SnapPointSet) -> Option<Release> {
        if !self.is_dragging() {
            tracing::debug!(target: "snapsheet.gesture", "drag end ignored: not dragging");
            return None;
        }
        let velocity_y = if velocity_y.is_finite() { velocity_y } else { 0.0 };
        self.velocity_y = velocity_y;

        let release = if self.range.contains(self.height) {
            let index = points.resolve_index(&self.resolver, self.height, velocity_y);
            self.phase = GesturePhase::Snapping;
            Release::SnapTo {
                index,
                height: points.get(index).map_or(self.height, |p| p.height),
                velocity_y,
            }
        } else {
            self.phase = GesturePhase::RubberBandRecovering;
            Release::RecoverToBound {
                bound: self.range.nearest_bound(self.height),
            }
        };
        tracing::debug!(
            target: "snapsheet.gesture",
            height = self.height,
            velocity_y,
            target_height = release.target(),
            "drag released"
        );
        Some(release)
    }

    /// Treat a host cancellation as a release with zero velocity.
    pub fn cancel(&mut self, points: &SnapPointSet) -> Option<Release> {
        if self.is_dragging() {
            tracing::debug!(target: "snapsheet.gesture", "drag cancelled");
        }
        self.on_drag_end(0.0, points)
    }

    /// Drop an in-progress drag without a release, for when a programmatic
    /// command takes over the height.
    pub fn abort(&mut self) {
        if self.is_dragging() {
            tracing::debug!(target: "snapsheet.gesture", height = self.height, "drag aborted");
        }
        self.phase = GesturePhase::Idle;
    }

    /// Return to idle once the release animation settles or is interrupted.
    pub fn settle(&mut self) {
        if self.phase != GesturePhase::Dragging {
            self.phase = GesturePhase::Idle;
        }
    }

    fn constrain(&self, raw: f64) -> f64 {
        let RubberBand {
            enabled,
            factor,
            max_overshoot,
        } = self.rubber_band;
        if !enabled {
            return self.range.clamp(raw);
        }
        if raw > self.range.max {
            self.range.max + rubber_band(raw - self.range.max, factor, max_overshoot)
        } else if raw < self.range.min {
            self.range.min - rubber_band(self.range.min - raw, factor, max_overshoot)
        } else {
            raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GestureCoordinator, SnapPointSet) {
        let config = SheetConfig::default();
        let points = SnapPointSet::from_fractions(
            &config.snap_points,
            config.screen_height,
            config.range(),
            &config.snap,
        );
        (GestureCoordinator::new(&config), points)
    }

    #[test]
    fn update_outside_drag_ignored() {
        let (mut g, points) = setup();
        assert!(g.on_drag_update(-50.0, 0.0, &points).is_none());
        assert!(g.on_drag_end(0.0, &points).is_none());
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn double_start_ignored() {
        let (mut g, _) = setup();
        assert!(g.on_drag_start(300.0));
        assert!(!g.on_drag_start(500.0));
    }

    #[test]
    fn upward_translation_grows_panel() {
        let (mut g, points) = setup();
        g.on_drag_start(300.0);
        let sample = g.on_drag_update(-100.0, -400.0, &points).unwrap();
        assert_eq!(sample.height, 400.0);
        assert!(!sample.is_over_dragging);
        assert!((sample.drag_progress - 0.375).abs() < 1e-9);
    }

    #[test]
    fn non_finite_translation_keeps_last_height() {
        let (mut g, points) = setup();
        g.on_drag_start(300.0);
        g.on_drag_update(-100.0, -200.0, &points);
        assert!(g.on_drag_update(f64::NAN, 0.0, &points).is_none());
        assert!(g.on_drag_update(f64::NEG_INFINITY, 0.0, &points).is_none());
        assert!(g.is_dragging());
        let release = g.on_drag_end(f64::NAN, &points).unwrap();
        assert_eq!(
            release,
            Release::SnapTo {
                index: 0,
                height: 300.0,
                velocity_y: 0.0
            }
        );
    }

    #[test]
    fn rubber_band_past_max() {
        let (mut g, points) = setup();
        g.on_drag_start(900.0);
        let sample = g.on_drag_update(-50.0, 0.0, &points).unwrap();
        assert_eq!(sample.raw_height, 950.0);
        assert!(sample.height >= 900.0 && sample.height < 950.0);
        assert!(sample.is_over_dragging);
    }

    #[test]
    fn rubber_band_past_min_is_capped() {
        let (mut g, points) = setup();
        g.on_drag_start(100.0);
        let sample = g.on_drag_update(10_000.0, 0.0, &points).unwrap();
        assert_eq!(sample.height, 0.0);
    }

    #[test]
    fn hard_clamp_without_rubber_band() {
        let config = SheetConfig::default().rubber_band(false, 0.3);
        let points = SnapPointSet::from_fractions(
            &config.snap_points,
            config.screen_height,
            config.range(),
            &config.snap,
        );
        let mut g = GestureCoordinator::new(&config);
        g.on_drag_start(900.0);
        let sample = g.on_drag_update(-50.0, 0.0, &points).unwrap();
        assert_eq!(sample.height, 900.0);
        assert!(sample.is_over_dragging);
        assert!(matches!(g.on_drag_end(0.0, &points), Some(Release::SnapTo { .. })));
    }

    #[test]
    fn over_drag_release_recovers_to_bound() {
        let (mut g, points) = setup();
        g.on_drag_start(900.0);
        g.on_drag_update(-50.0, -2000.0, &points);
        let release = g.on_drag_end(-2000.0, &points).unwrap();
        assert_eq!(release, Release::RecoverToBound { bound: 900.0 });
        assert_eq!(g.phase(), GesturePhase::RubberBandRecovering);
    }

    #[test]
    fn in_bounds_release_snaps() {
        let (mut g, points) = setup();
        g.on_drag_start(300.0);
        g.on_drag_update(-350.0, 0.0, &points);
        let release = g.on_drag_end(0.0, &points).unwrap();
        assert_eq!(
            release,
            Release::SnapTo {
                index: 1,
                height: 700.0,
                velocity_y: 0.0
            }
        );
        assert_eq!(g.phase(), GesturePhase::Snapping);
        g.settle();
        assert_eq!(g.phase(), GesturePhase::Idle);
    }

    #[test]
    fn exactly_one_release_per_drag() {
        let (mut g, points) = setup();
        g.on_drag_start(300.0);
        assert!(g.on_drag_end(0.0, &points).is_some());
        assert!(g.on_drag_end(0.0, &points).is_none());
    }

    #[test]
    fn abort_ends_drag_without_release() {
        let (mut g, points) = setup();
        g.on_drag_start(300.0);
        g.abort();
        assert_eq!(g.phase(), GesturePhase::Idle);
        assert!(g.on_drag_end(0.0, &points).is_none());
    }

    #[test]
    fn cancel_releases_with_zero_velocity() {
        let (mut g, points) = setup();
        g.on_drag_start(300.0);
        g.on_drag_update(-100.0, -3000.0, &points);
        let release = g.cancel(&points).unwrap();
        assert!(matches!(release, Release::SnapTo { velocity_y, .. } if velocity_y == 0.0));
        assert_eq!(release.target(), 300.0);
    }
}
