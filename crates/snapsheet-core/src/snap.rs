#![forbid(unsafe_code)]

//! Snap points and release-target resolution.
//!
//! A [`SnapPointSet`] is derived once from the configured screen fractions
//! and never changes afterwards. On release, [`SnapResolver`] picks the
//! point the panel should animate to from the live height and the release
//! velocity.
//!
//! # Resolution
//!
//! 1. Height-space direction is `-signum(velocity_y)` (screen y grows down).
//!    `predicted = current + direction × min(|v| / 1000, 2) × 100`.
//! 2. Candidates lie within their own magnetic range of either `current` or
//!    `predicted`.
//! 3. Fast releases (`|v| > velocity_threshold`) keep only candidates in the
//!    direction of travel and rank them by priority, then by distance to
//!    `predicted`.
//! 4. Slow releases, or fast ones with no candidate ahead, rank every
//!    candidate by priority, then by distance to `current`.
//! 5. With no candidates the nearest point to `current` wins.
//!
//! Remaining ties go to the lower index, so the outcome is deterministic.

use crate::config::SnapConfig;
use crate::content::ContentMode;
use crate::geometry::HeightRange;

/// Prediction horizon cap, in seconds of travel at the release velocity.
const MAX_PREDICTION_FACTOR: f64 = 2.0;
/// Pixels of predicted travel per second of velocity factor.
const PREDICTION_DISTANCE: f64 = 100.0;

/// A resting height the panel can settle at.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPoint {
    /// Absolute height in pixels.
    pub height: f64,
    /// Display label, the height as a percentage of the screen.
    pub label: String,
    /// Tier this point stands for, by its position in the set.
    pub content_mode: ContentMode,
    /// Rank among magnetic candidates; higher wins.
    pub priority: u8,
    /// Attraction radius in pixels.
    pub magnetic_range: f64,
}

/// Resolver priority for a content mode. Standard points are the resting
/// attractors.
#[must_use]
pub const fn mode_priority(mode: ContentMode) -> u8 {
    match mode {
        ContentMode::Standard => 3,
        ContentMode::Expanded => 2,
        ContentMode::Compact => 1,
    }
}

/// Mode of the point at `index` in an ascending set of `len` points. A lone
/// point is standard.
#[must_use]
pub const fn positional_mode(index: usize, len: usize) -> ContentMode {
    if len == 1 {
        ContentMode::Standard
    } else if index == 0 {
        ContentMode::Compact
    } else if index + 1 == len {
        ContentMode::Expanded
    } else {
        ContentMode::Standard
    }
}

/// Immutable, sorted, non-empty set of snap points.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPointSet {
    points: Vec<SnapPoint>,
}

impl SnapPointSet {
    /// Derive snap points from screen fractions.
    ///
    /// Non-finite fractions are dropped, heights are clamped into `range`,
    /// sorted and de-duplicated. An empty result falls back to the two
    /// bounds. Modes follow position: the lowest point is compact, the
    /// highest expanded, and every point between them standard.
    #[must_use]
    pub fn from_fractions(
        fractions: &[f64],
        screen_height: f64,
        range: HeightRange,
        snap: &SnapConfig,
    ) -> Self {
        let mut heights: Vec<f64> = fractions
            .iter()
            .filter(|f| f.is_finite())
            .map(|f| range.clamp(f * screen_height))
            .collect();
        heights.sort_by(f64::total_cmp);
        heights.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);

        if heights.is_empty() {
            tracing::debug!(
                target: "snapsheet.sheet",
                "no usable snap fractions, falling back to bounds"
            );
            heights.push(range.min);
            if range.max > range.min {
                heights.push(range.max);
            }
        }

        let magnetic_range = (snap.magnetic_range_fraction * screen_height).max(0.0);
        let len = heights.len();
        let points = heights
            .into_iter()
            .enumerate()
            .map(|(index, height)| {
                let mode = positional_mode(index, len);
                SnapPoint {
                    height,
                    label: format!("{:.0}%", height / screen_height * 100.0),
                    content_mode: mode,
                    priority: mode_priority(mode),
                    magnetic_range,
                }
            })
            .collect();
        Self { points }
    }

    /// Points in ascending height order.
    #[must_use]
    pub fn points(&self) -> &[SnapPoint] {
        &self.points
    }

    /// Number of points (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SnapPoint> {
        self.points.get(index)
    }

    /// Whether `height` lies within any point's magnetic range.
    #[must_use]
    pub fn is_near(&self, height: f64) -> bool {
        self.points
            .iter()
            .any(|p| (p.height - height).abs() <= p.magnetic_range)
    }

    /// Index of the release target chosen by `resolver`.
    #[must_use]
    pub fn resolve_index(&self, resolver: &SnapResolver, current: f64, velocity_y: f64) -> usize {
        resolver
            .resolve_index(current, velocity_y, &self.points)
            .unwrap_or(0)
    }

    /// Release target chosen by `resolver`.
    #[must_use]
    pub fn resolve(&self, resolver: &SnapResolver, current: f64, velocity_y: f64) -> &SnapPoint {
        &self.points[self.resolve_index(resolver, current, velocity_y)]
    }
}

/// Picks a release target from a set of snap points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResolver {
    velocity_threshold: f64,
}

impl Default for SnapResolver {
    fn default() -> Self {
        Self::new(&SnapConfig::default())
    }
}

impl SnapResolver {
    /// Create a resolver from snap configuration.
    #[must_use]
    pub fn new(config: &SnapConfig) -> Self {
        Self {
            velocity_threshold: config.velocity_threshold.abs(),
        }
    }

    /// Height the panel is expected to reach from `current` given a
    /// screen-space release velocity.
    #[must_use]
    pub fn predicted_height(current: f64, velocity_y: f64) -> f64 {
        let direction = height_direction(velocity_y);
        let factor = (velocity_y.abs() / 1000.0).min(MAX_PREDICTION_FACTOR);
        current + direction * factor * PREDICTION_DISTANCE
    }

    /// Index of the winning point, or `None` when `points` is empty.
    #[must_use]
    pub fn resolve_index(&self, current: f64, velocity_y: f64, points: &[SnapPoint]) -> Option<usize> {
        if points.is_empty() {
            return None;
        }
        let velocity_y = if velocity_y.is_finite() { velocity_y } else { 0.0 };
        let direction = height_direction(velocity_y);
        let predicted = Self::predicted_height(current, velocity_y);

        let candidates: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                (p.height - current).abs() <= p.magnetic_range
                    || (p.height - predicted).abs() <= p.magnetic_range
            })
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            return best_by(points, 0..points.len(), |_| 0, current);
        }

        if velocity_y.abs() > self.velocity_threshold {
            let ahead = candidates.iter().copied().filter(|&i| {
                let h = points[i].height;
                if direction > 0.0 { h >= current } else { h <= current }
            });
            if let Some(index) = best_by(points, ahead, |p| p.priority, predicted) {
                return Some(index);
            }
        }

        best_by(points, candidates.into_iter(), |p| p.priority, current)
    }
}

/// Height-space direction of a screen-space velocity: `+1` grows the panel.
fn height_direction(velocity_y: f64) -> f64 {
    if velocity_y == 0.0 { 0.0 } else { -velocity_y.signum() }
}

/// Highest `rank`, then closest to `reference`, then lowest index.
fn best_by(
    points: &[SnapPoint],
    indices: impl IntoIterator<Item = usize>,
    rank: impl Fn(&SnapPoint) -> u8,
    reference: f64,
) -> Option<usize> {
    let mut best: Option<(usize, u8, f64)> = None;
    for i in indices {
        let p = &points[i];
        let r = rank(p);
        let d = (p.height - reference).abs();
        let better = match best {
            None => true,
            Some((_, br, bd)) => r > br || (r == br && d < bd),
        };
        if better {
            best = Some((i, r, d));
        }
    }
    best.map(|(i, _, _)| i)
}
