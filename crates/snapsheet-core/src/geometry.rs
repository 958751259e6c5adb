#![forbid(unsafe_code)]

//! Geometric and physical primitives for panel heights.
//!
//! All functions here are pure. Heights and distances are pixels (`f64`).
//!
//! # Invariants
//!
//! 1. [`clamp`] never returns a value outside `[min, max]` when `min <= max`.
//! 2. [`rubber_band`] is bounded by `max_overshoot` and monotonically
//!    non-decreasing in `overshoot`.
//! 3. [`progress`] always returns a value in `[0.0, 1.0]`.

/// Bound `value` to `[min, max]`.
///
/// Unlike [`f64::clamp`], this does not panic when `min > max`; it returns
/// `min` in that case. NaN inputs resolve to `min`.
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if min > max || value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Damp an overshoot past a bound.
///
/// Returns `min(overshoot * factor, max_overshoot)`. `factor` is clamped to
/// `[0, 1]`; a larger factor means less resistance. Negative overshoot is
/// treated as zero.
#[inline]
#[must_use]
pub fn rubber_band(overshoot: f64, factor: f64, max_overshoot: f64) -> f64 {
    let overshoot = overshoot.max(0.0);
    let factor = clamp(factor, 0.0, 1.0);
    (overshoot * factor).min(max_overshoot.max(0.0))
}

/// Fraction of the height range covered by `height`, clamped to `[0, 1]`.
///
/// A degenerate range (`max <= min`) reports full progress.
#[inline]
#[must_use]
pub fn progress(height: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= f64::EPSILON {
        return 1.0;
    }
    clamp((height - min) / span, 0.0, 1.0)
}

/// Linear interpolation between `a` and `b`.
#[inline]
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Closed height interval a panel may rest in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightRange {
    /// Lowest resting height.
    pub min: f64,
    /// Highest resting height.
    pub max: f64,
}

impl HeightRange {
    /// Create a range. Callers validate `min <= max` beforehand.
    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `height` into the range.
    #[inline]
    #[must_use]
    pub fn clamp(&self, height: f64) -> f64 {
        clamp(height, self.min, self.max)
    }

    /// Whether `height` lies inside the range (inclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, height: f64) -> bool {
        height >= self.min && height <= self.max
    }

    /// Fraction of the range covered by `height`.
    #[inline]
    #[must_use]
    pub fn progress(&self, height: f64) -> f64 {
        progress(height, self.min, self.max)
    }

    /// The bound nearest to `height`.
    #[inline]
    #[must_use]
    pub fn nearest_bound(&self, height: f64) -> f64 {
        if (height - self.max).abs() <= (height - self.min).abs() {
            self.max
        } else {
            self.min
        }
    }
}
