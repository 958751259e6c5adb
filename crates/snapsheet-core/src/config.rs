#![forbid(unsafe_code)]

//! Sheet configuration.
//!
//! A [`SheetConfig`] captures everything a sheet needs at construction:
//! bounds, snap fractions, rubber-band tuning, feature toggles, resolver and
//! content-adaptation parameters. With the `config` feature it can be loaded
//! from TOML or JSON:
//!
//! ```toml
//! screen_height = 1000.0
//! min_height = 100.0
//! max_height = 900.0
//! initial_height = 300.0
//! snap_points = [0.3, 0.7, 0.9]
//!
//! [snap]
//! velocity_threshold = 500.0
//!
//! [content]
//! stagger_ms = 50
//! ```
//!
//! Missing fields take their defaults, so `SheetConfig::default()` and an
//! empty TOML document describe the same sheet.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};
use crate::geometry::HeightRange;

// ---------------------------------------------------------------------------
// Handle variant
// ---------------------------------------------------------------------------

/// Drag-affordance style. Affects rendering and layout chrome only, never
/// physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum HandleVariant {
    /// Standard pill handle.
    #[default]
    Standard,
    /// Thin, low-profile handle.
    Minimal,
    /// Large handle with a touch target.
    Prominent,
}

impl HandleVariant {
    /// Vertical space (px) the handle occupies above the content.
    #[must_use]
    pub const fn handle_area(self) -> f64 {
        match self {
            Self::Standard => 24.0,
            Self::Minimal => 16.0,
            Self::Prominent => 32.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Snap point resolution parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SnapConfig {
    /// Release speed (px/s) above which resolution is direction-biased.
    pub velocity_threshold: f64,
    /// Magnetic range of each snap point as a fraction of screen height.
    pub magnetic_range_fraction: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 500.0,
            magnetic_range_fraction: 0.2,
        }
    }
}

/// Content adaptation parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContentConfig {
    /// Progress below which the mode is compact.
    pub compact_threshold: f64,
    /// Progress at or above which the mode is expanded.
    pub expanded_threshold: f64,
    /// Duration of each staggered style channel, in milliseconds.
    pub channel_duration_ms: u64,
    /// Delay between successive style channels, in milliseconds.
    pub stagger_ms: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            compact_threshold: 0.4,
            expanded_threshold: 0.7,
            channel_duration_ms: 200,
            stagger_ms: 50,
        }
    }
}

impl ContentConfig {
    /// Channel duration as a [`Duration`].
    #[must_use]
    pub fn channel_duration(&self) -> Duration {
        Duration::from_millis(self.channel_duration_ms)
    }

    /// Stagger increment as a [`Duration`].
    #[must_use]
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

// ---------------------------------------------------------------------------
// SheetConfig
// ---------------------------------------------------------------------------

/// Construction-time configuration of a sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SheetConfig {
    /// Height of the containing screen; snap fractions are relative to it.
    pub screen_height: f64,
    /// Lowest resting height.
    pub min_height: f64,
    /// Highest resting height.
    pub max_height: f64,
    /// Height at mount.
    pub initial_height: f64,
    /// Snap positions as fractions (0–1) of `screen_height`.
    pub snap_points: Vec<f64>,
    /// Damp drags past the bounds instead of hard-clamping.
    pub enable_rubber_band: bool,
    /// Rubber-band factor in `[0, 1]`; larger means less resistance.
    pub rubber_band_factor: f64,
    /// Cap on the damped overshoot, in pixels.
    pub max_overshoot: f64,
    /// Emit haptic cues on drag start and snap.
    pub enable_haptic_feedback: bool,
    /// Drive adaptive styles and staggered transitions.
    pub enable_content_adaptation: bool,
    /// Drag-affordance style.
    pub handle_variant: HandleVariant,
    /// Snap resolution parameters.
    pub snap: SnapConfig,
    /// Content adaptation parameters.
    pub content: ContentConfig,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            screen_height: 1000.0,
            min_height: 100.0,
            max_height: 900.0,
            initial_height: 300.0,
            snap_points: vec![0.3, 0.7, 0.9],
            enable_rubber_band: true,
            rubber_band_factor: 0.3,
            max_overshoot: 100.0,
            enable_haptic_feedback: true,
            enable_content_adaptation: true,
            handle_variant: HandleVariant::Standard,
            snap: SnapConfig::default(),
            content: ContentConfig::default(),
        }
    }
}

impl SheetConfig {
    /// Create a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set screen height.
    #[must_use]
    pub fn screen_height(mut self, height: f64) -> Self {
        self.screen_height = height;
        self
    }

    /// Set min, max, and initial heights.
    #[must_use]
    pub fn heights(mut self, min: f64, max: f64, initial: f64) -> Self {
        self.min_height = min;
        self.max_height = max;
        self.initial_height = initial;
        self
    }

    /// Set snap fractions.
    #[must_use]
    pub fn snap_points(mut self, fractions: impl Into<Vec<f64>>) -> Self {
        self.snap_points = fractions.into();
        self
    }

    /// Enable or disable the rubber band and set its factor.
    #[must_use]
    pub fn rubber_band(mut self, enabled: bool, factor: f64) -> Self {
        self.enable_rubber_band = enabled;
        self.rubber_band_factor = factor;
        self
    }

    /// Set the overshoot cap.
    #[must_use]
    pub fn max_overshoot(mut self, px: f64) -> Self {
        self.max_overshoot = px;
        self
    }

    /// Enable or disable haptic cues.
    #[must_use]
    pub fn haptic_feedback(mut self, enabled: bool) -> Self {
        self.enable_haptic_feedback = enabled;
        self
    }

    /// Enable or disable content adaptation.
    #[must_use]
    pub fn content_adaptation(mut self, enabled: bool) -> Self {
        self.enable_content_adaptation = enabled;
        self
    }

    /// Set the handle variant.
    #[must_use]
    pub fn handle_variant(mut self, variant: HandleVariant) -> Self {
        self.handle_variant = variant;
        self
    }

    /// Height bounds as a range. Only meaningful after [`validate`](Self::validate).
    #[must_use]
    pub fn range(&self) -> HeightRange {
        HeightRange::new(self.min_height, self.max_height)
    }

    /// Check the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if !self.screen_height.is_finite() || self.screen_height <= 0.0 {
            return Err(SheetError::InvalidScreenHeight(self.screen_height));
        }
        for (field, value) in [
            ("min_height", self.min_height),
            ("max_height", self.max_height),
            ("max_overshoot", self.max_overshoot),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SheetError::InvalidDimension { field, value });
            }
        }
        if self.min_height > self.max_height {
            return Err(SheetError::InvalidBounds {
                min: self.min_height,
                max: self.max_height,
            });
        }
        if !self.initial_height.is_finite() || !self.range().contains(self.initial_height) {
            return Err(SheetError::InitialOutOfRange {
                initial: self.initial_height,
                min: self.min_height,
                max: self.max_height,
            });
        }
        let compact = self.content.compact_threshold;
        let expanded = self.content.expanded_threshold;
        if !(0.0..=1.0).contains(&compact) || !(0.0..=1.0).contains(&expanded) || compact > expanded
        {
            return Err(SheetError::InvalidThresholds { compact, expanded });
        }
        Ok(())
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML document.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
