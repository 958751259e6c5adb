#![forbid(unsafe_code)]

//! Content adaptation: maps panel height to a display density tier and a
//! continuous set of style parameters.
//!
//! # Modes
//!
//! Height is normalized to `progress ∈ [0, 1]` over the height range, then:
//!
//! | progress | mode |
//! |---|---|
//! | `< compact_threshold` (0.4) | [`ContentMode::Compact`] |
//! | `>= expanded_threshold` (0.7) | [`ContentMode::Expanded`] |
//! | otherwise | [`ContentMode::Standard`] |
//!
//! Styles interpolate from the active mode's [`ModeConfig`] toward the next
//! denser mode by the within-mode progress, so they are continuous in height.
//!
//! # Transitions
//!
//! A mode change starts a [`StaggeredTransition`]. Each style channel blends
//! from the value displayed at the moment of change toward the live target;
//! `is_transitioning` holds until the last channel (opacity) completes.
//!
//! # Invariants
//!
//! 1. [`compute_mode`] is a monotonic step function of height.
//! 2. Out-of-range heights are clamped; a mode is always returned.
//! 3. Displayed styles equal the live target whenever no transition runs.

use std::time::Duration;

use crate::animation::{Animation, StaggeredTransition, StyleChannel};
use crate::config::{ContentConfig, HandleVariant};
use crate::geometry::{HeightRange, clamp, lerp, progress};

const HEADER_HEIGHT: f64 = 56.0;
const FOOTER_HEIGHT: f64 = 64.0;

const DEFAULT_COMPACT_THRESHOLD: f64 = 0.4;
const DEFAULT_EXPANDED_THRESHOLD: f64 = 0.7;

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Display density tier, ordered by height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentMode {
    /// Short panel: summary only.
    Compact,
    /// Resting height: header and scrollable body.
    Standard,
    /// Tall panel: header, body, and footer.
    Expanded,
}

impl ContentMode {
    /// Static style configuration for this mode.
    #[must_use]
    pub const fn config(self) -> ModeConfig {
        match self {
            Self::Compact => ModeConfig {
                styles: AdaptiveStyles {
                    padding: 12.0,
                    font_scale: 0.9,
                    spacing_scale: 0.8,
                    border_radius: 12.0,
                    opacity: 0.92,
                },
                show_header: false,
                show_footer: false,
                scroll_enabled: false,
            },
            Self::Standard => ModeConfig {
                styles: AdaptiveStyles {
                    padding: 16.0,
                    font_scale: 1.0,
                    spacing_scale: 1.0,
                    border_radius: 16.0,
                    opacity: 1.0,
                },
                show_header: true,
                show_footer: false,
                scroll_enabled: true,
            },
            Self::Expanded => ModeConfig {
                styles: AdaptiveStyles {
                    padding: 24.0,
                    font_scale: 1.1,
                    spacing_scale: 1.2,
                    border_radius: 24.0,
                    opacity: 1.0,
                },
                show_header: true,
                show_footer: true,
                scroll_enabled: true,
            },
        }
    }

    /// The next denser mode, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Compact => Some(Self::Standard),
            Self::Standard => Some(Self::Expanded),
            Self::Expanded => None,
        }
    }

    /// Lowercase mode name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Standard => "standard",
            Self::Expanded => "expanded",
        }
    }
}

impl std::fmt::Display for ContentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Continuous style parameters handed to panel content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveStyles {
    /// Content padding (px).
    pub padding: f64,
    /// Font scale multiplier.
    pub font_scale: f64,
    /// Spacing multiplier.
    pub spacing_scale: f64,
    /// Corner radius (px).
    pub border_radius: f64,
    /// Content opacity in `[0, 1]`.
    pub opacity: f64,
}

impl AdaptiveStyles {
    /// Value of one channel.
    #[must_use]
    pub fn get(&self, channel: StyleChannel) -> f64 {
        match channel {
            StyleChannel::Padding => self.padding,
            StyleChannel::FontScale => self.font_scale,
            StyleChannel::Spacing => self.spacing_scale,
            StyleChannel::BorderRadius => self.border_radius,
            StyleChannel::Opacity => self.opacity,
        }
    }

    fn set(&mut self, channel: StyleChannel, value: f64) {
        match channel {
            StyleChannel::Padding => self.padding = value,
            StyleChannel::FontScale => self.font_scale = value,
            StyleChannel::Spacing => self.spacing_scale = value,
            StyleChannel::BorderRadius => self.border_radius = value,
            StyleChannel::Opacity => self.opacity = value,
        }
    }

    /// Channel-wise interpolation toward `other`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mut out = *self;
        for channel in StyleChannel::ORDER {
            out.set(channel, lerp(self.get(channel), other.get(channel), t));
        }
        out
    }
}

/// Looked-up configuration of one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeConfig {
    /// Base styles.
    pub styles: AdaptiveStyles,
    /// Render the header.
    pub show_header: bool,
    /// Render the footer.
    pub show_footer: bool,
    /// Allow content scrolling.
    pub scroll_enabled: bool,
}

/// Result of [`compute_mode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeResolution {
    /// Discrete mode for the height.
    pub mode: ContentMode,
    /// The mode's static configuration.
    pub config: ModeConfig,
    /// Position within the mode's own progress sub-range, in `[0, 1]`.
    pub transition_progress: f64,
}

/// Compute the mode for `height` using the default thresholds (0.4 / 0.7).
#[must_use]
pub fn compute_mode(height: f64, min_height: f64, max_height: f64) -> ModeResolution {
    compute_mode_with_thresholds(
        height,
        min_height,
        max_height,
        DEFAULT_COMPACT_THRESHOLD,
        DEFAULT_EXPANDED_THRESHOLD,
    )
}

/// Compute the mode for `height` with explicit thresholds.
#[must_use]
pub fn compute_mode_with_thresholds(
    height: f64,
    min_height: f64,
    max_height: f64,
    compact_threshold: f64,
    expanded_threshold: f64,
) -> ModeResolution {
    let p = progress(height, min_height, max_height);
    let (mode, lo, hi) = if p < compact_threshold {
        (ContentMode::Compact, 0.0, compact_threshold)
    } else if p >= expanded_threshold {
        (ContentMode::Expanded, expanded_threshold, 1.0)
    } else {
        (ContentMode::Standard, compact_threshold, expanded_threshold)
    };
    let span = hi - lo;
    let transition_progress = if span <= f64::EPSILON {
        1.0
    } else {
        clamp((p - lo) / span, 0.0, 1.0)
    };
    ModeResolution {
        mode,
        config: mode.config(),
        transition_progress,
    }
}

/// Styles for a resolved mode: the mode's config blended toward the next
/// denser mode by the within-mode progress.
#[must_use]
pub fn interpolated_styles(resolution: &ModeResolution) -> AdaptiveStyles {
    match resolution.mode.next() {
        Some(next) => resolution
            .config
            .styles
            .lerp(&next.config().styles, resolution.transition_progress),
        None => resolution.config.styles,
    }
}

// ---------------------------------------------------------------------------
// Context snapshot
// ---------------------------------------------------------------------------

/// Read-only snapshot consumed by panel content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentAdaptationContext {
    /// Active mode.
    pub current_mode: ContentMode,
    /// Height below the drag handle.
    pub available_height: f64,
    /// Height left for the body after header and footer.
    pub content_height: f64,
    /// Fraction of the height range covered, in `[0, 1]`.
    pub drag_progress: f64,
    /// Styles to render with right now.
    pub adaptive_styles: AdaptiveStyles,
    /// Render the header.
    pub should_show_header: bool,
    /// Render the footer.
    pub should_show_footer: bool,
    /// Allow body scrolling.
    pub scroll_enabled: bool,
    /// Body height after padding.
    pub max_content_height: f64,
    /// A staggered style transition is running.
    pub is_transitioning: bool,
    /// Progress through the staggered transition (1.0 when idle).
    pub transition_progress: f64,
    /// Position within the active mode's sub-range.
    pub mode_progress: f64,
}

/// A discrete mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    /// Mode before the change.
    pub from: ContentMode,
    /// Mode after the change.
    pub to: ContentMode,
}

#[derive(Debug, Clone)]
struct ActiveTransition {
    animation: StaggeredTransition,
    from: AdaptiveStyles,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Tracks mode and styles as the panel height changes.
#[derive(Debug, Clone)]
pub struct ContentEngine {
    config: ContentConfig,
    range: HeightRange,
    handle_area: f64,
    enabled: bool,
    height: f64,
    resolution: ModeResolution,
    transition: Option<ActiveTransition>,
}

impl ContentEngine {
    /// Create an engine resting at `initial_height`.
    #[must_use]
    pub fn new(
        config: ContentConfig,
        range: HeightRange,
        handle: HandleVariant,
        enabled: bool,
        initial_height: f64,
    ) -> Self {
        let resolution = compute_mode_with_thresholds(
            initial_height,
            range.min,
            range.max,
            config.compact_threshold,
            config.expanded_threshold,
        );
        Self {
            config,
            range,
            handle_area: handle.handle_area(),
            enabled,
            height: initial_height,
            resolution,
            transition: None,
        }
    }

    /// Mode for `height` under this engine's thresholds, without updating
    /// state.
    #[must_use]
    pub fn resolve(&self, height: f64) -> ModeResolution {
        compute_mode_with_thresholds(
            height,
            self.range.min,
            self.range.max,
            self.config.compact_threshold,
            self.config.expanded_threshold,
        )
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> ContentMode {
        self.resolution.mode
    }

    /// Whether a staggered transition is running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Recompute for a new height. Returns the mode change, if any.
    pub fn update(&mut self, height: f64) -> Option<ModeChange> {
        let displayed = self.displayed_styles();
        let next = self.resolve(height);
        let previous = self.resolution.mode;
        self.height = height;
        self.resolution = next;

        if next.mode == previous {
            return None;
        }

        tracing::debug!(
            target: "snapsheet.content",
            from = %previous,
            to = %next.mode,
            height,
            "content mode changed"
        );

        if self.enabled {
            self.transition = Some(ActiveTransition {
                animation: StaggeredTransition::new(
                    self.config.channel_duration(),
                    self.config.stagger(),
                ),
                from: displayed,
            });
        }

        Some(ModeChange {
            from: previous,
            to: next.mode,
        })
    }

    /// Advance the style transition. Returns `true` when it finished during
    /// this tick.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(active) = self.transition.as_mut() else {
            return false;
        };
        active.animation.tick(dt);
        if active.animation.is_complete() {
            self.transition = None;
            tracing::trace!(target: "snapsheet.content", "style transition complete");
            return true;
        }
        false
    }

    /// Live target styles for the current height.
    #[must_use]
    pub fn target_styles(&self) -> AdaptiveStyles {
        if self.enabled {
            interpolated_styles(&self.resolution)
        } else {
            ContentMode::Standard.config().styles
        }
    }

    /// Styles currently shown, blending any running transition.
    #[must_use]
    pub fn displayed_styles(&self) -> AdaptiveStyles {
        let target = self.target_styles();
        let Some(active) = &self.transition else {
            return target;
        };
        let mut out = target;
        for channel in StyleChannel::ORDER {
            let t = active.animation.channel_progress(channel);
            out.set(channel, lerp(active.from.get(channel), target.get(channel), t));
        }
        out
    }

    /// Snapshot for content consumers.
    #[must_use]
    pub fn context(&self) -> ContentAdaptationContext {
        let mode_config = if self.enabled {
            self.resolution.config
        } else {
            ContentMode::Standard.config()
        };
        let styles = self.displayed_styles();
        let available_height = (self.height - self.handle_area).max(0.0);
        let header = if mode_config.show_header { HEADER_HEIGHT } else { 0.0 };
        let footer = if mode_config.show_footer { FOOTER_HEIGHT } else { 0.0 };
        let content_height = (available_height - header - footer).max(0.0);
        ContentAdaptationContext {
            current_mode: self.resolution.mode,
            available_height,
            content_height,
            drag_progress: self.range.progress(self.height),
            adaptive_styles: styles,
            should_show_header: mode_config.show_header,
            should_show_footer: mode_config.show_footer,
            scroll_enabled: mode_config.scroll_enabled,
            max_content_height: (content_height - 2.0 * styles.padding).max(0.0),
            is_transitioning: self.transition.is_some(),
            transition_progress: self
                .transition
                .as_ref()
                .map_or(1.0, |t| t.animation.progress()),
            mode_progress: self.resolution.transition_progress,
        }
    }
}
