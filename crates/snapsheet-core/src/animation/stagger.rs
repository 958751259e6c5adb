#![forbid(unsafe_code)]

//! Staggered multi-channel style transitions.
//!
//! When the content mode changes, five style channels animate one after
//! another: padding, font scale, spacing, border radius, then opacity. Each
//! channel starts a fixed stagger increment after the previous one.
//!
//! # Invariants
//!
//! 1. Channel offsets are `index × stagger`, in [`StyleChannel::ORDER`].
//! 2. The transition is complete exactly when the last channel is complete;
//!    total duration is `4 × stagger + channel_duration`.
//! 3. [`StaggeredTransition::progress`] is monotonically non-decreasing and
//!    reaches 1.0 on completion.

use std::time::Duration;

use super::{Animation, Delayed, Fade, delay, ease_out_cubic};

/// A style value animated during a content-mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleChannel {
    /// Content padding.
    Padding,
    /// Font scale multiplier.
    FontScale,
    /// Spacing multiplier.
    Spacing,
    /// Corner radius.
    BorderRadius,
    /// Content opacity.
    Opacity,
}

impl StyleChannel {
    /// Channels in start order.
    pub const ORDER: [Self; 5] = [
        Self::Padding,
        Self::FontScale,
        Self::Spacing,
        Self::BorderRadius,
        Self::Opacity,
    ];

    #[inline]
    const fn index(self) -> usize {
        match self {
            Self::Padding => 0,
            Self::FontScale => 1,
            Self::Spacing => 2,
            Self::BorderRadius => 3,
            Self::Opacity => 4,
        }
    }
}

/// Linear start offsets for `count` items spaced by `step`.
#[must_use]
pub fn stagger_offsets(count: usize, step: Duration) -> Vec<Duration> {
    (0..count)
        .map(|i| step.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
        .collect()
}

/// Five delayed fades, one per [`StyleChannel`].
#[derive(Debug, Clone)]
pub struct StaggeredTransition {
    channels: Vec<Delayed<Fade>>,
    elapsed: Duration,
    total: Duration,
}

impl StaggeredTransition {
    /// Create a transition where each channel lasts `channel_duration` and
    /// starts `stagger` after the previous one.
    #[must_use]
    pub fn new(channel_duration: Duration, stagger: Duration) -> Self {
        let channels: Vec<_> = stagger_offsets(StyleChannel::ORDER.len(), stagger)
            .into_iter()
            .map(|offset| delay(offset, Fade::new(channel_duration).easing(ease_out_cubic)))
            .collect();
        let total = channels
            .iter()
            .map(|c| c.delay() + c.inner().duration())
            .max()
            .unwrap_or(Duration::ZERO);
        Self {
            channels,
            elapsed: Duration::ZERO,
            total,
        }
    }

    /// Eased progress of one channel in `[0.0, 1.0]`.
    #[must_use]
    pub fn channel_progress(&self, channel: StyleChannel) -> f64 {
        self.channels
            .get(channel.index())
            .map_or(1.0, |c| f64::from(c.value()))
    }

    /// Overall progress (`elapsed / total`), clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.total.as_secs_f64()).min(1.0)
    }
}

impl Animation for StaggeredTransition {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.total);
        for channel in &mut self.channels {
            channel.tick(dt);
        }
    }

    fn is_complete(&self) -> bool {
        self.channels.iter().all(Animation::is_complete)
    }

    fn value(&self) -> f32 {
        self.progress() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn offsets_are_linear() {
        assert_eq!(stagger_offsets(3, ms(50)), vec![ms(0), ms(50), ms(100)]);
        assert!(stagger_offsets(0, ms(50)).is_empty());
    }

    #[test]
    fn total_covers_last_channel() {
        let mut t = StaggeredTransition::new(ms(200), ms(50));
        t.tick(ms(200));
        assert!((t.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn channels_start_in_order() {
        let mut t = StaggeredTransition::new(ms(200), ms(50));
        t.tick(ms(60));
        assert!(t.channel_progress(StyleChannel::Padding) > 0.0);
        assert!(t.channel_progress(StyleChannel::FontScale) > 0.0);
        assert_eq!(t.channel_progress(StyleChannel::Spacing), 0.0);
        assert_eq!(t.channel_progress(StyleChannel::Opacity), 0.0);
    }

    #[test]
    fn incomplete_until_opacity_finishes() {
        let mut t = StaggeredTransition::new(ms(200), ms(50));
        t.tick(ms(399));
        assert!(!t.is_complete());
        assert_eq!(t.channel_progress(StyleChannel::Padding), 1.0);
        t.tick(ms(1));
        assert!(t.is_complete());
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn progress_monotonic() {
        let mut t = StaggeredTransition::new(ms(200), ms(50));
        let mut prev = t.progress();
        for _ in 0..40 {
            t.tick(ms(16));
            assert!(t.progress() >= prev);
            prev = t.progress();
        }
    }
}
