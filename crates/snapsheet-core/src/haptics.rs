#![forbid(unsafe_code)]

//! Fire-and-forget haptic cues.
//!
//! The sheet emits a [`HapticEvent`] when a drag starts and when a release
//! commits to a target. Implementations must not block. Errors are logged
//! at debug level and otherwise ignored; a missing haptic engine never
//! affects panel motion.

use std::sync::mpsc;

use thiserror::Error;

/// A tactile cue requested by the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticEvent {
    /// A drag began.
    DragStart,
    /// A release committed to a snap point.
    Snap,
    /// A release recovered from an over-drag to a bound.
    Boundary,
}

impl HapticEvent {
    /// Suggested impact strength in `[0, 1]`.
    #[must_use]
    pub const fn intensity(self) -> f32 {
        match self {
            Self::DragStart => 0.3,
            Self::Snap => 0.6,
            Self::Boundary => 0.8,
        }
    }
}

/// Why a cue could not be delivered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HapticError {
    #[error("haptic engine unavailable")]
    Unavailable,
    #[error("haptic receiver disconnected")]
    Disconnected,
}

/// Sink for haptic cues.
pub trait HapticFeedback {
    /// Deliver a cue without blocking.
    fn emit(&mut self, event: HapticEvent) -> Result<(), HapticError>;
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl HapticFeedback for NoopHaptics {
    fn emit(&mut self, _event: HapticEvent) -> Result<(), HapticError> {
        Ok(())
    }
}

/// Forwards cues to another thread over an `mpsc` channel.
#[derive(Debug, Clone)]
pub struct ChannelHaptics {
    tx: mpsc::Sender<HapticEvent>,
}

impl ChannelHaptics {
    /// Create a sink and the receiver the host drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::Receiver<HapticEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl HapticFeedback for ChannelHaptics {
    fn emit(&mut self, event: HapticEvent) -> Result<(), HapticError> {
        self.tx.send(event).map_err(|_| HapticError::Disconnected)
    }
}
