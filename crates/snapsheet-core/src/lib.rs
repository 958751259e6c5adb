#![forbid(unsafe_code)]

//! Core: snap-point physics, drag gestures, and content adaptation for a
//! draggable bottom panel.
//!
//! # Role in snapsheet
//! `snapsheet-core` is the whole engine. It owns the panel height and
//! decides where it goes; rendering is left to the host, which reads
//! [`SheetFrame`] and [`ContentAdaptationContext`] each frame.
//!
//! # Primary responsibilities
//! - **Sheet**: single owner of the height; routes drags, commands, and ticks.
//! - **Snap resolution**: magnetic, priority-ranked, velocity-biased targets.
//! - **Animation**: damped springs with interruptible, identity-tagged runs.
//! - **Gestures**: drag state machine with rubber-band over-drag.
//! - **Content adaptation**: compact/standard/expanded tiers with continuous
//!   styles and staggered transitions.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use snapsheet_core::{DragEvent, Sheet, SheetConfig};
//!
//! let mut sheet = Sheet::new(SheetConfig::default())?;
//! sheet.handle_drag(DragEvent::start());
//! sheet.handle_drag(DragEvent::update(-350.0, 0.0));
//! sheet.handle_drag(DragEvent::end(-350.0, 0.0));
//! while sheet.is_animating() {
//!     sheet.tick(Duration::from_millis(16));
//! }
//! assert_eq!(sheet.current_height(), 700.0);
//! # Ok::<(), snapsheet_core::SheetError>(())
//! ```

pub mod animation;
pub mod config;
pub mod content;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod haptics;
pub mod sheet;
pub mod snap;

pub use animation::{AnimationType, SpringParams, select_spring_config};
pub use config::{ContentConfig, HandleVariant, SheetConfig, SnapConfig};
pub use content::{
    AdaptiveStyles, ContentAdaptationContext, ContentMode, ModeConfig, ModeResolution, compute_mode,
};
pub use driver::{AnimationDriver, PanelFrame, RunId, Settled};
pub use error::{Result, SheetError};
pub use geometry::{HeightRange, clamp, progress, rubber_band};
pub use gesture::{DragEvent, DragPhase, DragSample, GestureCoordinator, GesturePhase, Release};
pub use haptics::{ChannelHaptics, HapticError, HapticEvent, HapticFeedback, NoopHaptics};
pub use sheet::{ModalState, PhaseOwner, Sheet, SheetFrame};
pub use snap::{SnapPoint, SnapPointSet, SnapResolver};
