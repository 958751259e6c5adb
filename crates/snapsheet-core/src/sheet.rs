#![forbid(unsafe_code)]

//! The draggable sheet: one owner for the panel height.
//!
//! [`Sheet`] wires the gesture coordinator, the animation driver, and the
//! content engine together. The host feeds it [`DragEvent`]s, programmatic
//! commands, and frame ticks on a single loop; every method takes
//! `&mut self`, so two writers can never touch the height at once.
//!
//! # Ownership
//!
//! [`PhaseOwner`] records who currently writes the height:
//!
//! | owner | writer | released by |
//! |---|---|---|
//! | `Idle` | nobody | a drag start or a command |
//! | `Dragging` | drag updates | drag end, cancel, or a command |
//! | `Animating(run)` | the spring of `run` | settle, a drag start, or a command |
//!
//! A drag start interrupts an animation from its live height. A
//! programmatic command supersedes either owner. Because the driver only
//! reports completion for its current run, `on_height_change` never fires
//! for a superseded animation.
//!
//! # Callbacks
//!
//! - `on_height_change` fires once per settled height: when an animation
//!   comes to rest and on [`Sheet::jump_to_height`].
//! - `on_content_mode_change` fires on every discrete mode change, whether
//!   caused by a drag update, an animation tick, or a jump.

use std::time::Duration;

use crate::animation::AnimationType;
use crate::config::SheetConfig;
use crate::content::{ContentAdaptationContext, ContentEngine, ContentMode};
use crate::driver::{AnimationDriver, PanelFrame, RunId};
use crate::error::{Result, SheetError};
use crate::gesture::{DragEvent, DragPhase, DragSample, GestureCoordinator, GesturePhase, Release};
use crate::haptics::{HapticEvent, HapticFeedback, NoopHaptics};
use crate::snap::{SnapPoint, SnapPointSet};

type HeightCallback = Box<dyn FnMut(f64)>;
type ModeCallback = Box<dyn FnMut(ContentMode)>;

/// Who currently writes the panel height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhaseOwner {
    /// At rest.
    #[default]
    Idle,
    /// A drag gesture.
    Dragging,
    /// An animation run.
    Animating(RunId),
}

/// Mutable panel state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalState {
    /// Displayed height.
    pub current_height: f64,
    /// Height the panel is heading to (equal to `current_height` at rest).
    pub target_height: f64,
    /// Last observed drag velocity in screen coordinates (px/s).
    pub velocity: f64,
    /// Current height writer.
    pub owner: PhaseOwner,
}

impl ModalState {
    fn at_rest(height: f64) -> Self {
        Self {
            current_height: height,
            target_height: height,
            velocity: 0.0,
            owner: PhaseOwner::Idle,
        }
    }

    /// A drag owns the height.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.owner == PhaseOwner::Dragging
    }

    /// An animation owns the height.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.owner, PhaseOwner::Animating(_))
    }
}

/// Per-frame snapshot returned by [`Sheet::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetFrame {
    /// Panel height.
    pub height: f64,
    /// Offset from the fully expanded position (`max_height - height`).
    pub translate_y: f64,
    /// Active content mode.
    pub mode: ContentMode,
    /// An animation owns the height.
    pub is_animating: bool,
    /// A drag owns the height.
    pub is_dragging: bool,
    /// A staggered style transition is running.
    pub is_transitioning: bool,
}

/// A draggable panel with snap points and adaptive content.
pub struct Sheet {
    config: SheetConfig,
    points: SnapPointSet,
    state: ModalState,
    driver: AnimationDriver,
    gesture: GestureCoordinator,
    content: ContentEngine,
    last_sample: Option<DragSample>,
    haptics: Box<dyn HapticFeedback>,
    on_height_change: Option<HeightCallback>,
    on_mode_change: Option<ModeCallback>,
}

impl std::fmt::Debug for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sheet")
            .field("state", &self.state)
            .field("gesture", &self.gesture.phase())
            .field("mode", &self.content.mode())
            .field("snap_points", &self.points.len())
            .finish_non_exhaustive()
    }
}

impl Sheet {
    /// Build a sheet resting at `config.initial_height`.
    ///
    /// # Errors
    ///
    /// Returns the first problem [`SheetConfig::validate`] finds.
    pub fn new(config: SheetConfig) -> Result<Self> {
        config.validate()?;
        let range = config.range();
        let points = SnapPointSet::from_fractions(
            &config.snap_points,
            config.screen_height,
            range,
            &config.snap,
        );
        let initial = config.initial_height;
        let content = ContentEngine::new(
            config.content.clone(),
            range,
            config.handle_variant,
            config.enable_content_adaptation,
            initial,
        );
        tracing::debug!(
            target: "snapsheet.sheet",
            min = range.min,
            max = range.max,
            initial,
            snap_points = points.len(),
            mode = %content.mode(),
            "sheet created"
        );
        Ok(Self {
            gesture: GestureCoordinator::new(&config),
            driver: AnimationDriver::new(range, initial),
            state: ModalState::at_rest(initial),
            points,
            content,
            config,
            last_sample: None,
            haptics: Box::new(NoopHaptics),
            on_height_change: None,
            on_mode_change: None,
        })
    }

    /// Register the settled-height callback (builder pattern).
    #[must_use]
    pub fn on_height_change(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.on_height_change = Some(Box::new(callback));
        self
    }

    /// Register the content-mode callback (builder pattern).
    #[must_use]
    pub fn on_content_mode_change(mut self, callback: impl FnMut(ContentMode) + 'static) -> Self {
        self.on_mode_change = Some(Box::new(callback));
        self
    }

    /// Install a haptic sink (builder pattern).
    #[must_use]
    pub fn with_haptics(mut self, haptics: impl HapticFeedback + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }

    // --- Input ---------------------------------------------------------

    /// Feed one drag event.
    pub fn handle_drag(&mut self, event: DragEvent) {
        match event.phase {
            DragPhase::Start => self.drag_start(),
            DragPhase::Update => self.drag_update(event.translation_y, event.velocity_y),
            DragPhase::End => {
                let release = self.gesture.on_drag_end(event.velocity_y, &self.points);
                self.release(release, event.velocity_y);
            }
            DragPhase::Cancel => {
                let release = self.gesture.cancel(&self.points);
                self.release(release, 0.0);
            }
        }
    }

    fn drag_start(&mut self) {
        let live = self.driver.height();
        if !self.gesture.on_drag_start(live) {
            return;
        }
        if let Some(height) = self.driver.interrupt() {
            tracing::debug!(
                target: "snapsheet.sheet",
                height,
                "drag interrupted animation"
            );
        }
        self.state.current_height = live;
        self.state.target_height = live;
        self.state.velocity = 0.0;
        self.state.owner = PhaseOwner::Dragging;
        self.last_sample = None;
        self.haptic(HapticEvent::DragStart);
    }

    fn drag_update(&mut self, translation_y: f64, velocity_y: f64) {
        let Some(sample) = self
            .gesture
            .on_drag_update(translation_y, velocity_y, &self.points)
        else {
            return;
        };
        self.state.current_height = sample.height;
        self.state.target_height = sample.height;
        self.state.velocity = self.gesture.velocity();
        self.driver.track(sample.height);
        self.last_sample = Some(sample);
        self.update_content(sample.height);
    }

    fn release(&mut self, release: Option<Release>, velocity_y: f64) {
        let Some(release) = release else {
            return;
        };
        let span = tracing::debug_span!(
            "snapsheet.release",
            from = self.state.current_height,
            velocity_y
        );
        let _guard = span.enter();

        let run = match release {
            Release::RecoverToBound { bound } => {
                self.haptic(HapticEvent::Boundary);
                self.driver
                    .animate_with(bound, 0.0, AnimationType::Bouncy.params())
            }
            Release::SnapTo {
                height, velocity_y, ..
            } => {
                self.haptic(HapticEvent::Snap);
                self.driver
                    .animate_to(height, velocity_y, AnimationType::default())
            }
        };
        self.state.velocity = velocity_y;
        self.state.target_height = release.target();
        self.state.owner = PhaseOwner::Animating(run);
        tracing::debug!(
            target: "snapsheet.sheet",
            target_height = release.target(),
            %run,
            "release committed"
        );
    }

    // --- Commands ------------------------------------------------------

    /// Animate to the snap point at `index`. Returns the target height.
    ///
    /// # Errors
    ///
    /// [`SheetError::SnapIndexOutOfRange`] if `index` names no point.
    pub fn animate_to_snap_point(&mut self, index: usize, animation: AnimationType) -> Result<f64> {
        let height = self
            .points
            .get(index)
            .map(|p| p.height)
            .ok_or(SheetError::SnapIndexOutOfRange {
                index,
                len: self.points.len(),
            })?;
        Ok(self.animate_to_height(height, animation))
    }

    /// Animate to an arbitrary height (clamped). Returns the target height.
    pub fn animate_to_height(&mut self, height: f64, animation: AnimationType) -> f64 {
        self.take_over();
        let run = self.driver.animate_to(height, 0.0, animation);
        let target = self.driver.target().unwrap_or(height);
        self.state.target_height = target;
        self.state.velocity = 0.0;
        self.state.owner = PhaseOwner::Animating(run);
        tracing::debug!(
            target: "snapsheet.sheet",
            target_height = target,
            animation = %animation,
            %run,
            "programmatic animation"
        );
        target
    }

    /// Move to `height` (clamped) immediately. Fires `on_height_change`.
    pub fn jump_to_height(&mut self, height: f64) -> f64 {
        self.take_over();
        let height = self.driver.jump_to(height);
        self.state = ModalState::at_rest(height);
        self.gesture.settle();
        tracing::debug!(target: "snapsheet.sheet", height, "jumped");
        self.update_content(height);
        self.notify_height(height);
        height
    }

    fn take_over(&mut self) {
        if self.state.is_dragging() {
            self.gesture.abort();
        }
        self.last_sample = None;
    }

    // --- Frame loop ----------------------------------------------------

    /// Advance animations by `dt` and return the resulting frame.
    pub fn tick(&mut self, dt: Duration) -> SheetFrame {
        if self.driver.is_animating() {
            match self.driver.tick(dt) {
                Some(settled) => {
                    let span = tracing::debug_span!(
                        "snapsheet.settle",
                        run = %settled.run,
                        height = settled.height
                    );
                    let _guard = span.enter();
                    self.state = ModalState::at_rest(settled.height);
                    self.gesture.settle();
                    self.update_content(settled.height);
                    self.notify_height(settled.height);
                }
                None => {
                    let height = self.driver.height();
                    self.state.current_height = height;
                    self.update_content(height);
                }
            }
        }
        self.content.tick(dt);
        self.frame()
    }

    // --- Introspection -------------------------------------------------

    /// Displayed height.
    #[must_use]
    pub fn current_height(&self) -> f64 {
        self.state.current_height
    }

    /// Snap points in ascending height order.
    #[must_use]
    pub fn snap_points(&self) -> &[SnapPoint] {
        self.points.points()
    }

    /// An animation owns the height.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    /// A drag owns the height.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Full mutable state snapshot.
    #[must_use]
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    /// Gesture coordinator phase.
    #[must_use]
    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    /// Most recent drag sample of the current drag.
    #[must_use]
    pub fn drag_sample(&self) -> Option<&DragSample> {
        self.last_sample.as_ref()
    }

    /// Content snapshot for rendering.
    #[must_use]
    pub fn content_context(&self) -> ContentAdaptationContext {
        self.content.context()
    }

    /// Configuration the sheet was built with.
    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Height and offset as last rendered.
    #[must_use]
    pub fn panel(&self) -> PanelFrame {
        self.driver.frame()
    }

    /// Current frame without advancing time.
    #[must_use]
    pub fn frame(&self) -> SheetFrame {
        let panel = self.panel();
        SheetFrame {
            height: panel.height,
            translate_y: panel.translate_y,
            mode: self.content.mode(),
            is_animating: self.state.is_animating(),
            is_dragging: self.state.is_dragging(),
            is_transitioning: self.content.is_transitioning(),
        }
    }

    // --- Internals -----------------------------------------------------

    fn update_content(&mut self, height: f64) {
        if let Some(change) = self.content.update(height) {
            if let Some(callback) = self.on_mode_change.as_mut() {
                callback(change.to);
            }
        }
    }

    fn notify_height(&mut self, height: f64) {
        tracing::debug!(target: "snapsheet.sheet", height, "height settled");
        if let Some(callback) = self.on_height_change.as_mut() {
            callback(height);
        }
    }

    fn haptic(&mut self, event: HapticEvent) {
        if !self.config.enable_haptic_feedback {
            return;
        }
        if let Err(err) = self.haptics.emit(event) {
            tracing::debug!(target: "snapsheet.sheet", ?event, %err, "haptic cue dropped");
        }
    }
}
