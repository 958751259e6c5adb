//! End-to-end sheet scenarios: release targets, interruption, over-drag
//! recovery, content modes, and emitted tracing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use snapsheet_core::{
    AnimationType, ContentMode, DragEvent, GesturePhase, PhaseOwner, Sheet, SheetConfig,
    compute_mode,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

const FRAME: Duration = Duration::from_millis(16);

fn settle(sheet: &mut Sheet) -> usize {
    for frame in 1..=600 {
        sheet.tick(FRAME);
        if !sheet.is_animating() {
            return frame;
        }
    }
    panic!("sheet did not settle: {sheet:?}");
}

fn recorded_heights(config: SheetConfig) -> (Sheet, Rc<RefCell<Vec<f64>>>) {
    let heights = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&heights);
    let sheet = Sheet::new(config)
        .unwrap()
        .on_height_change(move |h| sink.borrow_mut().push(h));
    (sheet, heights)
}

// ---------------------------------------------------------------------------
// Release targets
// ---------------------------------------------------------------------------

#[test]
fn slow_release_at_650_lands_on_700() {
    let (mut sheet, heights) = recorded_heights(SheetConfig::default());
    sheet.handle_drag(DragEvent::start());
    sheet.handle_drag(DragEvent::update(-350.0, 0.0));
    assert_eq!(sheet.current_height(), 650.0);
    sheet.handle_drag(DragEvent::end(-350.0, 0.0));
    settle(&mut sheet);
    assert_eq!(sheet.current_height(), 700.0);
    assert_eq!(*heights.borrow(), vec![700.0]);
}

#[test]
fn upward_flick_from_400_does_not_go_down() {
    let (mut sheet, _) = recorded_heights(SheetConfig::default());
    sheet.handle_drag(DragEvent::start());
    sheet.handle_drag(DragEvent::update(-100.0, -1200.0));
    sheet.handle_drag(DragEvent::end(-100.0, -1200.0));
    assert!(sheet.state().target_height >= 400.0);
    settle(&mut sheet);
    assert!(sheet.current_height() >= 400.0);
}

#[test]
fn downward_flick_collapses() {
    let (mut sheet, _) = recorded_heights(SheetConfig::default().heights(100.0, 900.0, 700.0));
    sheet.handle_drag(DragEvent::start());
    sheet.handle_drag(DragEvent::update(100.0, 1500.0));
    sheet.handle_drag(DragEvent::end(100.0, 1500.0));
    settle(&mut sheet);
    assert_eq!(sheet.current_height(), 300.0);
}

#[test]
fn slow_release_at_850_prefers_standard_point() {
    let (mut sheet, heights) = recorded_heights(SheetConfig::default());
    let points: Vec<(f64, ContentMode, u8)> = sheet
        .snap_points()
        .iter()
        .map(|p| (p.height, p.content_mode, p.priority))
        .collect();
    assert_eq!(
        points,
        vec![
            (300.0, ContentMode::Compact, 1),
            (700.0, ContentMode::Standard, 3),
            (900.0, ContentMode::Expanded, 2),
        ]
    );
    sheet.handle_drag(DragEvent::start());
    sheet.handle_drag(DragEvent::update(-550.0, 0.0));
    assert_eq!(sheet.current_height(), 850.0);
    sheet.handle_drag(DragEvent::end(-550.0, 0.0));
    assert_eq!(sheet.state().target_height, 700.0);
    settle(&mut sheet);
    assert_eq!(*heights.borrow(), vec![700.0]);
}

#[test]
fn non_finite_drag_input_still_settles() {
    let (mut sheet, heights) = recorded_heights(SheetConfig::default());
    sheet.handle_drag(DragEvent::start());
    sheet.handle_drag(DragEvent::update(f64::NAN, 0.0));
    sheet.handle_drag(DragEvent::end(f64::NAN, f64::NAN));
    settle(&mut sheet);
    assert!(sheet.current_height().is_finite());
    assert_eq!(*heights.borrow(), vec![300.0]);
    assert_eq!(sheet.state().owner, PhaseOwner::Idle);
}

// ---------------------------------------------------------------------------
// Over-drag
// ---------------------------------------------------------------------------

#[test]
fn over_drag_past_max_is_damped() {
    let (mut sheet, _) = recorded_heights(SheetConfig::default().heights(100.0, 900.0, 900.0));
    sheet.handle_drag(DragEvent::start());
    sheet.handle_drag(DragEvent::update(-50.0, -200.0));
    let h = sheet.current_height();
    assert!((900.0..950.0).contains(&h), "height {h}");
    assert!(sheet.drag_sample().unwrap().is_over_dragging);
}

#[test]
fn release_from_over_drag_returns_to_exactly_max() {
    let (mut sheet, heights) = recorded_heights(SheetConfig::default().heights(100.0, 900.0, 900.0));
    sheet.handle_drag(DragEvent::start());
    sheet.handle_drag(DragEvent::update(-300.0, -2500.0));
    sheet.handle_drag(DragEvent::end(-300.0, -2500.0));
    assert_eq!(sheet.gesture_phase(), GesturePhase::RubberBandRecovering);
    settle(&mut sheet);
    assert_eq!(sheet.current_height(), 900.0);
    assert_eq!(*heights.borrow(), vec![900.0]);
}

#[test]
fn release_from_under_drag_returns_to_exactly_min() {
    let (mut sheet, _) = recorded_heights(SheetConfig::default().heights(100.0, 900.0, 100.0));
    sheet.handle_drag(DragEvent::start());
    sheet.handle_drag(DragEvent::update(80.0, 600.0));
    sheet.handle_drag(DragEvent::end(80.0, 600.0));
    settle(&mut sheet);
    assert_eq!(sheet.current_height(), 100.0);
}

// ---------------------------------------------------------------------------
// Interruption and idempotence
// ---------------------------------------------------------------------------

#[test]
fn superseded_animation_never_reports() {
    let (mut sheet, heights) = recorded_heights(SheetConfig::default());
    sheet.animate_to_snap_point(2, AnimationType::Gentle).unwrap();
    for _ in 0..10 {
        sheet.tick(FRAME);
    }
    let first = match sheet.state().owner {
        PhaseOwner::Animating(run) => run,
        other => panic!("expected animation, got {other:?}"),
    };
    sheet.animate_to_snap_point(0, AnimationType::Snappy).unwrap();
    assert_ne!(sheet.state().owner, PhaseOwner::Animating(first));
    settle(&mut sheet);
    assert_eq!(*heights.borrow(), vec![300.0]);
}

#[test]
fn drag_interrupts_without_jump() {
    let (mut sheet, heights) = recorded_heights(SheetConfig::default());
    sheet.animate_to_snap_point(2, AnimationType::Smooth).unwrap();
    for _ in 0..8 {
        sheet.tick(FRAME);
    }
    let live = sheet.current_height();
    sheet.handle_drag(DragEvent::start());
    assert_eq!(sheet.current_height(), live);
    sheet.handle_drag(DragEvent::update(-10.0, 0.0));
    assert_eq!(sheet.current_height(), live + 10.0);
    sheet.handle_drag(DragEvent::end(-10.0, 0.0));
    settle(&mut sheet);
    assert_eq!(heights.borrow().len(), 1);
    assert!(sheet.snap_points().iter().any(|p| p.height == sheet.current_height()));
}

#[test]
fn resnapping_to_resting_point_is_idempotent() {
    let (mut sheet, _) = recorded_heights(SheetConfig::default());
    sheet.animate_to_snap_point(1, AnimationType::Snappy).unwrap();
    settle(&mut sheet);
    let before = sheet.frame();
    sheet.animate_to_snap_point(1, AnimationType::Bouncy).unwrap();
    settle(&mut sheet);
    assert_eq!(sheet.frame().height, before.height);
    assert_eq!(sheet.frame().translate_y, before.translate_y);
    assert_eq!(sheet.frame().mode, before.mode);
}

#[test]
fn every_profile_settles_at_every_point() {
    for animation in AnimationType::ALL {
        let (mut sheet, _) = recorded_heights(SheetConfig::default());
        for index in [2, 0, 1] {
            let target = sheet.animate_to_snap_point(index, animation).unwrap();
            settle(&mut sheet);
            assert_eq!(sheet.current_height(), target, "{animation} to {index}");
        }
    }
}

// ---------------------------------------------------------------------------
// Content modes
// ---------------------------------------------------------------------------

#[test]
fn mode_scenarios() {
    assert_eq!(compute_mode(250.0, 100.0, 900.0).mode, ContentMode::Compact);
    assert_eq!(compute_mode(850.0, 100.0, 900.0).mode, ContentMode::Expanded);
}

#[test]
fn animation_ticks_drive_mode_changes() {
    let modes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&modes);
    let mut sheet = Sheet::new(SheetConfig::default())
        .unwrap()
        .on_content_mode_change(move |m| sink.borrow_mut().push(m));
    sheet.animate_to_snap_point(2, AnimationType::Smooth).unwrap();
    settle(&mut sheet);
    let modes = modes.borrow();
    assert_eq!(modes.first(), Some(&ContentMode::Standard));
    assert_eq!(modes.last(), Some(&ContentMode::Expanded));
    assert_eq!(sheet.content_context().current_mode, ContentMode::Expanded);
}

#[test]
fn transition_finishes_after_settle() {
    let mut sheet = Sheet::new(SheetConfig::default()).unwrap();
    sheet.jump_to_height(850.0);
    assert!(sheet.content_context().is_transitioning);
    for _ in 0..30 {
        sheet.tick(FRAME);
    }
    let ctx = sheet.content_context();
    assert!(!ctx.is_transitioning);
    assert!(ctx.should_show_footer);
    assert_eq!(ctx.adaptive_styles.padding, 24.0);
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    fields: HashMap<String, String>,
}

#[derive(Default, Clone)]
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing(f: impl FnOnce()) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

#[test]
fn release_and_settle_are_traced() {
    let capture = with_captured_tracing(|| {
        let mut sheet = Sheet::new(SheetConfig::default()).unwrap();
        sheet.handle_drag(DragEvent::start());
        sheet.handle_drag(DragEvent::update(-350.0, 0.0));
        sheet.handle_drag(DragEvent::end(-350.0, 0.0));
        settle(&mut sheet);
    });

    let spans = capture.spans.lock().unwrap();
    assert!(spans.iter().any(|s| s.name == "snapsheet.release"));
    assert!(spans.iter().any(|s| s.name == "snapsheet.settle"));

    let events = capture.events.lock().unwrap();
    for target in ["snapsheet.gesture", "snapsheet.driver", "snapsheet.content", "snapsheet.sheet"] {
        assert!(
            events.iter().any(|e| e.target == target),
            "no events for {target}"
        );
    }
    assert!(events
        .iter()
        .any(|e| e.fields.get("message").is_some_and(|m| m == "animation settled")));
}

#[test]
fn interruption_is_traced() {
    let capture = with_captured_tracing(|| {
        let mut sheet = Sheet::new(SheetConfig::default()).unwrap();
        sheet.animate_to_snap_point(2, AnimationType::Gentle).unwrap();
        sheet.tick(FRAME);
        sheet.handle_drag(DragEvent::start());
    });
    let events = capture.events.lock().unwrap();
    assert!(events.iter().any(|e| {
        e.target == "snapsheet.driver"
            && e.fields.get("message").is_some_and(|m| m == "animation interrupted")
    }));
}
