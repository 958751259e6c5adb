#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use snapsheet_core::{AnimationType, DragEvent, Sheet, SheetConfig};

#[derive(Debug, Arbitrary)]
enum Op {
    Start,
    Update { translation: i16, velocity: i16 },
    End { velocity: i16 },
    Cancel,
    Tick { ms: u8 },
    SnapTo { index: u8, profile: u8 },
    Jump { height: i16 },
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(mut sheet) = Sheet::new(SheetConfig::default()) else {
        return;
    };
    for op in ops.into_iter().take(256) {
        match op {
            Op::Start => sheet.handle_drag(DragEvent::start()),
            Op::Update { translation, velocity } => sheet.handle_drag(DragEvent::update(
                f64::from(translation),
                f64::from(velocity) * 4.0,
            )),
            Op::End { velocity } => sheet.handle_drag(DragEvent::end(0.0, f64::from(velocity) * 4.0)),
            Op::Cancel => sheet.handle_drag(DragEvent::cancel()),
            Op::Tick { ms } => {
                sheet.tick(Duration::from_millis(u64::from(ms)));
            }
            Op::SnapTo { index, profile } => {
                let animation = AnimationType::ALL[usize::from(profile) % AnimationType::ALL.len()];
                let _ = sheet.animate_to_snap_point(usize::from(index % 4), animation);
            }
            Op::Jump { height } => {
                sheet.jump_to_height(f64::from(height));
            }
        }
        assert!(!(sheet.is_dragging() && sheet.is_animating()), "two height writers");
        let frame = sheet.frame();
        assert_eq!(frame.translate_y, 900.0 - frame.height);
        assert!(frame.height.is_finite());
    }
});
