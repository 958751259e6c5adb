#![no_main]

use libfuzzer_sys::fuzz_target;
use snapsheet_harness::{Step, Trace, replay_trace};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut trace) = Trace::from_json_str(text) else {
        return;
    };
    // Keep runs short: cap waits and settle budgets.
    for step in &mut trace.steps {
        match step {
            Step::WaitMs(ms) => *ms = (*ms).min(2_000),
            Step::Settle(settle) => {
                settle.max_frames = Some(settle.max_frames.unwrap_or(600).min(2_000));
            }
            _ => {}
        }
    }
    let mut out = Vec::new();
    if let Ok(summary) = replay_trace(&trace, None, &mut out) {
        let lines = out.iter().filter(|b| **b == b'\n').count() as u64;
        assert_eq!(lines, summary.records, "record count mismatch");
    }
});
