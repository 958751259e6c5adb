//! Deterministic trace replay.
//!
//! Steps are fed to a [`Sheet`] on a fixed frame clock. Every step and every
//! frame produces one JSONL [`Record`]; callbacks fired along the way add
//! `height_changed` and `mode_changed` records in the order they happened.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use snapsheet_core::{ContentMode, DragPhase, Sheet};

use crate::error::{HarnessError, Result};
use crate::trace::{DEFAULT_SETTLE_FRAMES, Step, Trace, check_frame_ms, check_wait_ms};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Notice {
    Height(f64),
    Mode(ContentMode),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub seq: u64,
    pub t_ms: u64,
    pub event: &'static str,
    pub height: f64,
    pub translate_y: f64,
    pub mode: &'static str,
    pub animating: bool,
    pub dragging: bool,
    pub transitioning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub records: u64,
    pub frames: u64,
    pub duration_ms: u64,
    pub final_height: f64,
    pub final_mode: &'static str,
}

struct Replayer<'w, W: Write> {
    sheet: Sheet,
    notices: Rc<RefCell<Vec<Notice>>>,
    out: &'w mut W,
    frame: Duration,
    frame_ms: u64,
    t_ms: u64,
    seq: u64,
    frames: u64,
}

/// Replay `trace`, writing JSONL records to `out`.
pub fn replay_trace<W: Write>(
    trace: &Trace,
    frame_ms_override: Option<u64>,
    out: &mut W,
) -> Result<ReplaySummary> {
    let frame_ms = trace.frame_ms(frame_ms_override);
    check_frame_ms(frame_ms)?;

    let notices = Rc::new(RefCell::new(Vec::new()));
    let height_sink = Rc::clone(&notices);
    let mode_sink = Rc::clone(&notices);
    let sheet = Sheet::new(trace.config.clone())?
        .on_height_change(move |h| height_sink.borrow_mut().push(Notice::Height(h)))
        .on_content_mode_change(move |m| mode_sink.borrow_mut().push(Notice::Mode(m)));

    let mut replayer = Replayer {
        sheet,
        notices,
        out,
        frame: Duration::from_millis(frame_ms),
        frame_ms,
        t_ms: 0,
        seq: 0,
        frames: 0,
    };

    tracing::info!(
        target: "snapsheet.harness",
        steps = trace.steps.len(),
        frame_ms,
        "replay started"
    );
    for (index, step) in trace.steps.iter().enumerate() {
        tracing::debug!(target: "snapsheet.harness", index, ?step, "step");
        replayer.step(step)?;
    }
    replayer.out.flush()?;

    let summary = ReplaySummary {
        records: replayer.seq,
        frames: replayer.frames,
        duration_ms: replayer.t_ms,
        final_height: replayer.sheet.current_height(),
        final_mode: replayer.sheet.frame().mode.name(),
    };
    tracing::info!(
        target: "snapsheet.harness",
        records = summary.records,
        frames = summary.frames,
        final_height = summary.final_height,
        "replay finished"
    );
    Ok(summary)
}

impl<W: Write> Replayer<'_, W> {
    fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Drag(event) => {
                self.sheet.handle_drag(*event);
                self.emit(match event.phase {
                    DragPhase::Start => "drag_start",
                    DragPhase::Update => "drag_update",
                    DragPhase::End => "drag_end",
                    DragPhase::Cancel => "drag_cancel",
                })
            }
            Step::WaitMs(ms) => {
                check_wait_ms(*ms)?;
                for _ in 0..ms.div_ceil(self.frame_ms) {
                    self.tick()?;
                }
                Ok(())
            }
            Step::SnapTo(snap) => {
                self.sheet.animate_to_snap_point(snap.index, snap.animation)?;
                self.emit("snap_to")
            }
            Step::Settle(settle) => {
                let budget = settle.max_frames.unwrap_or(DEFAULT_SETTLE_FRAMES);
                for _ in 0..budget {
                    if self.is_quiet() {
                        return Ok(());
                    }
                    self.tick()?;
                }
                if self.is_quiet() {
                    Ok(())
                } else {
                    Err(HarnessError::SettleTimeout { frames: budget })
                }
            }
        }
    }

    fn is_quiet(&self) -> bool {
        let frame = self.sheet.frame();
        !frame.is_animating && !frame.is_transitioning
    }

    fn tick(&mut self) -> Result<()> {
        self.sheet.tick(self.frame);
        self.t_ms += self.frame_ms;
        self.frames += 1;
        self.emit("frame")
    }

    /// Write pending callback records, then a record for `event`.
    fn emit(&mut self, event: &'static str) -> Result<()> {
        let pending: Vec<Notice> = self.notices.borrow_mut().drain(..).collect();
        for notice in pending {
            let event = match notice {
                Notice::Height(_) => "height_changed",
                Notice::Mode(_) => "mode_changed",
            };
            self.write(event)?;
        }
        self.write(event)
    }

    fn write(&mut self, event: &'static str) -> Result<()> {
        let frame = self.sheet.frame();
        let record = Record {
            seq: self.seq,
            t_ms: self.t_ms,
            event,
            height: frame.height,
            translate_y: frame.translate_y,
            mode: frame.mode.name(),
            animating: frame.is_animating,
            dragging: frame.is_dragging,
            transitioning: frame.is_transitioning,
        };
        serde_json::to_writer(&mut *self.out, &record)?;
        writeln!(self.out)?;
        self.seq += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use snapsheet_core::SheetConfig;

    fn run(json: &str) -> (ReplaySummary, Vec<Value>) {
        let trace = Trace::from_json_str(json).unwrap();
        let mut out = Vec::new();
        let summary = replay_trace(&trace, None, &mut out).unwrap();
        let records = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, records)
    }

    fn events(records: &[Value]) -> Vec<&str> {
        records.iter().map(|r| r["event"].as_str().unwrap()).collect()
    }

    #[test]
    fn drag_release_settles_on_700() {
        let (summary, records) = run(
            r#"{"steps": [
                {"drag": {"phase": "start"}},
                {"drag": {"phase": "update", "translation_y": -350}},
                {"drag": {"phase": "end", "translation_y": -350}},
                {"settle": {}}
            ]}"#,
        );
        assert_eq!(summary.final_height, 700.0);
        assert_eq!(summary.final_mode, "expanded");
        let ev = events(&records);
        assert_eq!(&ev[..2], ["drag_start", "mode_changed"]);
        assert_eq!(ev.iter().filter(|e| **e == "height_changed").count(), 1);
        let seqs: Vec<u64> = records.iter().map(|r| r["seq"].as_u64().unwrap()).collect();
        assert!(seqs.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn wait_rounds_up_to_whole_frames() {
        let (summary, _) = run(r#"{"frame_ms": 16, "steps": [{"wait_ms": 40}]}"#);
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.duration_ms, 48);
    }

    #[test]
    fn unvalidated_long_wait_fails_fast() {
        let trace = Trace {
            config: SheetConfig::default(),
            frame_ms: None,
            steps: vec![Step::WaitMs(u64::MAX)],
        };
        let err = replay_trace(&trace, None, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidTrace { .. }));
    }

    #[test]
    fn frame_override_wins() {
        let trace = Trace::from_json_str(r#"{"frame_ms": 16, "steps": [{"wait_ms": 40}]}"#).unwrap();
        let summary = replay_trace(&trace, Some(10), &mut Vec::new()).unwrap();
        assert_eq!(summary.frames, 4);
    }

    #[test]
    fn settle_timeout_reported() {
        let trace = Trace::from_json_str(
            r#"{"steps": [{"snap_to": {"index": 2, "animation": "gentle"}}, {"settle": {"max_frames": 2}}]}"#,
        )
        .unwrap();
        let err = replay_trace(&trace, None, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, HarnessError::SettleTimeout { frames: 2 }));
    }

    #[test]
    fn bad_snap_index_fails() {
        let trace = Trace::from_json_str(r#"{"steps": [{"snap_to": {"index": 9}}]}"#).unwrap();
        let err = replay_trace(&trace, None, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, HarnessError::Sheet(_)));
    }

    #[test]
    fn translate_matches_height_in_every_record() {
        let (_, records) = run(
            r#"{"steps": [{"snap_to": {"index": 2, "animation": "bouncy"}}, {"settle": {}}]}"#,
        );
        for r in &records {
            let h = r["height"].as_f64().unwrap();
            let t = r["translate_y"].as_f64().unwrap();
            assert_eq!(t, 900.0 - h);
        }
    }

    #[test]
    fn replay_is_deterministic() {
        let json = r#"{"steps": [
            {"drag": {"phase": "start"}},
            {"drag": {"phase": "update", "translation_y": -120, "velocity_y": -1400}},
            {"drag": {"phase": "end", "translation_y": -120, "velocity_y": -1400}},
            {"wait_ms": 64},
            {"drag": {"phase": "start"}},
            {"drag": {"phase": "cancel"}},
            {"settle": {}}
        ]}"#;
        assert_eq!(run(json).1, run(json).1);
    }
}
