//! Trace file format.
//!
//! A trace is a JSON document describing a sheet configuration and a list
//! of steps to feed it:
//!
//! ```json
//! {
//!   "config": { "initial_height": 300 },
//!   "frame_ms": 16,
//!   "steps": [
//!     { "drag": { "phase": "start" } },
//!     { "drag": { "phase": "update", "translation_y": -350, "velocity_y": -200 } },
//!     { "drag": { "phase": "end", "translation_y": -350, "velocity_y": -200 } },
//!     { "wait_ms": 100 },
//!     { "snap_to": { "index": 0, "animation": "bouncy" } },
//!     { "settle": {} }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use snapsheet_core::{AnimationType, DragEvent, SheetConfig};

use crate::error::{HarnessError, Result};

/// Frame interval used when neither the trace nor the CLI sets one.
pub const DEFAULT_FRAME_MS: u64 = 16;

/// Longest accepted frame interval.
pub const MAX_FRAME_MS: u64 = 1_000;

/// Longest accepted `wait_ms` step.
pub const MAX_WAIT_MS: u64 = 60_000;

/// Frame budget for a `settle` step without `max_frames`.
pub const DEFAULT_SETTLE_FRAMES: u32 = 600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub config: SheetConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_ms: Option<u64>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Drag(DragEvent),
    WaitMs(u64),
    SnapTo(SnapTo),
    Settle(Settle),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapTo {
    pub index: usize,
    #[serde(default)]
    pub animation: AnimationType,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Settle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_frames: Option<u32>,
}

impl Trace {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let trace: Self = serde_json::from_str(s)?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HarnessError::MissingTrace {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Frame interval, preferring `override_ms` over the trace's own value.
    #[must_use]
    pub fn frame_ms(&self, override_ms: Option<u64>) -> u64 {
        override_ms.or(self.frame_ms).unwrap_or(DEFAULT_FRAME_MS)
    }

    fn validate(&self) -> Result<()> {
        if let Some(ms) = self.frame_ms {
            check_frame_ms(ms)?;
        }
        if self.steps.is_empty() {
            return Err(HarnessError::invalid("trace has no steps"));
        }
        for step in &self.steps {
            if let Step::WaitMs(ms) = step {
                check_wait_ms(*ms)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn check_frame_ms(ms: u64) -> Result<()> {
    if ms == 0 || ms > MAX_FRAME_MS {
        return Err(HarnessError::invalid(format!(
            "frame_ms must be within 1..={MAX_FRAME_MS}, got {ms}"
        )));
    }
    Ok(())
}

pub(crate) fn check_wait_ms(ms: u64) -> Result<()> {
    if ms > MAX_WAIT_MS {
        return Err(HarnessError::invalid(format!(
            "wait_ms must be at most {MAX_WAIT_MS}, got {ms}"
        )));
    }
    Ok(())
}
