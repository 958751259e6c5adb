#![forbid(unsafe_code)]

//! Trace replay harness for `snapsheet-core`.
//!
//! Reads a JSON trace of drags, waits, and commands, drives a [`Sheet`] on a
//! deterministic frame clock, and writes one JSONL record per step, frame,
//! and callback.
//!
//! [`Sheet`]: snapsheet_core::Sheet

pub mod cli;
pub mod error;
pub mod logging;
pub mod replay;
pub mod trace;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{HarnessError, Result};
pub use replay::{Record, ReplaySummary, replay_trace};
pub use trace::{Step, Trace};
