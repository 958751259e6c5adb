use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use snapsheet_core::SheetConfig;

use crate::error::Result;
use crate::logging::{self, LogFormat};
use crate::replay::replay_trace;
use crate::trace::Trace;

#[derive(Debug, Parser)]
#[command(
    name = "snapsheet-harness",
    about = "Replay recorded drag traces against the snapsheet engine",
    version
)]
pub struct Cli {
    /// Diagnostic log format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a trace file and emit per-frame JSONL.
    Replay(ReplayArgs),

    /// Print the default sheet configuration.
    Defaults(DefaultsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Trace file (JSON).
    #[arg(long)]
    pub trace: PathBuf,

    /// Write JSONL here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Override the trace's frame interval, in milliseconds.
    #[arg(long)]
    pub frame_ms: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct DefaultsArgs {
    /// Print JSON instead of TOML.
    #[arg(long)]
    pub json: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => run_replay(&args),
        Commands::Defaults(args) => run_defaults(&args),
    }
}

pub fn run_replay(args: &ReplayArgs) -> Result<()> {
    let trace = Trace::from_file(&args.trace)?;
    let summary = match &args.out {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            replay_trace(&trace, args.frame_ms, &mut out)?
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            replay_trace(&trace, args.frame_ms, &mut out)?
        }
    };
    tracing::info!(
        target: "snapsheet.harness",
        trace = %args.trace.display(),
        records = summary.records,
        "wrote records"
    );
    Ok(())
}

pub fn run_defaults(args: &DefaultsArgs) -> Result<()> {
    let config = SheetConfig::default();
    let text = if args.json {
        serde_json::to_string_pretty(&config)?
    } else {
        config.to_toml_string()?
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{text}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use tempfile::tempdir;

    #[test]
    fn parses_replay_flags() {
        let cli = Cli::try_parse_from([
            "snapsheet-harness",
            "replay",
            "--trace",
            "t.json",
            "--frame-ms",
            "8",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.trace, PathBuf::from("t.json"));
                assert_eq!(args.frame_ms, Some(8));
                assert!(args.out.is_none());
            }
            Commands::Defaults(_) => panic!("expected replay"),
        }
    }

    #[test]
    fn replay_requires_trace() {
        assert!(Cli::try_parse_from(["snapsheet-harness", "replay"]).is_err());
    }

    #[test]
    fn missing_trace_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = run_replay(&ReplayArgs {
            trace: dir.path().join("absent.json"),
            out: None,
            frame_ms: None,
        })
        .unwrap_err();
        assert!(matches!(err, HarnessError::MissingTrace { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn replay_writes_out_file() {
        let dir = tempdir().unwrap();
        let trace = dir.path().join("trace.json");
        let out = dir.path().join("out.jsonl");
        std::fs::write(&trace, r#"{"steps": [{"snap_to": {"index": 1}}, {"settle": {}}]}"#).unwrap();
        run_replay(&ReplayArgs {
            trace,
            out: Some(out.clone()),
            frame_ms: None,
        })
        .unwrap();
        let written = std::fs::read_to_string(out).unwrap();
        let last: serde_json::Value =
            serde_json::from_str(written.lines().last().unwrap()).unwrap();
        assert_eq!(last["height"], 700.0);
    }
}
