use std::path::PathBuf;

use snapsheet_core::SheetError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("trace file does not exist: {path}")]
    MissingTrace { path: PathBuf },

    #[error("invalid trace: {message}")]
    InvalidTrace { message: String },

    #[error("sheet did not settle within {frames} frames")]
    SettleTimeout { frames: u32 },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Json(_) | Self::InvalidTrace { .. } | Self::MissingTrace { .. } => 2,
            Self::Sheet(err) if err.is_misconfiguration() => 3,
            Self::SettleTimeout { .. } => 4,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidTrace {
            message: message.into(),
        }
    }
}
