#![forbid(unsafe_code)]

//! Sheet error model.
//!
//! Runtime operations on a sheet are infallible: heights are clamped, empty
//! snap configurations fall back to the bounds, and haptic failures are
//! swallowed. Errors exist only for misconfiguration (rejected at
//! construction), out-of-range programmatic commands, and config loading.

use thiserror::Error;

/// Result alias for sheet operations.
pub type Result<T> = std::result::Result<T, SheetError>;

/// Everything that can go wrong building or commanding a sheet.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("min_height ({min}) must not exceed max_height ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("initial_height ({initial}) must lie within [{min}, {max}]")]
    InitialOutOfRange { initial: f64, min: f64, max: f64 },

    #[error("screen_height must be finite and positive, got {0}")]
    InvalidScreenHeight(f64),

    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidDimension { field: &'static str, value: f64 },

    #[error("content thresholds must satisfy 0 <= compact ({compact}) <= expanded ({expanded}) <= 1")]
    InvalidThresholds { compact: f64, expanded: f64 },

    #[error("snap point index {index} out of range (have {len})")]
    SnapIndexOutOfRange { index: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[cfg(feature = "config")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SheetError {
    /// Whether this error comes from sheet configuration rather than I/O or
    /// parsing.
    #[must_use]
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::InvalidBounds { .. }
                | Self::InitialOutOfRange { .. }
                | Self::InvalidScreenHeight(_)
                | Self::InvalidDimension { .. }
                | Self::InvalidThresholds { .. }
        )
    }
}
