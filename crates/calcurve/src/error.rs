//! Error types for the calcurve library.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::CalibrationMode;

/// Main error type for curve engine operations.
///
/// A missing current curve is not an error; operations that can legitimately
/// find nothing return `Option` instead.
#[derive(Debug, Error)]
pub enum CurveError {
    /// The curve store returned a failure or could not be reached.
    #[error("Curve store unavailable: {0}")]
    StoreUnavailable(String),

    /// A curve was found but cannot be used for the requested operation.
    #[error("Ineligible curve: {0}")]
    IneligibleCurve(String),

    /// The curve model rejected a payload or a serialized configuration.
    #[error("Malformed configuration: {0}")]
    MalformedConfiguration(String),

    /// Not enough calibration points to build the requested series.
    #[error("Insufficient points: {0}")]
    InsufficientPoints(String),

    /// No continuous response is defined for this calibration mode.
    #[error("No continuous curve is defined for {0:?} calibrations")]
    UnsupportedMode(CalibrationMode),

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error saving or loading a store snapshot.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias for curve engine operations.
pub type Result<T> = std::result::Result<T, CurveError>;
