//! Calibration point measurements.

use serde::{Deserialize, Serialize};

/// One calibrator level's measurement.
///
/// Points are ordered by calibrator level; index 0 is the lowest (blank) level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    /// Calibrator concentration.
    pub concentration: f64,

    /// Mean absorbance over the replicate readings.
    pub mean_absorbance: f64,

    /// First and second replicate readings, kept for audit display.
    #[serde(default)]
    pub replicate_absorbances: [f64; 2],
}

impl CalibrationPoint {
    /// Create a point whose replicates both equal the mean.
    pub fn new(concentration: f64, mean_absorbance: f64) -> Self {
        Self {
            concentration,
            mean_absorbance,
            replicate_absorbances: [mean_absorbance, mean_absorbance],
        }
    }

    /// Create a point from two replicate readings, averaging them.
    pub fn from_replicates(concentration: f64, first: f64, second: f64) -> Self {
        Self {
            concentration,
            mean_absorbance: (first + second) / 2.0,
            replicate_absorbances: [first, second],
        }
    }
}
