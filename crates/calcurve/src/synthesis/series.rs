//! Drawable series types.

use serde::{Deserialize, Serialize};

use crate::model::CalibrationPoint;

/// One plotted point: concentration on x, absorbance on y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

impl SeriesPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<&CalibrationPoint> for SeriesPoint {
    fn from(point: &CalibrationPoint) -> Self {
        Self {
            x: point.concentration,
            y: point.mean_absorbance,
        }
    }
}

/// Both series needed to draw a curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSeries {
    /// Calibrator points as measured.
    pub scatter: Vec<SeriesPoint>,
    /// Simulated response sampled from the model; may be empty.
    pub continuous: Vec<SeriesPoint>,
}

impl CurveSeries {
    /// Whether a continuous line can be drawn.
    pub fn has_continuous(&self) -> bool {
        !self.continuous.is_empty()
    }
}
