//! Simulated continuous response series.

use crate::error::{CurveError, Result};
use crate::fitting::CurveModel;
use crate::model::CalibrationMode;

use super::series::SeriesPoint;

/// Number of sampling intervals between the first and last point.
pub const CONTINUOUS_RESOLUTION: usize = 200;

/// Sample the forward model between the first scatter point and the last
/// relevant calibration point.
///
/// Only Blank (ending at the last spanned point) and FullDot (ending at the
/// last original point) calibrations have a continuous response. The series
/// has `resolution + 1` samples and its last x is exactly the end point.
pub fn build_continuous(
    scatter: &[SeriesPoint],
    model: &dyn CurveModel,
    resolution: usize,
) -> Result<Vec<SeriesPoint>> {
    let first = scatter
        .first()
        .ok_or_else(|| CurveError::InsufficientPoints("scatter series is empty".to_string()))?
        .x;

    let config = model.configuration();
    let last = match config.calibration_mode {
        CalibrationMode::Blank => match config.spanned_points.as_slice() {
            [.., end] if config.spanned_points.len() > 1 => end.concentration,
            _ => {
                return Err(CurveError::InsufficientPoints(
                    "blank calibration needs at least two spanned points".to_string(),
                ));
            }
        },
        CalibrationMode::FullDot => match config.original_points.as_slice() {
            [.., end] if config.original_points.len() > 1 => end.concentration,
            _ => {
                return Err(CurveError::InsufficientPoints(
                    "full-dot calibration needs at least two points".to_string(),
                ));
            }
        },
        mode => return Err(CurveError::UnsupportedMode(mode)),
    };

    if resolution == 0 {
        return Err(CurveError::Config(
            "continuous resolution must be positive".to_string(),
        ));
    }

    let step = (last - first) / resolution as f64;
    Ok((0..=resolution)
        .map(|i| {
            let x = if i == resolution { last } else { first + i as f64 * step };
            SeriesPoint::new(x, model.evaluate(x))
        })
        .collect())
}
