//! Discrete calibrator point series.

use crate::error::{CurveError, Result};
use crate::model::{CalibrationPoint, Curve};

use super::series::SeriesPoint;

/// Calibration points to emit, with the Blank-mode span point at index 0.
fn emitted_points(curve: &Curve) -> Result<Vec<CalibrationPoint>> {
    let config = &curve.configuration;
    if config.original_points.is_empty() {
        return Err(CurveError::InsufficientPoints(format!(
            "curve {} has no calibration points",
            curve.id
        )));
    }

    let mut points = config.original_points.clone();
    if config.substitutes_blank() {
        points[0] = config.spanned_points[0];
    }
    Ok(points)
}

/// Build the scatter series of a curve.
///
/// Points are emitted in level order as `(concentration, mean absorbance)`.
/// Blank-mode curves with at least two spanned and two original points take
/// their first point from the spanned set.
pub fn build_scatter(curve: &Curve) -> Result<Vec<SeriesPoint>> {
    Ok(emitted_points(curve)?
        .iter()
        .map(SeriesPoint::from)
        .collect())
}

/// Build a scatter series of both replicate readings of every level.
pub fn build_replicate_scatter(curve: &Curve) -> Result<Vec<SeriesPoint>> {
    Ok(emitted_points(curve)?
        .iter()
        .flat_map(|p| {
            p.replicate_absorbances
                .iter()
                .map(move |&y| SeriesPoint::new(p.concentration, y))
        })
        .collect())
}
