//! Turning a resolved curve into drawable data.
//!
//! A curve is drawn as two series: the calibrator points it was fitted from
//! (scatter) and a densely sampled response of its model (continuous). The
//! continuous series is for display only; it is not a second calibration.

mod continuous;
mod cups;
mod scatter;
mod series;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::assay::AssayCatalog;
use crate::error::{CurveError, Result};
use crate::fitting::CurveModel;
use crate::model::Curve;
use crate::store::CurveStore;

pub use continuous::{build_continuous, CONTINUOUS_RESOLUTION};
pub use cups::{extract_cup_info, CupDiagnostics};
pub use scatter::{build_replicate_scatter, build_scatter};
pub use series::{CurveSeries, SeriesPoint};

/// Builds drawable series and calibrator diagnostics for curves.
pub struct CurveDataSynthesizer {
    store: Arc<dyn CurveStore>,
    assays: Arc<dyn AssayCatalog>,
    resolution: usize,
}

impl CurveDataSynthesizer {
    pub fn new(store: Arc<dyn CurveStore>, assays: Arc<dyn AssayCatalog>) -> Self {
        Self {
            store,
            assays,
            resolution: CONTINUOUS_RESOLUTION,
        }
    }

    /// Set the number of sampling intervals of the continuous series.
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Scatter series of a curve.
    pub fn build_scatter(&self, curve: &Curve) -> Result<Vec<SeriesPoint>> {
        build_scatter(curve)
    }

    /// Continuous series sampled from a model.
    pub fn build_continuous(
        &self,
        scatter: &[SeriesPoint],
        model: &dyn CurveModel,
    ) -> Result<Vec<SeriesPoint>> {
        build_continuous(scatter, model, self.resolution)
    }

    /// Both series of a curve.
    ///
    /// Fails only when the scatter series cannot be built. When no
    /// continuous series can be sampled and the curve has exactly two
    /// points, the scatter doubles as the continuous series.
    pub fn build_series(&self, curve: &Curve, model: &dyn CurveModel) -> Result<CurveSeries> {
        let scatter = build_scatter(curve)?;
        Ok(self.series_from_scatter(curve, scatter, Some(model)))
    }

    /// Complete a scatter series with its continuous counterpart.
    ///
    /// Without a model, only the two-point fallback can produce a
    /// continuous series.
    pub fn series_from_scatter(
        &self,
        curve: &Curve,
        scatter: Vec<SeriesPoint>,
        model: Option<&dyn CurveModel>,
    ) -> CurveSeries {
        let sampled = match model {
            Some(model) => build_continuous(&scatter, model, self.resolution),
            None => Err(CurveError::MalformedConfiguration(
                "no curve model available".to_string(),
            )),
        };

        let mut continuous = match sampled {
            Ok(series) => series,
            Err(e) => {
                debug!(curve_id = curve.id, "no continuous series: {}", e);
                Vec::new()
            }
        };

        if continuous.is_empty() && scatter.len() == 2 {
            continuous = scatter.clone();
        }

        CurveSeries {
            scatter,
            continuous,
        }
    }

    /// Cup diagnostics per calibrator level.
    pub fn extract_cup_info(&self, curve: &Curve) -> BTreeMap<i32, CupDiagnostics> {
        extract_cup_info(curve, self.store.as_ref(), self.assays.as_ref())
    }
}
