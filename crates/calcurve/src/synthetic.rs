//! Curves built from manually entered linear coefficients.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::assay::{AssayInfo, SpecialAssayInfo};
use crate::error::{CurveError, Result};
use crate::fitting::{AnalysisPointConfig, CurveModelFactory, InitializationPayload, StageVolume};
use crate::model::{Curve, CurveConfiguration, CurveSource, ReagentBinding};
use crate::store::{CurveStore, ReagentBindingUpdate};

/// A persisted edit curve.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticCurve {
    pub id: i64,
    pub curve: Curve,
}

impl SyntheticCurve {
    /// The update that points a reagent at this curve with source Edit.
    pub fn binding_update(&self, binding: &ReagentBinding) -> ReagentBindingUpdate {
        ReagentBindingUpdate {
            device_serial: binding.device_serial.clone(),
            assay_code: binding.assay_code,
            reagent_key: binding.reagent_key.clone(),
            current_curve_id: Some(self.id),
            curve_source: Some(CurveSource::Edit),
        }
    }
}

/// Build the model initialization payload for a hand-entered `k`/`b` pair.
///
/// Fails when the assay's calibration type is not linear, when `k` is zero,
/// and when the special assay has no sample aspirate volumes.
pub fn linear_payload(
    assay: &AssayInfo,
    special: &SpecialAssayInfo,
    k: f64,
    b: f64,
) -> Result<InitializationPayload> {
    if !assay.calibration_type.is_linear() {
        return Err(CurveError::IneligibleCurve(format!(
            "{:?} curve is non-linear and cannot be hand-edited",
            assay.calibration_type
        )));
    }
    if k == 0.0 {
        return Err(CurveError::IneligibleCurve("slope k must not be zero".to_string()));
    }
    if special.sample_aspirate_volumes.is_empty() {
        return Err(CurveError::MalformedConfiguration(format!(
            "assay {} has no sample aspirate volumes",
            assay.code
        )));
    }

    let points = &assay.analysis_points;
    let configured = |value: i32| (value >= 1).then_some(value);
    let analysis_points = AnalysisPointConfig {
        m: configured(points.m),
        n: configured(points.n),
        p: configured(points.p),
        q: configured(points.q),
        take_pre_point: configured(points.take_pre_point),
    };

    let reagent_volumes = assay
        .reagent_aspirate_volumes
        .iter()
        .map(|v| StageVolume {
            stage: v.stage.index(),
            volume: v.reagent + v.diluent,
        })
        .collect();

    let mut model_parameters = IndexMap::new();
    model_parameters.insert("k".to_string(), k);
    model_parameters.insert("b".to_string(), b);

    Ok(InitializationPayload {
        calibration_type: assay.calibration_type,
        analysis_method: assay.analysis_method,
        analysis_points,
        reagent_volumes,
        sample_volumes: special.sample_aspirate_volumes.clone(),
        model_parameters,
    })
}

/// Fabricates edit curves for linear assays without a calibrator run.
pub struct SyntheticCurveBuilder {
    store: Arc<dyn CurveStore>,
    factory: Arc<dyn CurveModelFactory>,
}

impl SyntheticCurveBuilder {
    pub fn new(store: Arc<dyn CurveStore>, factory: Arc<dyn CurveModelFactory>) -> Self {
        Self { store, factory }
    }

    /// Build the curve configuration for a `k`/`b` pair.
    pub fn build_linear_configuration(
        &self,
        assay: &AssayInfo,
        special: &SpecialAssayInfo,
        k: f64,
        b: f64,
    ) -> Result<CurveConfiguration> {
        let payload = linear_payload(assay, special, k, b)?;

        let serialized = self
            .factory
            .initialize_without_calibration(&payload)
            .map_err(|e| {
                warn!(
                    assay_code = assay.code,
                    factory = self.factory.name(),
                    "curve model rejected payload: {}",
                    e
                );
                as_malformed(e)
            })?;

        CurveConfiguration::from_json(&serialized)
    }

    /// Build and persist an edit curve for the reagent.
    ///
    /// The curve is timestamped now, has no usage flags and no calibrator lot,
    /// and takes its reagent lot and serial from the binding.
    ///
    /// The reagent's current curve is not repointed; callers apply
    /// [`SyntheticCurve::binding_update`] themselves.
    pub fn build_linear_curve(
        &self,
        binding: &ReagentBinding,
        assay: &AssayInfo,
        special: &SpecialAssayInfo,
        k: f64,
        b: f64,
    ) -> Result<SyntheticCurve> {
        let configuration = self.build_linear_configuration(assay, special, k, b)?;

        let curve = Curve::new(
            binding.device_serial.clone(),
            binding.assay_code,
            binding.reagent_version,
            binding.reagent_key.clone(),
            configuration,
        )
        .as_edit_curve();

        let id = self.store.add_curve(curve.clone())?;
        info!(
            curve_id = id,
            assay_code = binding.assay_code,
            lot = %binding.reagent_key.lot,
            "stored edit curve"
        );

        Ok(SyntheticCurve {
            id,
            curve: curve.with_id(id),
        })
    }
}

/// Report a model-layer failure as a malformed configuration.
pub(crate) fn as_malformed(error: CurveError) -> CurveError {
    match error {
        CurveError::MalformedConfiguration(_) => error,
        other => CurveError::MalformedConfiguration(other.to_string()),
    }
}
