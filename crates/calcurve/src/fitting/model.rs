//! Curve model traits and initialization payloads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::assay::SampleAspirateVolume;
use crate::error::Result;
use crate::model::{AnalysisMethod, CalibrationType, CurveConfiguration};

/// Analysis-point thresholds passed to a model. Unset values are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPointConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_pre_point: Option<i32>,
}

/// Total volume aspirated at one reagent stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageVolume {
    /// Stage index: R1 = 1, R2 = 2, R3 = 3, anything else = 4.
    pub stage: u8,
    /// Reagent plus diluent volume.
    pub volume: f64,
}

/// Everything a model needs to initialize without calibrator measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializationPayload {
    pub calibration_type: CalibrationType,
    pub analysis_method: AnalysisMethod,
    pub analysis_points: AnalysisPointConfig,
    pub reagent_volumes: Vec<StageVolume>,
    pub sample_volumes: Vec<SampleAspirateVolume>,
    pub model_parameters: IndexMap<String, f64>,
}

/// A fitted response model: concentration in, absorbance out.
pub trait CurveModel: Send + Sync {
    /// Forward evaluation: concentration to absorbance.
    fn evaluate(&self, concentration: f64) -> f64;

    /// Named coefficients of the fit.
    fn parameters(&self) -> IndexMap<String, f64>;

    /// The configuration this model was built from.
    fn configuration(&self) -> &CurveConfiguration;
}

/// Builds curve models from configurations.
///
/// Implementations cover one or more calibration types; fitting for the
/// non-linear families lives outside this crate.
pub trait CurveModelFactory: Send + Sync {
    /// Build a model from a stored configuration.
    fn build(&self, configuration: &CurveConfiguration) -> Result<Box<dyn CurveModel>>;

    /// Produce a serialized configuration from manually supplied coefficients.
    ///
    /// Fails with [`CurveError::MalformedConfiguration`](crate::CurveError::MalformedConfiguration)
    /// when the payload is incomplete.
    fn initialize_without_calibration(&self, payload: &InitializationPayload) -> Result<String>;

    /// Get the name of this factory (for logging/debugging).
    fn name(&self) -> &str;
}
