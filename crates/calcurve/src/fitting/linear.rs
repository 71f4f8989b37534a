//! Linear response model (`absorbance = k * concentration + b`).

use indexmap::IndexMap;

use crate::error::{CurveError, Result};
use crate::model::{CalibrationMode, CurveConfiguration};

use super::model::{CurveModel, CurveModelFactory, InitializationPayload};

/// Linear model over the "k" and "b" parameters of a configuration.
#[derive(Debug, Clone)]
pub struct LinearCurveModel {
    configuration: CurveConfiguration,
    k: f64,
    b: f64,
}

impl LinearCurveModel {
    /// Build from a configuration carrying "k" and "b".
    pub fn from_configuration(configuration: CurveConfiguration) -> Result<Self> {
        if !configuration.calibration_type.is_linear() {
            return Err(CurveError::MalformedConfiguration(format!(
                "{:?} is not a linear calibration type",
                configuration.calibration_type
            )));
        }

        let k = required_parameter(&configuration.model_parameters, "k")?;
        let b = required_parameter(&configuration.model_parameters, "b")?;

        Ok(Self { configuration, k, b })
    }

    pub fn slope(&self) -> f64 {
        self.k
    }

    pub fn intercept(&self) -> f64 {
        self.b
    }
}

impl CurveModel for LinearCurveModel {
    fn evaluate(&self, concentration: f64) -> f64 {
        self.k * concentration + self.b
    }

    fn parameters(&self) -> IndexMap<String, f64> {
        let mut params = IndexMap::new();
        params.insert("k".to_string(), self.k);
        params.insert("b".to_string(), self.b);
        params
    }

    fn configuration(&self) -> &CurveConfiguration {
        &self.configuration
    }
}

/// Factory for the strictly linear calibration types.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearModelFactory;

impl LinearModelFactory {
    pub fn new() -> Self {
        Self
    }
}

impl CurveModelFactory for LinearModelFactory {
    fn build(&self, configuration: &CurveConfiguration) -> Result<Box<dyn CurveModel>> {
        Ok(Box::new(LinearCurveModel::from_configuration(configuration.clone())?))
    }

    fn initialize_without_calibration(&self, payload: &InitializationPayload) -> Result<String> {
        if payload.sample_volumes.is_empty() {
            return Err(CurveError::MalformedConfiguration(
                "sample aspirate volumes are required".to_string(),
            ));
        }

        // Edit curves carry no calibrator points; the coefficients are the whole model.
        let mut configuration = CurveConfiguration::new(
            CalibrationMode::FullDot,
            payload.analysis_method,
            payload.calibration_type,
        );
        configuration.model_parameters = payload.model_parameters.clone();

        let model = LinearCurveModel::from_configuration(configuration)?;
        model.configuration.to_json()
    }

    fn name(&self) -> &str {
        "linear"
    }
}

fn required_parameter(params: &IndexMap<String, f64>, name: &str) -> Result<f64> {
    let value = params.get(name).copied().ok_or_else(|| {
        CurveError::MalformedConfiguration(format!("missing model parameter '{}'", name))
    })?;

    if !value.is_finite() {
        return Err(CurveError::MalformedConfiguration(format!(
            "model parameter '{}' is not finite",
            name
        )));
    }
    Ok(value)
}
