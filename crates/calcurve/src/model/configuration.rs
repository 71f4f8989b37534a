//! Curve configuration: the value a curve model is built from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, Result};

use super::point::CalibrationPoint;

/// Which subset of calibrator levels is run and how the first point is sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Only the blank level is rerun; the first point comes from a span measurement.
    Blank,
    /// Two levels are run.
    TwoPoint,
    /// Span level only.
    SpanPoint,
    /// Every calibrator level is run.
    FullDot,
    /// Calibration derived without a dedicated calibrator run.
    Intelligent,
}

impl CalibrationMode {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CalibrationMode::Blank => "Blank",
            CalibrationMode::TwoPoint => "Two Point",
            CalibrationMode::SpanPoint => "Span Point",
            CalibrationMode::FullDot => "Full Dot",
            CalibrationMode::Intelligent => "Intelligent",
        }
    }
}

/// Reaction analysis method of the assay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    RateA,
    OnePoint,
    TwoPoint,
    TwoPointRate,
    RateAWithSampleBlank,
}

/// Regression family used to fit the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationType {
    OnePointLinear,
    TwoPointLinear,
    MultiPointLinear,
    LogitLog3P,
    LogitLog4P,
    LogitLog5P,
    Exponential,
    Spline,
    Akima,
    Pchip,
}

impl CalibrationType {
    /// Check if this is one of the strictly linear types that may be hand-edited.
    pub fn is_linear(&self) -> bool {
        matches!(
            self,
            CalibrationType::OnePointLinear
                | CalibrationType::TwoPointLinear
                | CalibrationType::MultiPointLinear
        )
    }
}

/// The configuration a curve model is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfiguration {
    /// Calibration mode of the run that produced the curve.
    pub calibration_mode: CalibrationMode,

    /// Analysis method of the assay.
    pub analysis_method: AnalysisMethod,

    /// Regression family.
    pub calibration_type: CalibrationType,

    /// Calibration points in level order.
    #[serde(default)]
    pub original_points: Vec<CalibrationPoint>,

    /// Alternate point set; only consulted in Blank mode to override index 0.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spanned_points: Vec<CalibrationPoint>,

    /// Named model coefficients (e.g. "k", "b").
    #[serde(default)]
    pub model_parameters: IndexMap<String, f64>,
}

impl CurveConfiguration {
    /// Create an empty configuration.
    pub fn new(
        calibration_mode: CalibrationMode,
        analysis_method: AnalysisMethod,
        calibration_type: CalibrationType,
    ) -> Self {
        Self {
            calibration_mode,
            analysis_method,
            calibration_type,
            original_points: Vec::new(),
            spanned_points: Vec::new(),
            model_parameters: IndexMap::new(),
        }
    }

    /// Set the calibration points.
    pub fn with_points(mut self, points: Vec<CalibrationPoint>) -> Self {
        self.original_points = points;
        self
    }

    /// Set the spanned (Blank-mode) points.
    pub fn with_spanned_points(mut self, points: Vec<CalibrationPoint>) -> Self {
        self.spanned_points = points;
        self
    }

    /// Add a named model parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.model_parameters.insert(name.into(), value);
        self
    }

    /// Look up a model parameter by name.
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.model_parameters.get(name).copied()
    }

    /// Whether index 0 of the emitted points comes from the spanned set.
    pub fn substitutes_blank(&self) -> bool {
        self.calibration_mode == CalibrationMode::Blank
            && self.spanned_points.len() > 1
            && self.original_points.len() > 1
    }

    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored JSON configuration.
    pub fn from_json(serialized: &str) -> Result<Self> {
        serde_json::from_str(serialized).map_err(|e| {
            CurveError::MalformedConfiguration(format!("Failed to parse curve configuration: {}", e))
        })
    }
}
