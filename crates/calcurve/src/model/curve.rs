//! Persisted calibration curves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::configuration::CurveConfiguration;
use super::reagent::ReagentKeyInfo;

/// How a curve is used at the assay (project) or lot level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveUsage {
    Main,
    Standby,
    #[default]
    None,
}

/// Link from a calibrator level to the test result measured for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibratorResultRef {
    /// Calibrator level (1-based as reported by the analyzer).
    pub level: i32,
    /// Test result record id.
    pub test_result_id: i64,
}

/// A persisted calibration result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// Store-assigned identifier.
    pub id: i64,

    /// Analyzer that ran the calibration.
    pub device_serial: String,

    /// Assay the curve belongs to.
    pub assay_code: i32,

    /// Lot and serial of the reagent bottle used.
    pub reagent_key: ReagentKeyInfo,

    /// Lot of the calibrator material; empty for edit curves.
    #[serde(default)]
    pub calibrator_lot: String,

    /// When the calibration was performed.
    pub calibration_timestamp: DateTime<Utc>,

    /// Reagent version the curve was produced with.
    pub version: i32,

    /// Assay-level usage flag.
    #[serde(default)]
    pub usage_as_project_curve: CurveUsage,

    /// Lot-level usage flag.
    #[serde(default)]
    pub usage_as_lot_curve: CurveUsage,

    /// Built from manually entered coefficients rather than a calibrator run.
    #[serde(default)]
    pub is_edit_curve: bool,

    /// Why the calibration failed; empty when it succeeded.
    #[serde(default)]
    pub failed_reason: String,

    /// Set when assay parameters changed after the curve was produced.
    #[serde(default)]
    pub cali_paras_changed: bool,

    /// Model configuration.
    pub configuration: CurveConfiguration,

    /// Test results measured for each calibrator level.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calibration_results: Vec<CalibratorResultRef>,
}

impl Curve {
    /// Create a successful, unflagged curve timestamped now. The store assigns the id.
    pub fn new(
        device_serial: impl Into<String>,
        assay_code: i32,
        version: i32,
        reagent_key: ReagentKeyInfo,
        configuration: CurveConfiguration,
    ) -> Self {
        Self {
            id: 0,
            device_serial: device_serial.into(),
            assay_code,
            reagent_key,
            calibrator_lot: String::new(),
            calibration_timestamp: Utc::now(),
            version,
            usage_as_project_curve: CurveUsage::None,
            usage_as_lot_curve: CurveUsage::None,
            is_edit_curve: false,
            failed_reason: String::new(),
            cali_paras_changed: false,
            configuration,
            calibration_results: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.calibration_timestamp = timestamp;
        self
    }

    pub fn with_calibrator_lot(mut self, lot: impl Into<String>) -> Self {
        self.calibrator_lot = lot.into();
        self
    }

    /// Set the assay-level and lot-level usage flags.
    pub fn with_usage(mut self, project: CurveUsage, lot: CurveUsage) -> Self {
        self.usage_as_project_curve = project;
        self.usage_as_lot_curve = lot;
        self
    }

    pub fn as_edit_curve(mut self) -> Self {
        self.is_edit_curve = true;
        self
    }

    pub fn with_failed_reason(mut self, reason: impl Into<String>) -> Self {
        self.failed_reason = reason.into();
        self
    }

    pub fn with_cali_paras_changed(mut self, changed: bool) -> Self {
        self.cali_paras_changed = changed;
        self
    }

    /// Reference a test result measured for a calibrator level.
    pub fn with_calibration_result(mut self, level: i32, test_result_id: i64) -> Self {
        self.calibration_results.push(CalibratorResultRef {
            level,
            test_result_id,
        });
        self
    }

    /// Whether the calibration run succeeded.
    pub fn is_successful(&self) -> bool {
        self.failed_reason.is_empty()
    }

    /// Whether this curve may be promoted to a reagent's current curve.
    pub fn is_promotable(&self) -> bool {
        !self.is_edit_curve && !self.cali_paras_changed && self.is_successful()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisMethod, CalibrationMode, CalibrationType};

    fn curve() -> Curve {
        let config = CurveConfiguration::new(
            CalibrationMode::FullDot,
            AnalysisMethod::RateA,
            CalibrationType::LogitLog4P,
        );
        Curve::new("DEV1", 101, 1, ReagentKeyInfo::new("L01", "S01"), config)
    }

    #[test]
    fn test_new_curve_is_promotable() {
        let curve = curve();
        assert!(curve.is_successful());
        assert!(curve.is_promotable());
        assert_eq!(curve.usage_as_project_curve, CurveUsage::None);
    }

    #[test]
    fn test_flags_block_promotion() {
        assert!(!curve().with_cali_paras_changed(true).is_promotable());
        assert!(!curve().as_edit_curve().is_promotable());
        assert!(!curve().with_failed_reason("absorbance out of range").is_promotable());
    }
}
