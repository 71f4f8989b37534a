//! Reagent context a curve is resolved against.

use serde::{Deserialize, Serialize};

/// Identity of a single reagent bottle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReagentKeyInfo {
    /// Reagent lot number.
    pub lot: String,
    /// Bottle serial number within the lot.
    pub serial_number: String,
}

impl ReagentKeyInfo {
    pub fn new(lot: impl Into<String>, serial_number: impl Into<String>) -> Self {
        Self {
            lot: lot.into(),
            serial_number: serial_number.into(),
        }
    }

    /// Check if lot information is available.
    pub fn has_lot(&self) -> bool {
        !self.lot.is_empty()
    }
}

/// Provenance of the curve a reagent currently uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveSource {
    /// Not calibrated.
    #[default]
    None,
    /// Calibrated with this exact bottle.
    Bottle,
    /// Calibrated with another bottle of the same lot.
    Lot,
    /// Assay (project) level curve.
    Assay,
    /// Derived without a calibrator run.
    Intelligent,
    /// Built from manually entered coefficients.
    Edit,
}

impl CurveSource {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CurveSource::None => "None",
            CurveSource::Bottle => "Bottle",
            CurveSource::Lot => "Lot",
            CurveSource::Assay => "Assay",
            CurveSource::Intelligent => "Intelligent",
            CurveSource::Edit => "Edit",
        }
    }
}

/// Read-only reagent/assay context used to resolve curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReagentBinding {
    /// Analyzer the reagent is loaded on.
    pub device_serial: String,

    /// Assay the reagent serves.
    pub assay_code: i32,

    /// Reagent version; history only considers curves of the same version.
    pub reagent_version: i32,

    /// Lot and bottle serial of the loaded reagent.
    pub reagent_key: ReagentKeyInfo,

    /// Curve the reagent currently points at, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_curve_id: Option<i64>,

    /// How the current curve was chosen.
    #[serde(default)]
    pub curve_source: CurveSource,
}

impl ReagentBinding {
    pub fn new(
        device_serial: impl Into<String>,
        assay_code: i32,
        reagent_version: i32,
        reagent_key: ReagentKeyInfo,
    ) -> Self {
        Self {
            device_serial: device_serial.into(),
            assay_code,
            reagent_version,
            reagent_key,
            current_curve_id: None,
            curve_source: CurveSource::None,
        }
    }

    /// Point the binding at a curve.
    pub fn with_current_curve(mut self, curve_id: i64, source: CurveSource) -> Self {
        self.current_curve_id = Some(curve_id);
        self.curve_source = source;
        self
    }

    /// The current curve id, if it is present and non-negative.
    pub fn valid_current_curve_id(&self) -> Option<i64> {
        self.current_curve_id.filter(|id| *id >= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_current_curve_id() {
        let key = ReagentKeyInfo::new("L01", "S01");
        let binding = ReagentBinding::new("DEV1", 101, 1, key);
        assert_eq!(binding.valid_current_curve_id(), None);

        let binding = binding.with_current_curve(-1, CurveSource::Bottle);
        assert_eq!(binding.valid_current_curve_id(), None);

        let binding = binding.with_current_curve(7, CurveSource::Bottle);
        assert_eq!(binding.valid_current_curve_id(), Some(7));
    }

    #[test]
    fn test_has_lot() {
        assert!(ReagentKeyInfo::new("L01", "").has_lot());
        assert!(!ReagentKeyInfo::default().has_lot());
    }
}
