//! Assay metadata consumed read-only by the engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnalysisMethod, CalibrationType};

/// Analysis-point thresholds of an assay. Values below 1 mean "not configured".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPoints {
    pub m: i32,
    pub n: i32,
    pub p: i32,
    pub q: i32,
    /// Include the point before `m` in the reaction window.
    pub take_pre_point: i32,
}

/// Dispensing stage of a reagent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReagentStage {
    R1,
    R2,
    R3,
    Other,
}

impl ReagentStage {
    /// Stage index used by curve models.
    pub fn index(&self) -> u8 {
        match self {
            ReagentStage::R1 => 1,
            ReagentStage::R2 => 2,
            ReagentStage::R3 => 3,
            ReagentStage::Other => 4,
        }
    }
}

/// Reagent and diluent volumes aspirated at one stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReagentAspirateVolume {
    pub stage: ReagentStage,
    pub reagent: f64,
    pub diluent: f64,
}

/// Sample aspirate volumes of a special assay configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleAspirateVolume {
    pub original_sample: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_for_test: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diluent: Option<f64>,
}

impl SampleAspirateVolume {
    pub fn new(original_sample: f64) -> Self {
        Self {
            original_sample,
            sample_for_test: None,
            diluent: None,
        }
    }
}

/// Assay configuration relevant to curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssayInfo {
    pub code: i32,
    pub name: String,
    pub decimal_place: u32,
    pub current_unit_factor: f64,
    pub calibration_type: CalibrationType,
    pub analysis_method: AnalysisMethod,
    #[serde(default)]
    pub analysis_points: AnalysisPoints,
    #[serde(default)]
    pub reagent_aspirate_volumes: Vec<ReagentAspirateVolume>,
}

impl AssayInfo {
    pub fn new(
        code: i32,
        name: impl Into<String>,
        calibration_type: CalibrationType,
        analysis_method: AnalysisMethod,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            decimal_place: 2,
            current_unit_factor: 1.0,
            calibration_type,
            analysis_method,
            analysis_points: AnalysisPoints::default(),
            reagent_aspirate_volumes: Vec::new(),
        }
    }

    pub fn with_analysis_points(mut self, points: AnalysisPoints) -> Self {
        self.analysis_points = points;
        self
    }

    pub fn with_reagent_volume(mut self, stage: ReagentStage, reagent: f64, diluent: f64) -> Self {
        self.reagent_aspirate_volumes.push(ReagentAspirateVolume {
            stage,
            reagent,
            diluent,
        });
        self
    }
}

/// Special (sample-type specific) assay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialAssayInfo {
    pub assay_code: i32,
    /// 1 = highest, larger = lower priority.
    pub priority: u8,
    #[serde(default)]
    pub sample_aspirate_volumes: Vec<SampleAspirateVolume>,
}

impl SpecialAssayInfo {
    pub fn new(assay_code: i32, priority: u8) -> Self {
        Self {
            assay_code,
            priority,
            sample_aspirate_volumes: Vec::new(),
        }
    }

    pub fn with_sample_volume(mut self, volume: SampleAspirateVolume) -> Self {
        self.sample_aspirate_volumes.push(volume);
        self
    }
}

/// Read-only lookup of assay metadata.
pub trait AssayCatalog: Send + Sync {
    /// Look up an assay by code.
    fn assay(&self, code: i32) -> Option<AssayInfo>;

    /// The highest-priority special configuration of an assay.
    fn special_assay(&self, code: i32) -> Option<SpecialAssayInfo>;

    /// Display name of an assay, falling back to the numeric code.
    fn assay_name(&self, code: i32) -> String {
        self.assay(code)
            .map(|a| a.name)
            .unwrap_or_else(|| code.to_string())
    }
}

/// Assay catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssayCatalog {
    assays: HashMap<i32, AssayInfo>,
    specials: Vec<SpecialAssayInfo>,
}

impl InMemoryAssayCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assay(mut self, assay: AssayInfo) -> Self {
        self.assays.insert(assay.code, assay);
        self
    }

    pub fn with_special_assay(mut self, special: SpecialAssayInfo) -> Self {
        self.specials.push(special);
        self
    }
}

impl AssayCatalog for InMemoryAssayCatalog {
    fn assay(&self, code: i32) -> Option<AssayInfo> {
        self.assays.get(&code).cloned()
    }

    fn special_assay(&self, code: i32) -> Option<SpecialAssayInfo> {
        self.specials
            .iter()
            .filter(|s| s.assay_code == code)
            .min_by_key(|s| s.priority)
            .cloned()
    }
}
