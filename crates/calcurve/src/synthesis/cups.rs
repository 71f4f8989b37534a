//! Paired-cup diagnostics of calibrator measurements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assay::AssayCatalog;
use crate::model::Curve;
use crate::store::CurveStore;

/// Cups a calibrator level was measured in and what ran in them before.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CupDiagnostics {
    pub first_cup: String,
    pub first_pre_assay: String,
    pub second_cup: String,
    pub second_pre_assay: String,
}

impl CupDiagnostics {
    /// Slots in display order: first cup, first previous assay, second cup,
    /// second previous assay.
    pub fn as_array(&self) -> [&str; 4] {
        [
            self.first_cup.as_str(),
            self.first_pre_assay.as_str(),
            self.second_cup.as_str(),
            self.second_pre_assay.as_str(),
        ]
    }
}

/// Collect cup diagnostics per calibrator level.
///
/// The first result of a level fills the first pair of slots and every later
/// one overwrites the second pair; a level is expected to have at most one
/// repeat. Results that cannot be fetched are skipped.
pub fn extract_cup_info(
    curve: &Curve,
    store: &dyn CurveStore,
    assays: &dyn AssayCatalog,
) -> BTreeMap<i32, CupDiagnostics> {
    let mut levels: BTreeMap<i32, CupDiagnostics> = BTreeMap::new();

    for reference in &curve.calibration_results {
        let result = match store.query_test_result(reference.test_result_id) {
            Ok(Some(result)) => result,
            Ok(None) => {
                debug!(
                    curve_id = curve.id,
                    test_result_id = reference.test_result_id,
                    "calibrator test result not found"
                );
                continue;
            }
            Err(e) => {
                warn!(
                    curve_id = curve.id,
                    test_result_id = reference.test_result_id,
                    "calibrator test result query failed: {}",
                    e
                );
                continue;
            }
        };

        let pre_assay = assays.assay_name(result.previous_assay_code);
        match levels.get_mut(&reference.level) {
            Some(entry) => {
                entry.second_cup = result.cup_serial;
                entry.second_pre_assay = pre_assay;
            }
            None => {
                levels.insert(
                    reference.level,
                    CupDiagnostics {
                        first_cup: result.cup_serial,
                        first_pre_assay: pre_assay,
                        ..CupDiagnostics::default()
                    },
                );
            }
        }
    }

    levels
}
