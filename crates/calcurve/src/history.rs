//! Candidate curve history for review and promotion.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{CurveError, Result};
use crate::model::{Curve, CurveUsage, ReagentBinding};
use crate::resolver::classify_source;
use crate::store::{CurveCondition, CurveField, CurveStore, ReagentBindingUpdate};

/// Default cap applied to each history query.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

const DESIGNATED: [CurveUsage; 2] = [CurveUsage::Main, CurveUsage::Standby];

/// Builds the de-duplicated, newest-first list of curves a reagent could use.
pub struct CurveHistoryRanker {
    store: Arc<dyn CurveStore>,
}

impl CurveHistoryRanker {
    pub fn new(store: Arc<dyn CurveStore>) -> Self {
        Self { store }
    }

    /// List candidate curves for a reagent, newest first.
    ///
    /// Project, lot and bottle curves are queried independently, each capped
    /// at `limit`. The merged list is not capped again, so it may hold more
    /// than `limit` entries. Equal timestamps keep query order (project, lot,
    /// bottle). If a query fails, the curves gathered before it are returned.
    pub fn list_history(&self, binding: &ReagentBinding, limit: usize) -> Vec<Curve> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();

        for (kind, condition) in history_conditions(binding, limit) {
            let curves = match self.store.query_curves(&condition) {
                Ok(curves) => curves,
                Err(e) => {
                    warn!(
                        assay_code = binding.assay_code,
                        query = kind,
                        kept = merged.len(),
                        "curve history query failed: {}",
                        e
                    );
                    break;
                }
            };

            debug!(query = kind, rows = curves.len(), "curve history query");
            merged.extend(
                curves
                    .into_iter()
                    .filter(|c| !c.is_edit_curve && seen.insert(c.id)),
            );
        }

        // Stable: ties keep project, lot, bottle order
        merged.sort_by(|a, b| b.calibration_timestamp.cmp(&a.calibration_timestamp));
        merged
    }

    /// Build the binding update that makes `curve` the reagent's current curve.
    ///
    /// Fails for edit curves, failed calibrations and curves whose assay
    /// parameters changed after calibration. The update is not applied;
    /// callers hand it to [`CurveStore::modify_reagent_binding`].
    pub fn promotion_update(
        &self,
        binding: &ReagentBinding,
        curve: &Curve,
    ) -> Result<ReagentBindingUpdate> {
        if curve.is_edit_curve {
            return Err(CurveError::IneligibleCurve(format!(
                "curve {} is an edit curve",
                curve.id
            )));
        }
        if curve.cali_paras_changed {
            return Err(CurveError::IneligibleCurve(format!(
                "assay parameters changed since curve {} was calibrated",
                curve.id
            )));
        }
        if !curve.is_successful() {
            return Err(CurveError::IneligibleCurve(format!(
                "curve {} failed: {}",
                curve.id, curve.failed_reason
            )));
        }

        Ok(ReagentBindingUpdate {
            device_serial: binding.device_serial.clone(),
            assay_code: binding.assay_code,
            reagent_key: binding.reagent_key.clone(),
            current_curve_id: Some(curve.id),
            curve_source: Some(classify_source(curve, binding)),
        })
    }
}

/// Project, lot and bottle conditions in query order. The lot condition is
/// skipped when the binding has no lot.
fn history_conditions(binding: &ReagentBinding, limit: usize) -> Vec<(&'static str, CurveCondition)> {
    let base = CurveCondition::new()
        .with_device_serial(binding.device_serial.clone())
        .with_assay_code(binding.assay_code)
        .with_version(binding.reagent_version)
        .with_successful(true)
        .with_edit_curve(false)
        .order_by(CurveField::CalibrationTime, false)
        .with_limit(0, limit);

    let mut conditions = vec![("project", base.clone().with_project_usage(&DESIGNATED))];

    if binding.reagent_key.has_lot() {
        conditions.push((
            "lot",
            base.clone()
                .with_lot_usage(&DESIGNATED)
                .with_reagent_lot(binding.reagent_key.lot.clone()),
        ));
    }

    conditions.push(("bottle", base.with_reagent_key(binding.reagent_key.clone())));
    conditions
}
