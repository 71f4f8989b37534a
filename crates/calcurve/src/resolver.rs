//! Resolution of a reagent's current curve and curve provenance.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::{Curve, CurveSource, CurveUsage, ReagentBinding};
use crate::store::{CurveCondition, CurveStore};

/// Picks the authoritative "current" curve of a reagent.
pub struct CurveSourceResolver {
    store: Arc<dyn CurveStore>,
    check_dependency: bool,
}

impl CurveSourceResolver {
    /// Create a resolver that asks the store to check curve dependencies.
    pub fn new(store: Arc<dyn CurveStore>) -> Self {
        Self {
            store,
            check_dependency: true,
        }
    }

    /// Enable or disable the store-side dependency check.
    pub fn with_check_dependency(mut self, check: bool) -> Self {
        self.check_dependency = check;
        self
    }

    /// Resolve the curve a reagent currently points at.
    ///
    /// Returns `None` when the reagent is not calibrated, when the store
    /// fails or refuses the curve, and when the curve is an edit curve. A
    /// store failure is logged, never returned.
    pub fn resolve_current(&self, binding: &ReagentBinding) -> Option<Curve> {
        let Some(curve_id) = binding.valid_current_curve_id() else {
            debug!(
                assay_code = binding.assay_code,
                lot = %binding.reagent_key.lot,
                "reagent not calibrated"
            );
            return None;
        };

        let condition = CurveCondition::by_id(curve_id).with_check_dependency(self.check_dependency);
        let curves = match self.store.query_curves(&condition) {
            Ok(curves) => curves,
            Err(e) => {
                warn!(curve_id, store = self.store.name(), "current curve query failed: {}", e);
                return None;
            }
        };

        let curve = curves.into_iter().next()?;
        if curve.is_edit_curve {
            debug!(curve_id, "current curve is an edit curve");
            return None;
        }
        Some(curve)
    }

    /// Classify where a curve comes from relative to a reagent.
    pub fn classify_source(&self, curve: &Curve, binding: &ReagentBinding) -> CurveSource {
        classify_source(curve, binding)
    }
}

/// Classify a curve's provenance relative to a reagent binding.
///
/// Edit curves are always [`CurveSource::Edit`]. Otherwise the rules apply
/// in order: an exact bottle match is `Bottle`; a lot Main curve, or a lot
/// Standby curve that is not also the assay Main curve, of the same lot is
/// `Lot`; everything else is `Assay`.
pub fn classify_source(curve: &Curve, binding: &ReagentBinding) -> CurveSource {
    if curve.is_edit_curve {
        return CurveSource::Edit;
    }

    if curve.reagent_key == binding.reagent_key {
        return CurveSource::Bottle;
    }

    let lot_designated = curve.usage_as_lot_curve == CurveUsage::Main
        || (curve.usage_as_lot_curve == CurveUsage::Standby
            && curve.usage_as_project_curve != CurveUsage::Main);

    if lot_designated && curve.reagent_key.lot == binding.reagent_key.lot {
        CurveSource::Lot
    } else {
        CurveSource::Assay
    }
}
