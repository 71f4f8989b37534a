//! Curve store trait and record types.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Curve, CurveSource, ReagentKeyInfo};

use super::condition::CurveCondition;

/// A test result record referenced by a calibration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: i64,
    /// Serial of the reaction cup the calibrator was measured in.
    pub cup_serial: String,
    /// Assay code of the test that previously occupied the cup.
    pub previous_assay_code: i32,
}

impl TestResult {
    pub fn new(id: i64, cup_serial: impl Into<String>, previous_assay_code: i32) -> Self {
        Self {
            id,
            cup_serial: cup_serial.into(),
            previous_assay_code,
        }
    }
}

/// Partial update of a reagent binding, identified by device, assay and bottle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReagentBindingUpdate {
    pub device_serial: String,
    pub assay_code: i32,
    pub reagent_key: ReagentKeyInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_curve_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve_source: Option<CurveSource>,
}

/// Query and command capability over persisted curves.
///
/// Implementations must be thread-safe (Send + Sync); the engine keeps no
/// cross-call state and may be driven from several callers at once. Any
/// non-success outcome, including a caller-imposed timeout, is reported as
/// [`CurveError::StoreUnavailable`](crate::CurveError::StoreUnavailable).
pub trait CurveStore: Send + Sync {
    /// Query curves matching a condition.
    fn query_curves(&self, condition: &CurveCondition) -> Result<Vec<Curve>>;

    /// Persist a new curve and return its assigned id.
    fn add_curve(&self, curve: Curve) -> Result<i64>;

    /// Apply a partial update to a reagent binding.
    ///
    /// Used by callers to repoint a reagent's current curve; the engine
    /// itself never writes bindings.
    fn modify_reagent_binding(&self, update: &ReagentBindingUpdate) -> Result<()>;

    /// Fetch a test result by id.
    fn query_test_result(&self, id: i64) -> Result<Option<TestResult>>;

    /// Get the name of this store (for logging/debugging).
    fn name(&self) -> &str;
}
