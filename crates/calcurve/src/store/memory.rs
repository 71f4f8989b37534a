//! In-memory curve store for testing and embedding.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, Result};
use crate::model::{Curve, ReagentBinding, ReagentKeyInfo};

use super::condition::CurveCondition;
use super::provider::{CurveStore, ReagentBindingUpdate, TestResult};

/// Contents of an in-memory store. This is also the snapshot file format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    pub next_id: i64,
    pub curves: Vec<Curve>,
    #[serde(default)]
    pub test_results: HashMap<i64, TestResult>,
    #[serde(default)]
    pub bindings: Vec<ReagentBinding>,
    /// Curves whose assay/device configuration has diverged since calibration.
    #[serde(default)]
    pub diverged: HashSet<i64>,
}

/// Curve store held in memory.
///
/// Besides the [`CurveStore`] contract it supports failure injection, so
/// callers can exercise the store-unavailable paths of the engine.
#[derive(Debug, Default)]
pub struct InMemoryCurveStore {
    state: RwLock<StoreState>,
    offline: AtomicBool,
    queries_served: AtomicUsize,
    fail_after: RwLock<Option<usize>>,
}

impl InMemoryCurveStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
            ..Self::default()
        }
    }

    pub(crate) fn snapshot(&self) -> Result<StoreState> {
        Ok(self.read()?.clone())
    }

    /// Insert a curve as-is, keeping its id. Used to seed fixtures.
    pub fn insert_curve(&self, curve: Curve) -> Result<()> {
        let mut state = self.write()?;
        state.next_id = state.next_id.max(curve.id);
        state.curves.push(curve);
        Ok(())
    }

    pub fn insert_test_result(&self, result: TestResult) -> Result<()> {
        self.write()?.test_results.insert(result.id, result);
        Ok(())
    }

    pub fn insert_binding(&self, binding: ReagentBinding) -> Result<()> {
        self.write()?.bindings.push(binding);
        Ok(())
    }

    /// Look up a stored reagent binding.
    pub fn binding(
        &self,
        device_serial: &str,
        assay_code: i32,
        reagent_key: &ReagentKeyInfo,
    ) -> Result<Option<ReagentBinding>> {
        Ok(self
            .read()?
            .bindings
            .iter()
            .find(|b| {
                b.device_serial == device_serial
                    && b.assay_code == assay_code
                    && b.reagent_key == *reagent_key
            })
            .cloned())
    }

    /// Flag a curve's dependencies as diverged; dependency-checked queries skip it.
    pub fn mark_diverged(&self, curve_id: i64) -> Result<()> {
        self.write()?.diverged.insert(curve_id);
        Ok(())
    }

    /// Set the externally maintained `cali_paras_changed` flag of a curve.
    pub fn mark_cali_paras_changed(&self, curve_id: i64) -> Result<()> {
        let mut state = self.write()?;
        if let Some(curve) = state.curves.iter_mut().find(|c| c.id == curve_id) {
            curve.cali_paras_changed = true;
        }
        Ok(())
    }

    /// Fail every operation while offline.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Serve `count` more curve queries, then fail every following one.
    pub fn fail_queries_after(&self, count: usize) -> Result<()> {
        let served = self.queries_served.load(Ordering::SeqCst);
        *self
            .fail_after
            .write()
            .map_err(|_| poisoned())? = Some(served + count);
        Ok(())
    }

    /// Number of curve queries served so far.
    pub fn queries_served(&self) -> usize {
        self.queries_served.load(Ordering::SeqCst)
    }

    pub fn curve_count(&self) -> Result<usize> {
        Ok(self.read()?.curves.len())
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CurveError::StoreUnavailable("store is offline".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> CurveError {
    CurveError::StoreUnavailable("store lock poisoned".to_string())
}

impl CurveStore for InMemoryCurveStore {
    fn query_curves(&self, condition: &CurveCondition) -> Result<Vec<Curve>> {
        self.ensure_online()?;

        let served = self.queries_served.fetch_add(1, Ordering::SeqCst);
        let fail_after = *self.fail_after.read().map_err(|_| poisoned())?;
        if fail_after.is_some_and(|limit| served >= limit) {
            return Err(CurveError::StoreUnavailable(format!(
                "query {} rejected",
                served + 1
            )));
        }

        let state = self.read()?;
        let matched: Vec<Curve> = state
            .curves
            .iter()
            .filter(|c| condition.matches(c))
            .filter(|c| !(condition.check_dependency && state.diverged.contains(&c.id)))
            .cloned()
            .collect();

        Ok(condition.order_and_limit(matched))
    }

    fn add_curve(&self, mut curve: Curve) -> Result<i64> {
        self.ensure_online()?;

        let mut state = self.write()?;
        state.next_id += 1;
        curve.id = state.next_id;
        state.curves.push(curve);
        Ok(state.next_id)
    }

    fn modify_reagent_binding(&self, update: &ReagentBindingUpdate) -> Result<()> {
        self.ensure_online()?;

        let mut state = self.write()?;
        let binding = state
            .bindings
            .iter_mut()
            .find(|b| {
                b.device_serial == update.device_serial
                    && b.assay_code == update.assay_code
                    && b.reagent_key == update.reagent_key
            })
            .ok_or_else(|| {
                CurveError::StoreUnavailable(format!(
                    "no reagent binding for assay {} lot '{}' serial '{}'",
                    update.assay_code, update.reagent_key.lot, update.reagent_key.serial_number
                ))
            })?;

        if let Some(id) = update.current_curve_id {
            binding.current_curve_id = Some(id);
        }
        if let Some(source) = update.curve_source {
            binding.curve_source = source;
        }
        Ok(())
    }

    fn query_test_result(&self, id: i64) -> Result<Option<TestResult>> {
        self.ensure_online()?;
        Ok(self.read()?.test_results.get(&id).cloned())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
