//! Main CurveEngine struct and public API.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assay::{AssayCatalog, InMemoryAssayCatalog};
use crate::error::{CurveError, Result};
use crate::fitting::{CurveModel, CurveModelFactory, LinearModelFactory};
use crate::history::{CurveHistoryRanker, DEFAULT_HISTORY_LIMIT};
use crate::model::{Curve, CurveSource, ReagentBinding};
use crate::resolver::CurveSourceResolver;
use crate::store::CurveStore;
use crate::synthesis::{CurveDataSynthesizer, CurveSeries, CONTINUOUS_RESOLUTION};
use crate::synthetic::{as_malformed, SyntheticCurve, SyntheticCurveBuilder};

/// Configuration for the curve engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap applied to each of the history queries.
    pub history_limit: usize,
    /// Sampling intervals of the continuous series.
    pub continuous_resolution: usize,
    /// Let the store refuse current curves whose dependencies diverged.
    pub check_dependency: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            continuous_resolution: CONTINUOUS_RESOLUTION,
            check_dependency: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_continuous_resolution(mut self, resolution: usize) -> Self {
        self.continuous_resolution = resolution;
        self
    }

    pub fn with_check_dependency(mut self, check: bool) -> Self {
        self.check_dependency = check;
        self
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CurveError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|e| {
            CurveError::Config(format!("Invalid engine config '{}': {}", path.display(), e))
        })
    }
}

/// The curve engine: resolution, history, synthesis and edit curves over
/// one store.
pub struct CurveEngine {
    config: EngineConfig,
    store: Arc<dyn CurveStore>,
    assays: Arc<dyn AssayCatalog>,
    factory: Arc<dyn CurveModelFactory>,
}

impl CurveEngine {
    /// Create an engine over a store with default configuration, an empty
    /// assay catalog and the linear model factory.
    pub fn new(store: impl CurveStore + 'static) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(store: impl CurveStore + 'static, config: EngineConfig) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// Create an engine over a store the caller keeps a handle to.
    pub fn from_shared(store: Arc<dyn CurveStore>, config: EngineConfig) -> Self {
        Self {
            config,
            store,
            assays: Arc::new(InMemoryAssayCatalog::new()),
            factory: Arc::new(LinearModelFactory::new()),
        }
    }

    /// Set the assay catalog used for diagnostics.
    pub fn with_assays(mut self, assays: impl AssayCatalog + 'static) -> Self {
        self.assays = Arc::new(assays);
        self
    }

    /// Set the factory that builds curve models.
    pub fn with_model_factory(mut self, factory: impl CurveModelFactory + 'static) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn CurveStore {
        self.store.as_ref()
    }

    pub fn assays(&self) -> &dyn AssayCatalog {
        self.assays.as_ref()
    }

    pub fn resolver(&self) -> CurveSourceResolver {
        CurveSourceResolver::new(Arc::clone(&self.store))
            .with_check_dependency(self.config.check_dependency)
    }

    pub fn ranker(&self) -> CurveHistoryRanker {
        CurveHistoryRanker::new(Arc::clone(&self.store))
    }

    pub fn synthesizer(&self) -> CurveDataSynthesizer {
        CurveDataSynthesizer::new(Arc::clone(&self.store), Arc::clone(&self.assays))
            .with_resolution(self.config.continuous_resolution)
    }

    pub fn synthetic_builder(&self) -> SyntheticCurveBuilder {
        SyntheticCurveBuilder::new(Arc::clone(&self.store), Arc::clone(&self.factory))
    }

    /// The reagent's current curve, if calibrated.
    pub fn resolve_current(&self, binding: &ReagentBinding) -> Option<Curve> {
        self.resolver().resolve_current(binding)
    }

    /// Provenance of a curve relative to a reagent.
    pub fn classify_source(&self, curve: &Curve, binding: &ReagentBinding) -> CurveSource {
        self.resolver().classify_source(curve, binding)
    }

    /// Candidate curves for a reagent with the configured limit.
    pub fn list_history(&self, binding: &ReagentBinding) -> Vec<Curve> {
        self.ranker().list_history(binding, self.config.history_limit)
    }

    /// Build the model of a curve with the configured factory.
    pub fn load_model(&self, curve: &Curve) -> Result<Box<dyn CurveModel>> {
        self.factory.build(&curve.configuration).map_err(|e| {
            warn!(curve_id = curve.id, factory = self.factory.name(), "failed to build curve model: {}", e);
            as_malformed(e)
        })
    }

    /// Build and persist an edit curve with the catalog's assay parameters.
    ///
    /// Uses the highest-priority special configuration of the assay. The
    /// reagent is not repointed.
    pub fn build_edit_curve(
        &self,
        binding: &ReagentBinding,
        k: f64,
        b: f64,
    ) -> Result<SyntheticCurve> {
        let assay = self.assays.assay(binding.assay_code).ok_or_else(|| {
            CurveError::IneligibleCurve(format!("assay {} is not in the catalog", binding.assay_code))
        })?;
        let special = self.assays.special_assay(binding.assay_code).ok_or_else(|| {
            CurveError::MalformedConfiguration(format!(
                "assay {} has no special configuration",
                binding.assay_code
            ))
        })?;

        self.synthetic_builder()
            .build_linear_curve(binding, &assay, &special, k, b)
    }

    /// Drawable series of a curve.
    ///
    /// Fails only when the scatter series cannot be built. A curve whose
    /// model cannot be built keeps its scatter and has no continuous series,
    /// apart from the two-point fallback.
    pub fn curve_series(&self, curve: &Curve) -> Result<CurveSeries> {
        let synthesizer = self.synthesizer();
        let scatter = synthesizer.build_scatter(curve)?;
        let model = self.load_model(curve).ok();
        Ok(synthesizer.series_from_scatter(curve, scatter, model.as_deref()))
    }

    /// Drawable series of the reagent's current curve.
    ///
    /// `Ok(None)` means the reagent is not calibrated.
    pub fn current_series(&self, binding: &ReagentBinding) -> Result<Option<CurveSeries>> {
        match self.resolve_current(binding) {
            Some(curve) => self.curve_series(&curve).map(Some),
            None => Ok(None),
        }
    }
}
