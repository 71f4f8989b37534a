//! calcurve: calibration curve resolution and synthesis for laboratory analyzers.
//!
//! Given a reagent loaded on an analyzer, the engine decides which previously
//! computed calibration curve is authoritative, lists the curves the reagent
//! could use instead, turns a curve into the series needed to draw it, and
//! fabricates edit curves from hand-entered linear coefficients.
//!
//! # Core Principles
//!
//! - **Pure over explicit inputs**: no state survives between calls
//! - **Store is authoritative**: the engine reads curves and never repoints reagents
//! - **Degrade, don't throw**: missing curves and store failures become `None` or partial lists
//!
//! # Example
//!
//! ```no_run
//! use calcurve::store::InMemoryCurveStore;
//! use calcurve::{CurveEngine, ReagentBinding, ReagentKeyInfo};
//!
//! let engine = CurveEngine::new(InMemoryCurveStore::load("curves.snapshot.json").unwrap());
//! let binding = ReagentBinding::new("AN-0042", 101, 1, ReagentKeyInfo::new("L2301", "B07"));
//!
//! match engine.current_series(&binding).unwrap() {
//!     Some(series) => println!("{} calibrator points", series.scatter.len()),
//!     None => println!("not calibrated"),
//! }
//! for curve in engine.list_history(&binding) {
//!     println!("{} {}", curve.id, curve.calibration_timestamp);
//! }
//! ```

pub mod assay;
pub mod error;
pub mod fitting;
pub mod history;
pub mod model;
pub mod resolver;
pub mod store;
pub mod synthesis;
pub mod synthetic;

mod engine;

pub use crate::engine::{CurveEngine, EngineConfig};
pub use error::{CurveError, Result};
pub use history::CurveHistoryRanker;
pub use model::{
    AnalysisMethod, CalibrationMode, CalibrationPoint, CalibrationType, Curve,
    CurveConfiguration, CurveSource, CurveUsage, ReagentBinding, ReagentKeyInfo,
};
pub use resolver::{classify_source, CurveSourceResolver};
pub use synthesis::{CurveDataSynthesizer, CurveSeries, SeriesPoint};
pub use synthetic::{SyntheticCurve, SyntheticCurveBuilder};
