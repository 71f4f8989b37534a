//! Value types shared by every part of the engine.
//!
//! Curves are plain values: once persisted they are never mutated by this
//! crate, except for the externally set `cali_paras_changed` flag.

mod configuration;
mod curve;
mod point;
mod reagent;

pub use configuration::{AnalysisMethod, CalibrationMode, CalibrationType, CurveConfiguration};
pub use curve::{CalibratorResultRef, Curve, CurveUsage};
pub use point::CalibrationPoint;
pub use reagent::{CurveSource, ReagentBinding, ReagentKeyInfo};
