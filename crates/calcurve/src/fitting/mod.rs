//! Curve model contract.
//!
//! Fitting a calibration type from calibrator absorbances is an external
//! capability. This module defines what the engine needs from it and ships
//! a linear model for the hand-editable calibration types.

mod linear;
mod model;

pub use linear::{LinearCurveModel, LinearModelFactory};
pub use model::{
    AnalysisPointConfig, CurveModel, CurveModelFactory, InitializationPayload, StageVolume,
};
