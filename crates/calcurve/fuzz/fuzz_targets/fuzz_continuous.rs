//! Fuzz target for continuous series sampling.
//!
//! This fuzzer tests that sampling a linear model:
//! 1. Never panics on non-finite or reversed point ranges
//! 2. Always ends exactly at the last relevant point when it succeeds

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use calcurve::fitting::LinearCurveModel;
use calcurve::synthesis::{build_continuous, build_scatter};
use calcurve::{
    AnalysisMethod, CalibrationMode, CalibrationPoint, CalibrationType, Curve,
    CurveConfiguration, ReagentKeyInfo,
};

#[derive(Debug, Arbitrary)]
struct Input {
    blank: bool,
    original: Vec<(f64, f64)>,
    spanned: Vec<(f64, f64)>,
    k: f64,
    b: f64,
    resolution: u16,
}

fn points(raw: &[(f64, f64)]) -> Vec<CalibrationPoint> {
    raw.iter().take(64).map(|&(x, y)| CalibrationPoint::new(x, y)).collect()
}

/// Concentration of the last point kept by `points`.
fn configuration_end(raw: &[(f64, f64)]) -> Option<f64> {
    raw.iter().take(64).last().map(|&(x, _)| x)
}

fuzz_target!(|input: Input| {
    let mode = if input.blank { CalibrationMode::Blank } else { CalibrationMode::FullDot };
    let configuration = CurveConfiguration::new(mode, AnalysisMethod::TwoPoint, CalibrationType::TwoPointLinear)
        .with_points(points(&input.original))
        .with_spanned_points(points(&input.spanned))
        .with_parameter("k", input.k)
        .with_parameter("b", input.b);

    let Ok(model) = LinearCurveModel::from_configuration(configuration.clone()) else {
        return;
    };
    let curve = Curve::new("FUZZ", 0, 0, ReagentKeyInfo::default(), configuration);
    let Ok(scatter) = build_scatter(&curve) else {
        return;
    };

    let end = if input.blank {
        configuration_end(&input.spanned)
    } else {
        configuration_end(&input.original)
    };

    let resolution = input.resolution as usize;
    if let Ok(series) = build_continuous(&scatter, &model, resolution) {
        assert_eq!(series.len(), resolution + 1);
        let last = series[resolution].x;
        // Bitwise, so a NaN end point still compares equal
        assert_eq!(Some(last.to_bits()), end.map(f64::to_bits));
    }
});
