//! Integration tests for CurveDataSynthesizer.

use std::sync::Arc;

use indexmap::IndexMap;

use calcurve::assay::{AssayInfo, InMemoryAssayCatalog};
use calcurve::fitting::CurveModel;
use calcurve::store::{CurveStore, InMemoryCurveStore, TestResult};
use calcurve::synthesis::{CupDiagnostics, CONTINUOUS_RESOLUTION};
use calcurve::{
    AnalysisMethod, CalibrationMode, CalibrationPoint, CalibrationType, Curve,
    CurveConfiguration, CurveDataSynthesizer, ReagentKeyInfo, SeriesPoint,
};

/// Four-parameter logistic response, standing in for an external fit.
struct LogisticModel {
    configuration: CurveConfiguration,
}

impl CurveModel for LogisticModel {
    fn evaluate(&self, concentration: f64) -> f64 {
        let (a, b, c, d) = (0.05, 1.2, 8.0, 2.1);
        d + (a - d) / (1.0 + (concentration / c).powf(b))
    }

    fn parameters(&self) -> IndexMap<String, f64> {
        IndexMap::new()
    }

    fn configuration(&self) -> &CurveConfiguration {
        &self.configuration
    }
}

fn points(values: &[(f64, f64)]) -> Vec<CalibrationPoint> {
    values
        .iter()
        .map(|&(x, y)| CalibrationPoint::new(x, y))
        .collect()
}

fn curve(configuration: CurveConfiguration) -> Curve {
    Curve::new("AN-01", 310, 1, ReagentKeyInfo::new("L05", "B02"), configuration).with_id(1)
}

fn config(mode: CalibrationMode) -> CurveConfiguration {
    CurveConfiguration::new(mode, AnalysisMethod::TwoPoint, CalibrationType::LogitLog4P)
}

fn synthesizer() -> CurveDataSynthesizer {
    CurveDataSynthesizer::new(
        Arc::new(InMemoryCurveStore::new()),
        Arc::new(InMemoryAssayCatalog::new()),
    )
}

// =============================================================================
// Scatter and continuous series
// =============================================================================

#[test]
fn test_full_dot_series() {
    let configuration = config(CalibrationMode::FullDot).with_points(points(&[
        (0.0, 0.05),
        (2.0, 0.31),
        (8.0, 1.07),
        (32.0, 1.81),
    ]));
    let curve = curve(configuration.clone());
    let model = LogisticModel { configuration };

    let series = synthesizer().build_series(&curve, &model).unwrap();

    assert_eq!(series.scatter.len(), 4);
    assert_eq!(series.continuous.len(), CONTINUOUS_RESOLUTION + 1);
    assert_eq!(series.continuous[0].x, 0.0);
    assert_eq!(series.continuous[CONTINUOUS_RESOLUTION].x, 32.0);
    assert!((series.continuous[0].y - 0.05).abs() < 1e-9);
    // Monotone increasing response
    assert!(series.continuous.windows(2).all(|w| w[1].y >= w[0].y));
}

#[test]
fn test_blank_series_runs_to_last_spanned_point() {
    let configuration = config(CalibrationMode::Blank)
        .with_points(points(&[(0.0, 0.09), (8.0, 1.10), (32.0, 1.80)]))
        .with_spanned_points(points(&[(0.0, 0.04), (40.0, 1.86)]));
    let curve = curve(configuration.clone());
    let model = LogisticModel { configuration };

    let series = synthesizer().build_series(&curve, &model).unwrap();

    assert_eq!(series.scatter[0], SeriesPoint::new(0.0, 0.04));
    assert_eq!(series.scatter[1], SeriesPoint::new(8.0, 1.10));
    assert_eq!(series.continuous.len(), 201);
    assert_eq!(series.continuous[200].x, 40.0);
}

#[test]
fn test_two_point_blank_without_span_falls_back_to_scatter() {
    let configuration = config(CalibrationMode::Blank).with_points(points(&[(1.0, 0.1), (5.0, 0.9)]));
    let curve = curve(configuration.clone());
    let model = LogisticModel { configuration };
    let synthesizer = synthesizer();

    let scatter = synthesizer.build_scatter(&curve).unwrap();
    assert_eq!(scatter, vec![SeriesPoint::new(1.0, 0.1), SeriesPoint::new(5.0, 0.9)]);
    assert!(synthesizer.build_continuous(&scatter, &model).is_err());

    let series = synthesizer.build_series(&curve, &model).unwrap();
    assert_eq!(series.continuous, series.scatter);
}

#[test]
fn test_series_without_model() {
    let synthesizer = synthesizer();

    let two = curve(config(CalibrationMode::FullDot).with_points(points(&[(0.0, 0.1), (8.0, 1.3)])));
    let scatter = synthesizer.build_scatter(&two).unwrap();
    let series = synthesizer.series_from_scatter(&two, scatter, None);
    assert_eq!(series.continuous, series.scatter);

    let three = curve(
        config(CalibrationMode::FullDot).with_points(points(&[(0.0, 0.1), (4.0, 0.7), (8.0, 1.3)])),
    );
    let scatter = synthesizer.build_scatter(&three).unwrap();
    let series = synthesizer.series_from_scatter(&three, scatter, None);
    assert_eq!(series.scatter.len(), 3);
    assert!(series.continuous.is_empty());
}

#[test]
fn test_unsupported_mode_without_fallback_is_empty() {
    let configuration = config(CalibrationMode::SpanPoint)
        .with_points(points(&[(0.0, 0.1), (4.0, 0.5), (9.0, 1.1)]));
    let curve = curve(configuration.clone());
    let model = LogisticModel { configuration };

    let series = synthesizer().build_series(&curve, &model).unwrap();
    assert_eq!(series.scatter.len(), 3);
    assert!(!series.has_continuous());
}

#[test]
fn test_series_fails_without_points() {
    let configuration = config(CalibrationMode::FullDot);
    let curve = curve(configuration.clone());
    let model = LogisticModel { configuration };

    assert!(synthesizer().build_series(&curve, &model).is_err());
}

#[test]
fn test_custom_resolution() {
    let configuration = config(CalibrationMode::FullDot).with_points(points(&[(0.0, 0.05), (10.0, 1.2)]));
    let curve = curve(configuration.clone());
    let model = LogisticModel { configuration };

    let series = synthesizer()
        .with_resolution(10)
        .build_series(&curve, &model)
        .unwrap();
    assert_eq!(series.continuous.len(), 11);
    assert_eq!(series.continuous[10].x, 10.0);
}

// =============================================================================
// Cup diagnostics
// =============================================================================

fn cup_fixture() -> (Arc<InMemoryCurveStore>, InMemoryAssayCatalog) {
    let store = Arc::new(InMemoryCurveStore::new());
    store.insert_test_result(TestResult::new(11, "C-101", 7)).unwrap();
    store.insert_test_result(TestResult::new(12, "C-102", 8)).unwrap();
    store.insert_test_result(TestResult::new(13, "C-103", 7)).unwrap();
    store.insert_test_result(TestResult::new(21, "C-201", 404)).unwrap();

    let catalog = InMemoryAssayCatalog::new()
        .with_assay(AssayInfo::new(7, "TBIL", CalibrationType::TwoPointLinear, AnalysisMethod::TwoPoint))
        .with_assay(AssayInfo::new(8, "CREA", CalibrationType::Spline, AnalysisMethod::RateA));

    (store, catalog)
}

#[test]
fn test_cup_info_pairs_two_results_per_level() {
    let (store, catalog) = cup_fixture();
    let synthesizer = CurveDataSynthesizer::new(store, Arc::new(catalog));

    let curve = curve(config(CalibrationMode::FullDot))
        .with_calibration_result(1, 11)
        .with_calibration_result(1, 12)
        .with_calibration_result(2, 21);

    let info = synthesizer.extract_cup_info(&curve);
    assert_eq!(info.len(), 2);
    assert_eq!(info[&1].as_array(), ["C-101", "TBIL", "C-102", "CREA"]);
    // Unknown previous assay falls back to its code
    assert_eq!(
        info[&2],
        CupDiagnostics {
            first_cup: "C-201".to_string(),
            first_pre_assay: "404".to_string(),
            ..CupDiagnostics::default()
        }
    );
}

#[test]
fn test_cup_info_third_result_overwrites_second_pair() {
    let (store, catalog) = cup_fixture();
    let synthesizer = CurveDataSynthesizer::new(store, Arc::new(catalog));

    let curve = curve(config(CalibrationMode::FullDot))
        .with_calibration_result(1, 11)
        .with_calibration_result(1, 12)
        .with_calibration_result(1, 13);

    let info = synthesizer.extract_cup_info(&curve);
    assert_eq!(info[&1].as_array(), ["C-101", "TBIL", "C-103", "TBIL"]);
}

#[test]
fn test_cup_info_skips_missing_and_failed_results() {
    let (store, catalog) = cup_fixture();
    let curve = curve(config(CalibrationMode::FullDot))
        .with_calibration_result(1, 99)
        .with_calibration_result(2, 21);

    let synthesizer = CurveDataSynthesizer::new(Arc::clone(&store) as Arc<dyn CurveStore>, Arc::new(catalog));
    let info = synthesizer.extract_cup_info(&curve);
    assert_eq!(info.keys().copied().collect::<Vec<_>>(), vec![2]);

    store.set_offline(true);
    assert!(synthesizer.extract_cup_info(&curve).is_empty());
}
