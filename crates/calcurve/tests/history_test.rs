//! Integration tests for CurveHistoryRanker.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use calcurve::store::{CurveStore, InMemoryCurveStore};
use calcurve::{
    AnalysisMethod, CalibrationMode, CalibrationType, Curve, CurveConfiguration,
    CurveHistoryRanker, CurveSource, CurveUsage, ReagentBinding, ReagentKeyInfo,
};

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 7, 30, 0).unwrap() + Duration::minutes(minutes)
}

fn curve(id: i64, lot: &str, serial: &str, minutes: i64) -> Curve {
    let config = CurveConfiguration::new(
        CalibrationMode::FullDot,
        AnalysisMethod::TwoPoint,
        CalibrationType::LogitLog4P,
    );
    Curve::new("AN-01", 101, 3, ReagentKeyInfo::new(lot, serial), config)
        .with_id(id)
        .with_timestamp(at(minutes))
}

fn binding() -> ReagentBinding {
    ReagentBinding::new("AN-01", 101, 3, ReagentKeyInfo::new("L01", "B01"))
}

fn store_with(curves: Vec<Curve>) -> Arc<InMemoryCurveStore> {
    let store = Arc::new(InMemoryCurveStore::new());
    for curve in curves {
        store.insert_curve(curve).unwrap();
    }
    store
}

fn ids(curves: &[Curve]) -> Vec<i64> {
    curves.iter().map(|c| c.id).collect()
}

// =============================================================================
// Merging and ordering
// =============================================================================

#[test]
fn test_merges_three_sources_newest_first() {
    let store = store_with(vec![
        curve(1, "L09", "B90", 0).with_usage(CurveUsage::Main, CurveUsage::None),
        curve(2, "L01", "B05", 30).with_usage(CurveUsage::None, CurveUsage::Standby),
        curve(3, "L01", "B01", 10),
        curve(4, "L09", "B91", 40).with_usage(CurveUsage::Standby, CurveUsage::None),
    ]);

    let history = CurveHistoryRanker::new(store).list_history(&binding(), 50);
    assert_eq!(ids(&history), vec![4, 2, 3, 1]);
}

#[test]
fn test_curve_in_several_sources_listed_once() {
    // Bottle curve that is also the lot and assay main curve
    let store = store_with(vec![
        curve(7, "L01", "B01", 5).with_usage(CurveUsage::Main, CurveUsage::Main),
        curve(8, "L01", "B02", 1).with_usage(CurveUsage::None, CurveUsage::Main),
    ]);

    let history = CurveHistoryRanker::new(store).list_history(&binding(), 50);
    assert_eq!(ids(&history), vec![7, 8]);
}

#[test]
fn test_equal_timestamps_keep_query_order() {
    let store = store_with(vec![
        curve(30, "L01", "B01", 0),
        curve(20, "L01", "B04", 0).with_usage(CurveUsage::None, CurveUsage::Main),
        curve(10, "L07", "B70", 0).with_usage(CurveUsage::Main, CurveUsage::None),
    ]);

    let ranker = CurveHistoryRanker::new(store);
    let first = ranker.list_history(&binding(), 50);
    assert_eq!(ids(&first), vec![10, 20, 30]);

    // Reproducible against unchanged data
    assert_eq!(ids(&ranker.list_history(&binding(), 50)), ids(&first));
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_excludes_edit_failed_and_foreign_curves() {
    let mut other_device = curve(5, "L01", "B01", 50);
    other_device.device_serial = "AN-02".to_string();
    let mut other_version = curve(6, "L01", "B01", 60);
    other_version.version = 2;

    let store = store_with(vec![
        curve(1, "L01", "B01", 10).as_edit_curve(),
        curve(2, "L01", "B01", 20).with_failed_reason("blank absorbance too high"),
        curve(3, "L01", "B01", 30),
        curve(4, "L01", "B03", 40),
        other_device,
        other_version,
    ]);

    let history = CurveHistoryRanker::new(store).list_history(&binding(), 50);
    // Curve 4 is another bottle of the lot without lot usage
    assert_eq!(ids(&history), vec![3]);
}

#[test]
fn test_no_lot_info_skips_lot_query() {
    let store = store_with(vec![
        curve(1, "", "B01", 10).with_usage(CurveUsage::None, CurveUsage::Main),
        curve(2, "", "B01", 20),
    ]);
    let binding = ReagentBinding::new("AN-01", 101, 3, ReagentKeyInfo::new("", "B01"));

    let history = CurveHistoryRanker::new(Arc::clone(&store) as Arc<dyn CurveStore>)
        .list_history(&binding, 50);

    assert_eq!(ids(&history), vec![2, 1]);
    assert_eq!(store.queries_served(), 2);
}

// =============================================================================
// Limits
// =============================================================================

#[test]
fn test_limit_applies_per_query_not_after_merge() {
    let store = store_with(vec![
        curve(1, "L08", "B80", 10).with_usage(CurveUsage::Main, CurveUsage::None),
        curve(2, "L08", "B81", 20).with_usage(CurveUsage::Standby, CurveUsage::None),
        curve(3, "L01", "B02", 30).with_usage(CurveUsage::None, CurveUsage::Main),
        curve(4, "L01", "B01", 40),
        curve(5, "L01", "B01", 50),
    ]);

    let history = CurveHistoryRanker::new(store).list_history(&binding(), 1);
    // One per query: newest project, lot and bottle curves
    assert_eq!(ids(&history), vec![5, 3, 2]);
}

// =============================================================================
// Store failures
// =============================================================================

#[test]
fn test_failure_keeps_earlier_results() {
    let store = store_with(vec![
        curve(1, "L09", "B90", 10).with_usage(CurveUsage::Main, CurveUsage::None),
        curve(2, "L01", "B02", 20).with_usage(CurveUsage::None, CurveUsage::Main),
        curve(3, "L01", "B01", 30),
    ]);
    store.fail_queries_after(2).unwrap();

    let history = CurveHistoryRanker::new(store).list_history(&binding(), 50);
    assert_eq!(ids(&history), vec![2, 1]);
}

#[test]
fn test_offline_store_gives_empty_history() {
    let store = store_with(vec![curve(1, "L01", "B01", 0)]);
    store.set_offline(true);

    let history = CurveHistoryRanker::new(store).list_history(&binding(), 50);
    assert!(history.is_empty());
}

// =============================================================================
// Promotion
// =============================================================================

#[test]
fn test_promotion_update_classifies_source() {
    let store = store_with(Vec::new());
    let ranker = CurveHistoryRanker::new(store);

    let lot_curve = curve(12, "L01", "B02", 0).with_usage(CurveUsage::None, CurveUsage::Main);
    let update = ranker.promotion_update(&binding(), &lot_curve).unwrap();

    assert_eq!(update.current_curve_id, Some(12));
    assert_eq!(update.curve_source, Some(CurveSource::Lot));
    assert_eq!(update.reagent_key, binding().reagent_key);
}

#[test]
fn test_promotion_rejects_changed_parameters() {
    let store = store_with(vec![curve(1, "L01", "B01", 0)]);
    store.mark_cali_paras_changed(1).unwrap();

    let ranker = CurveHistoryRanker::new(Arc::clone(&store) as Arc<dyn CurveStore>);
    let history = ranker.list_history(&binding(), 50);

    // Still listed, but no longer promotable
    assert_eq!(ids(&history), vec![1]);
    assert!(ranker.promotion_update(&binding(), &history[0]).is_err());
}

#[test]
fn test_promotion_applied_by_caller() {
    let store = store_with(vec![curve(1, "L01", "B01", 0)]);
    store.insert_binding(binding()).unwrap();

    let ranker = CurveHistoryRanker::new(Arc::clone(&store) as Arc<dyn CurveStore>);
    let candidate = ranker.list_history(&binding(), 50).remove(0);
    let update = ranker.promotion_update(&binding(), &candidate).unwrap();
    store.modify_reagent_binding(&update).unwrap();

    let stored = store
        .binding("AN-01", 101, &binding().reagent_key)
        .unwrap()
        .unwrap();
    assert_eq!(stored.current_curve_id, Some(1));
    assert_eq!(stored.curve_source, CurveSource::Bottle);
}
