//! Query conditions over persisted curves.

use serde::{Deserialize, Serialize};

use crate::model::{Curve, CurveUsage, ReagentKeyInfo};

/// Sortable curve fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveField {
    Id,
    CalibrationTime,
}

/// One ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: CurveField,
    pub ascending: bool,
}

/// Paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLimit {
    pub offset: usize,
    pub count: usize,
}

/// Filter, ordering and paging of a curve query.
///
/// Unset filters match everything. Empty usage lists impose no usage filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub device_serials: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assay_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reagent_lot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reagent_key: Option<ReagentKeyInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successful: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_edit_curve: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usage_as_project_curve: Vec<CurveUsage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usage_as_lot_curve: Vec<CurveUsage>,
    /// Let the store refuse curves whose assay/device configuration has diverged.
    #[serde(default)]
    pub check_dependency: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<QueryLimit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl CurveCondition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point query for a single curve.
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn with_device_serial(mut self, serial: impl Into<String>) -> Self {
        self.device_serials.push(serial.into());
        self
    }

    pub fn with_assay_code(mut self, code: i32) -> Self {
        self.assay_code = Some(code);
        self
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_reagent_lot(mut self, lot: impl Into<String>) -> Self {
        self.reagent_lot = Some(lot.into());
        self
    }

    pub fn with_reagent_key(mut self, key: ReagentKeyInfo) -> Self {
        self.reagent_key = Some(key);
        self
    }

    pub fn with_successful(mut self, successful: bool) -> Self {
        self.successful = Some(successful);
        self
    }

    pub fn with_edit_curve(mut self, is_edit_curve: bool) -> Self {
        self.is_edit_curve = Some(is_edit_curve);
        self
    }

    pub fn with_project_usage(mut self, usages: &[CurveUsage]) -> Self {
        self.usage_as_project_curve = usages.to_vec();
        self
    }

    pub fn with_lot_usage(mut self, usages: &[CurveUsage]) -> Self {
        self.usage_as_lot_curve = usages.to_vec();
        self
    }

    pub fn with_check_dependency(mut self, check: bool) -> Self {
        self.check_dependency = check;
        self
    }

    pub fn with_limit(mut self, offset: usize, count: usize) -> Self {
        self.limit = Some(QueryLimit { offset, count });
        self
    }

    pub fn order_by(mut self, field: CurveField, ascending: bool) -> Self {
        self.order_by.push(OrderBy { field, ascending });
        self
    }

    /// Check the row filters against a curve. Dependency checks, ordering
    /// and paging are left to the store.
    pub fn matches(&self, curve: &Curve) -> bool {
        if self.id.is_some_and(|id| id != curve.id) {
            return false;
        }
        if !self.device_serials.is_empty() && !self.device_serials.contains(&curve.device_serial) {
            return false;
        }
        if self.assay_code.is_some_and(|code| code != curve.assay_code) {
            return false;
        }
        if self.version.is_some_and(|v| v != curve.version) {
            return false;
        }
        if let Some(ref lot) = self.reagent_lot {
            if *lot != curve.reagent_key.lot {
                return false;
            }
        }
        if let Some(ref key) = self.reagent_key {
            if *key != curve.reagent_key {
                return false;
            }
        }
        if self.successful.is_some_and(|s| s != curve.is_successful()) {
            return false;
        }
        if self.is_edit_curve.is_some_and(|e| e != curve.is_edit_curve) {
            return false;
        }
        if !self.usage_as_project_curve.is_empty()
            && !self.usage_as_project_curve.contains(&curve.usage_as_project_curve)
        {
            return false;
        }
        if !self.usage_as_lot_curve.is_empty()
            && !self.usage_as_lot_curve.contains(&curve.usage_as_lot_curve)
        {
            return false;
        }
        true
    }

    /// Apply ordering clauses (stable, first clause most significant) and the paging window.
    pub fn order_and_limit(&self, mut curves: Vec<Curve>) -> Vec<Curve> {
        if !self.order_by.is_empty() {
            curves.sort_by(|a, b| {
                self.order_by
                    .iter()
                    .map(|clause| {
                        let ordering = match clause.field {
                            CurveField::Id => a.id.cmp(&b.id),
                            CurveField::CalibrationTime => {
                                a.calibration_timestamp.cmp(&b.calibration_timestamp)
                            }
                        };
                        if clause.ascending { ordering } else { ordering.reverse() }
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        match self.limit {
            Some(limit) => curves
                .into_iter()
                .skip(limit.offset)
                .take(limit.count)
                .collect(),
            None => curves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisMethod, CalibrationMode, CalibrationType, CurveConfiguration};
    use chrono::{Duration, TimeZone, Utc};

    fn curve(id: i64, minutes: i64) -> Curve {
        let config = CurveConfiguration::new(
            CalibrationMode::FullDot,
            AnalysisMethod::RateA,
            CalibrationType::Spline,
        );
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        Curve::new("DEV1", 101, 1, ReagentKeyInfo::new("L01", "S01"), config)
            .with_id(id)
            .with_timestamp(base + Duration::minutes(minutes))
    }

    #[test]
    fn test_empty_condition_matches_everything() {
        assert!(CurveCondition::new().matches(&curve(1, 0)));
    }

    #[test]
    fn test_usage_filter() {
        let condition = CurveCondition::new().with_project_usage(&[CurveUsage::Main]);
        assert!(!condition.matches(&curve(1, 0)));
        let main = curve(2, 0).with_usage(CurveUsage::Main, CurveUsage::None);
        assert!(condition.matches(&main));
    }

    #[test]
    fn test_reagent_key_requires_exact_match() {
        let condition = CurveCondition::new().with_reagent_key(ReagentKeyInfo::new("L01", "S02"));
        assert!(!condition.matches(&curve(1, 0)));

        let condition = CurveCondition::new().with_reagent_lot("L01");
        assert!(condition.matches(&curve(1, 0)));
    }

    #[test]
    fn test_order_descending_then_limit() {
        let condition = CurveCondition::new()
            .order_by(CurveField::CalibrationTime, false)
            .with_limit(0, 2);
        let ordered = condition.order_and_limit(vec![curve(1, 0), curve(2, 20), curve(3, 10)]);
        let ids: Vec<_> = ordered.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
