//! Curve store integration.
//!
//! The engine only depends on the query contract of [`CurveStore`]. Writes
//! (new curves, repointing a reagent's current curve) belong to the store
//! and its callers.
//!
//! # Example
//!
//! ```
//! use calcurve::store::{CurveCondition, CurveField, CurveStore, InMemoryCurveStore};
//!
//! let store = InMemoryCurveStore::new();
//! let condition = CurveCondition::new()
//!     .with_assay_code(101)
//!     .with_successful(true)
//!     .order_by(CurveField::CalibrationTime, false)
//!     .with_limit(0, 50);
//!
//! assert!(store.query_curves(&condition).unwrap().is_empty());
//! ```

mod condition;
mod memory;
mod persistence;
mod provider;

pub use condition::{CurveCondition, CurveField, OrderBy, QueryLimit};
pub use memory::InMemoryCurveStore;
pub use provider::{CurveStore, ReagentBindingUpdate, TestResult};
