//! Fuzz target for stored curve configurations.
//!
//! This fuzzer tests that configuration parsing and scatter synthesis:
//! 1. Never panic on malformed JSON
//! 2. Never panic on configurations with missing or odd point sets

#![no_main]

use libfuzzer_sys::fuzz_target;
use calcurve::synthesis::build_scatter;
use calcurve::{Curve, CurveConfiguration, ReagentKeyInfo};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(configuration) = CurveConfiguration::from_json(input) {
        let _ = configuration.substitutes_blank();
        let curve = Curve::new("FUZZ", 0, 0, ReagentKeyInfo::default(), configuration);
        let _ = build_scatter(&curve);
    }
});
