//! Example: Report the current curve and history of a reagent from a store snapshot.
//!
//! Usage:
//!   cargo run --example curve_report -- <snapshot> <device> <assay> <version> <lot> <serial> [curve_id]
//!
//! Example:
//!   cargo run --example curve_report -- curves.json AN-0042 101 1 L2301 B07 12

use std::env;
use std::path::Path;

use calcurve::store::InMemoryCurveStore;
use calcurve::{CurveEngine, CurveSource, ReagentBinding, ReagentKeyInfo};

fn main() -> calcurve::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 7 {
        eprintln!("Usage: cargo run --example curve_report -- <snapshot> <device> <assay> <version> <lot> <serial> [curve_id]");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: Snapshot not found: {}", path.display());
        std::process::exit(1);
    }

    let (Ok(assay_code), Ok(version)) = (args[3].parse::<i32>(), args[4].parse::<i32>()) else {
        eprintln!("Error: assay code and reagent version must be integers");
        std::process::exit(1);
    };

    let mut binding = ReagentBinding::new(
        args[2].as_str(),
        assay_code,
        version,
        ReagentKeyInfo::new(args[5].as_str(), args[6].as_str()),
    );
    if let Some(id) = args.get(7).and_then(|s| s.parse::<i64>().ok()) {
        binding = binding.with_current_curve(id, CurveSource::None);
    }

    let engine = CurveEngine::new(InMemoryCurveStore::load(path)?);

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Curves for assay {} lot {} bottle {}", assay_code, args[5], args[6]);
    println!("{}", separator);
    println!();

    match engine.resolve_current(&binding) {
        Some(curve) => {
            let source = engine.classify_source(&curve, &binding);
            println!("Current curve: {} ({})", curve.id, source.label());
            match engine.curve_series(&curve) {
                Ok(series) => {
                    println!("  Calibrator points:");
                    for point in &series.scatter {
                        println!("    {:>10.4}  {:>8.4}", point.x, point.y);
                    }
                    println!("  Continuous samples: {}", series.continuous.len());
                }
                Err(e) => println!("  No drawable series: {}", e),
            }
        }
        None => println!("Current curve: not calibrated"),
    }

    println!();
    println!("History:");
    for curve in engine.list_history(&binding) {
        let promotable = if curve.is_promotable() { "" } else { "  (parameters changed)" };
        println!(
            "  {:>6}  {}  {:<8}{}",
            curve.id,
            curve.calibration_timestamp.format("%Y-%m-%d %H:%M"),
            engine.classify_source(&curve, &binding).label(),
            promotable
        );
    }

    Ok(())
}
