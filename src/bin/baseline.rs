// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Scan performance baseline.
//!
//! Scans synthetic localization tables of increasing size and checks that
//! every scan fits inside the debounce quiet interval.

use std::time::Instant;

use locflow::decoration::QUIET_INTERVAL;
use locflow::markup::{ScanMetrics, synthetic_table, timed_scan};
use tracing_subscriber::EnvFilter;

/// Table sizes in rows, up to the 65k-line tables the quiet interval was tuned for.
const TABLE_ROWS: [usize; 5] = [100, 1_000, 10_000, 30_000, 65_000];

/// Scans per table size.
const ROUNDS: usize = 5;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("locflow=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    println!("=== Localization Markup Scan Baseline ===");
    println!("Quiet interval: {}ms\n", QUIET_INTERVAL.as_millis());

    let start_time = Instant::now();
    let mut metrics = ScanMetrics::default();

    for rows in TABLE_ROWS {
        let table = synthetic_table(rows);
        let mut slowest = std::time::Duration::ZERO;
        let mut ranges = 0;

        for _ in 0..ROUNDS {
            let (matches, elapsed) = timed_scan(&mut metrics, &table);
            slowest = slowest.max(elapsed);
            ranges = matches.len();
        }

        tracing::info!(rows, bytes = table.len(), ranges, slowest_us = slowest.as_micros() as u64, "scanned table");
        println!(
            "  {:>6} rows ({:>9} bytes): {:>7} ranges, slowest {}us",
            rows,
            table.len(),
            ranges,
            slowest.as_micros()
        );
    }

    println!("\nBaseline completed in {:.2}s\n", start_time.elapsed().as_secs_f64());
    println!("{}", metrics.generate_report());

    if metrics.fits_within(QUIET_INTERVAL) {
        println!("All scans fit inside the quiet interval.");
    } else {
        println!(
            "Slowest scan ({}ms) exceeds the quiet interval ({}ms).",
            metrics.max_time.as_millis(),
            QUIET_INTERVAL.as_millis()
        );
        println!("  - Typing in tables this large will queue rescans back to back.");
    }
}
