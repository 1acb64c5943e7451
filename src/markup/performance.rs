// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Scan timing.
//!
//! Full-document scans are the only expensive operation in the pipeline, so
//! their cost is tracked per document size to check that a scan still fits
//! inside the debounce quiet interval.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::markup::{MatchSet, scan};

/// Document size categories for performance measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentSizeCategory {
    /// Documents under 10KB
    Small,
    /// Documents 10KB - 100KB
    Medium,
    /// Documents 100KB - 1MB
    Large,
    /// Documents over 1MB
    ExtraLarge,
}

impl DocumentSizeCategory {
    /// Determines the size category for a given document size in bytes.
    pub fn from_bytes(bytes: usize) -> Self {
        match bytes {
            0..=10_240 => DocumentSizeCategory::Small,
            10_241..=102_400 => DocumentSizeCategory::Medium,
            102_401..=1_048_576 => DocumentSizeCategory::Large,
            _ => DocumentSizeCategory::ExtraLarge,
        }
    }

    /// Returns the human-readable name of the size category.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentSizeCategory::Small => "Small (< 10KB)",
            DocumentSizeCategory::Medium => "Medium (10KB - 100KB)",
            DocumentSizeCategory::Large => "Large (100KB - 1MB)",
            DocumentSizeCategory::ExtraLarge => "Extra Large (> 1MB)",
        }
    }
}

/// Accumulated timings of full-document scans.
#[derive(Debug, Clone, Default)]
pub struct ScanMetrics {
    /// Scan durations grouped by document size
    pub times_by_size: HashMap<DocumentSizeCategory, Vec<Duration>>,
    /// Number of scans recorded
    pub scans: usize,
    /// Total time spent scanning
    pub total_time: Duration,
    /// Slowest scan observed
    pub max_time: Duration,
    /// Total ranges produced across all scans
    pub ranges_produced: usize,
}

impl ScanMetrics {
    /// Records one scan of a `bytes`-long document.
    pub fn record_scan(&mut self, bytes: usize, duration: Duration, matches: &MatchSet) {
        self.times_by_size
            .entry(DocumentSizeCategory::from_bytes(bytes))
            .or_default()
            .push(duration);

        self.scans += 1;
        self.total_time += duration;
        self.ranges_produced += matches.len();
        self.max_time = self.max_time.max(duration);
    }

    /// Average scan time, or zero before the first scan.
    pub fn average_time(&self) -> Duration {
        if self.scans == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.scans as u32
        }
    }

    /// Average scan time for one size category.
    pub fn average_for(&self, category: DocumentSizeCategory) -> Option<Duration> {
        let times = self.times_by_size.get(&category)?;
        if times.is_empty() {
            return None;
        }
        Some(times.iter().sum::<Duration>() / times.len() as u32)
    }

    /// Returns true if no recorded scan took longer than `budget`.
    pub fn fits_within(&self, budget: Duration) -> bool {
        self.max_time <= budget
    }

    /// Resets all metrics to zero.
    pub fn reset(&mut self) {
        *self = Default::default();
    }

    /// Generates a plain-text report.
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Scan Performance Report ===\n\n");

        let mut categories: Vec<_> = self.times_by_size.keys().copied().collect();
        categories.sort();
        for category in categories {
            let times = &self.times_by_size[&category];
            if let Some(avg) = self.average_for(category) {
                report.push_str(&format!(
                    "  {}: {} scans, avg {}us, max {}us\n",
                    category.name(),
                    times.len(),
                    avg.as_micros(),
                    times.iter().max().unwrap_or(&Duration::ZERO).as_micros()
                ));
            }
        }

        report.push_str(&format!("\n  Scans: {}\n", self.scans));
        report.push_str(&format!("  Ranges produced: {}\n", self.ranges_produced));
        report.push_str(&format!("  Average: {}us\n", self.average_time().as_micros()));
        report.push_str(&format!("  Slowest: {}us\n", self.max_time.as_micros()));

        report.push_str("\n=== End Report ===\n");
        report
    }
}

/// Scans `text` and records the timing into `metrics`.
pub fn timed_scan(metrics: &mut ScanMetrics, text: &str) -> (MatchSet, Duration) {
    let start = Instant::now();
    let matches = scan(text);
    let elapsed = start.elapsed();
    metrics.record_scan(text.len(), elapsed, &matches);
    (matches, elapsed)
}

/// Builds a synthetic localization table with `lines` rows of typical markup.
pub fn synthetic_table(lines: usize) -> String {
    const ROWS: [&str; 4] = [
        "[WHITE]Press <confirm> to continue~w~",
        "~r~Warning:~w~ %s items left in {0}",
        "Plain text without any markup at all, just words.",
        "[COLOR_YELLOW]{1}[RESET] of {2} <player_name> %d",
    ];

    let mut text = String::from("id\ttext\n");
    for i in 0..lines {
        text.push_str(&format!("row_{i}\t{}\n", ROWS[i % ROWS.len()]));
    }
    text
}
