// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Markup recognition for pseudo-localization tables.
//!
//! This module provides the pure text-to-ranges matcher, the file-type filter
//! that decides which documents get highlighted, and scan timing.

pub mod file_type;
pub mod matcher;
pub mod performance;

pub use file_type::{DocumentKind, LOCALIZATION_SUFFIX, is_localization_file};
pub use matcher::{MarkupKind, MatchSet, TextRange, scan, strip_tags};
pub use performance::{DocumentSizeCategory, ScanMetrics, synthetic_table, timed_scan};
