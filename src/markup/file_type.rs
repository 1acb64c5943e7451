// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Document type detection.
//!
//! Highlighting only runs for pseudo-localization tables, which are
//! recognized purely by file name.

/// Suffix identifying a pseudo-localization table.
pub const LOCALIZATION_SUFFIX: &str = ".tsv";

/// Kind of document as far as markup highlighting is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Tab-separated pseudo-localization table
    Localization,
    /// Anything else (never highlighted)
    Other,
}

impl DocumentKind {
    /// Detects the document kind from a file name or path.
    ///
    /// The check is a case-insensitive suffix match on the whole name, so a
    /// bare `.tsv` counts as well.
    pub fn detect(file_name: &str) -> Self {
        let name = file_name.as_bytes();
        let suffix = LOCALIZATION_SUFFIX.as_bytes();

        if name.len() >= suffix.len() && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix) {
            DocumentKind::Localization
        } else {
            DocumentKind::Other
        }
    }

    /// Returns whether markup in this kind of document gets highlighted.
    pub fn is_highlighted(self) -> bool {
        matches!(self, DocumentKind::Localization)
    }
}

/// Shorthand for `DocumentKind::detect(file_name).is_highlighted()`.
pub fn is_localization_file(file_name: &str) -> bool {
    DocumentKind::detect(file_name).is_highlighted()
}
