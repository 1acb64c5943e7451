// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Lexical matching of localization markup.
//!
//! Two fixed patterns are scanned independently over the full text: control
//! tags (`[RED]`, `~r~`) and variable placeholders (`%s`, `{0}`, `<name>`).
//! Matching is a pure function of the input text.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Control tags: `[A-Z0-9_]+` in square brackets, or `~[a-z0-9]+~`.
///
/// Case folding is ASCII only, so `[ſ]` or a Kelvin sign never count as a tag.
static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u:\[[A-Z0-9_]+\]|~[a-z0-9]+~)").unwrap());

/// Variable placeholders: `%` plus one letter, `{digits}`, or `<...>` on a single line.
static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u:%[a-z]|\{[0-9]+\})|<[^>\n]+>").unwrap());

/// A half-open byte range into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextRange {
    /// Byte offset of the first matched character
    pub start: usize,
    /// Byte offset one past the last matched character
    pub end: usize,
}

impl TextRange {
    /// Creates a new range.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Creates an empty range at `offset`.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns the length of the range in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the range covers no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the slice of `text` covered by this range, if it lies on char boundaries.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

impl From<regex::Match<'_>> for TextRange {
    fn from(m: regex::Match<'_>) -> Self {
        Self::new(m.start(), m.end())
    }
}

/// The two kinds of markup the matcher recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupKind {
    /// Control tag such as a color switch or reset
    Tag,
    /// Runtime-substituted placeholder
    Variable,
}

impl MarkupKind {
    fn pattern(self) -> &'static Regex {
        match self {
            MarkupKind::Tag => &*TAG_PATTERN,
            MarkupKind::Variable => &*VARIABLE_PATTERN,
        }
    }

    /// Returns true if `candidate` is exactly one match of this kind's pattern.
    pub fn matches_exactly(self, candidate: &str) -> bool {
        self.pattern()
            .find(candidate)
            .is_some_and(|m| m.start() == 0 && m.end() == candidate.len())
    }
}

/// Result of one scan: every tag and variable range in a single text snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    /// Tag ranges in ascending start order
    pub tags: Vec<TextRange>,
    /// Variable ranges in ascending start order
    pub variables: Vec<TextRange>,
}

impl MatchSet {
    /// Returns the ranges recorded for `kind`.
    pub fn ranges(&self, kind: MarkupKind) -> &[TextRange] {
        match kind {
            MarkupKind::Tag => &self.tags,
            MarkupKind::Variable => &self.variables,
        }
    }

    /// Total number of ranges across both kinds.
    pub fn len(&self) -> usize {
        self.tags.len() + self.variables.len()
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.variables.is_empty()
    }
}

fn find_all(kind: MarkupKind, text: &str) -> Vec<TextRange> {
    kind.pattern().find_iter(text).map(TextRange::from).collect()
}

/// Scans `text` for tags and variables.
///
/// Each pattern is a single left-to-right pass with non-overlapping matches.
/// The passes do not see each other, so one span may show up in both sets.
pub fn scan(text: &str) -> MatchSet {
    if text.is_empty() {
        return MatchSet::default();
    }

    MatchSet {
        tags: find_all(MarkupKind::Tag, text),
        variables: find_all(MarkupKind::Variable, text),
    }
}

/// Removes every tag from `text`, leaving placeholders in place.
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    TAG_PATTERN.replace_all(text, "")
}
