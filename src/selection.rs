// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Character counting for the current selection.
//!
//! Runs on every selection change without debouncing since it only touches
//! the selected text.

use std::fmt;

use crate::host::{Host, ViewId};
use crate::markup::strip_tags;

/// Visible and total character counts of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    /// Characters left after removing tags; placeholders still count
    pub visible: usize,
    pub total: usize,
}

impl fmt::Display for CharCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Visible: {} (Total: {})", self.visible, self.total)
    }
}

/// Counts `selected`. An empty selection has no count.
pub fn recount(selected: &str) -> Option<CharCount> {
    if selected.is_empty() {
        return None;
    }

    Some(CharCount {
        visible: strip_tags(selected).chars().count(),
        total: selected.chars().count(),
    })
}

/// Text of the primary selection of `view`.
pub fn primary_selection_text<H: Host + ?Sized>(host: &H, view: ViewId) -> Option<String> {
    let selection = host.selections(view).into_iter().next()?;
    if selection.is_empty() {
        return None;
    }
    let document = host.view_document(view)?;
    let text = host.document_text(document.id)?;
    selection.range().slice(&text).map(str::to_owned)
}
