// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Paints scan results onto the active view.
//!
//! Every paint replaces the full range set of both styles. The view to paint
//! is decided when the debounce timer fires, never when it was scheduled.

use std::time::Duration;

use crate::decoration::StylePair;
use crate::host::{Host, ViewId};
use crate::markup::{MatchSet, ScanMetrics, TextRange, is_localization_file, timed_scan};

/// What a refresh did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The view was scanned and painted.
    Painted {
        view: ViewId,
        tags: usize,
        variables: usize,
        elapsed: Duration,
    },
    /// No view is focused, or the focused view has no document.
    NoActiveView,
    /// The focused document is not a localization table.
    NotLocalization,
    /// The host had no text for the document.
    NoText,
    /// No styles are live, so there is nothing to paint with.
    NoStyles,
}

/// Tracks which view currently carries decorations.
#[derive(Debug, Default)]
pub struct DecorationApplier {
    painted: Option<ViewId>,
}

impl DecorationApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The view painted by the last successful apply.
    pub fn painted_view(&self) -> Option<ViewId> {
        self.painted
    }

    /// Scans the document of `active` and paints it.
    ///
    /// Anything that makes the view ineligible clears the previously painted
    /// view instead.
    pub fn refresh<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        active: Option<ViewId>,
        styles: Option<StylePair>,
        metrics: &mut ScanMetrics,
    ) -> RefreshOutcome {
        let Some((view, document)) = active.and_then(|view| Some((view, host.view_document(view)?))) else {
            self.clear(host, styles);
            return RefreshOutcome::NoActiveView;
        };

        if !is_localization_file(&document.file_name) {
            self.clear(host, styles);
            return RefreshOutcome::NotLocalization;
        }

        let Some(styles) = styles else {
            return RefreshOutcome::NoStyles;
        };

        let Some(text) = host.document_text(document.id) else {
            self.clear(host, Some(styles));
            return RefreshOutcome::NoText;
        };

        let (matches, elapsed) = timed_scan(metrics, &text);
        self.apply(host, view, styles, &matches);

        RefreshOutcome::Painted {
            view,
            tags: matches.tags.len(),
            variables: matches.variables.len(),
            elapsed,
        }
    }

    /// Paints `matches` on `view`, replacing whatever both styles showed before.
    pub fn apply<H: Host + ?Sized>(&mut self, host: &mut H, view: ViewId, styles: StylePair, matches: &MatchSet) {
        if let Some(previous) = self.painted.filter(|painted| *painted != view) {
            paint(host, previous, styles, &[], &[]);
        }

        paint(host, view, styles, &matches.tags, &matches.variables);
        self.painted = Some(view);
    }

    /// Removes decorations from the painted view, if any.
    pub fn clear<H: Host + ?Sized>(&mut self, host: &mut H, styles: Option<StylePair>) {
        let Some(view) = self.painted.take() else {
            return;
        };
        if let Some(styles) = styles {
            paint(host, view, styles, &[], &[]);
        }
    }
}

fn paint<H: Host + ?Sized>(host: &mut H, view: ViewId, styles: StylePair, tags: &[TextRange], variables: &[TextRange]) {
    host.set_decorations(view, styles.tag, tags);
    host.set_decorations(view, styles.variable, variables);
}
