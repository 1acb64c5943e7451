// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Decoration styles for tags and variables.
//!
//! The two styles live as a pair of host handles. Reconfiguring replaces the
//! whole pair: the new pair is acquired first, then the old one is released,
//! so at rest exactly two handles are alive.

use crate::error::HostError;
use crate::host::{Host, StyleHandle};
use crate::markup::MarkupKind;

/// Faint tint painted behind tags.
pub const TAG_BACKGROUND: &str = "rgba(33, 136, 255, 0.05)";

/// Visual attributes of one decoration style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpec {
    /// CSS-style color string taken from configuration
    pub foreground: String,
    pub bold: bool,
    pub underline: bool,
    pub background: Option<String>,
}

impl StyleSpec {
    /// Bold foreground over a light tint.
    pub fn tag(color: &str) -> Self {
        Self {
            foreground: color.to_string(),
            bold: true,
            underline: false,
            background: Some(TAG_BACKGROUND.to_string()),
        }
    }

    /// Bold and underlined foreground.
    pub fn variable(color: &str) -> Self {
        Self {
            foreground: color.to_string(),
            bold: true,
            underline: true,
            background: None,
        }
    }
}

/// The live tag and variable styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePair {
    pub tag: StyleHandle,
    pub variable: StyleHandle,
}

impl StylePair {
    /// Handle painting `kind`.
    pub fn handle(&self, kind: MarkupKind) -> StyleHandle {
        match kind {
            MarkupKind::Tag => self.tag,
            MarkupKind::Variable => self.variable,
        }
    }

    fn release<H: Host + ?Sized>(self, host: &mut H) {
        host.dispose_style(self.tag);
        host.dispose_style(self.variable);
    }
}

/// Owner of the current style pair.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    current: Option<StylePair>,
    rebuilds: usize,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live pair, if one was created successfully.
    pub fn current(&self) -> Option<StylePair> {
        self.current
    }

    /// Number of successful rebuilds so far.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Replaces the style pair with one built from the given colors.
    ///
    /// The previous pair is released whether or not the new one could be
    /// created. On failure no pair is live afterwards.
    pub fn rebuild<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        tag_color: &str,
        variable_color: &str,
    ) -> Result<StylePair, HostError> {
        let previous = self.current.take();
        let acquired = Self::acquire(host, tag_color, variable_color);

        if let Some(previous) = previous {
            previous.release(host);
        }

        let pair = acquired?;
        self.current = Some(pair);
        self.rebuilds += 1;
        tracing::debug!(?pair, tag_color, variable_color, "decoration styles rebuilt");
        Ok(pair)
    }

    /// Releases the live pair, if any.
    pub fn dispose<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(pair) = self.current.take() {
            pair.release(host);
        }
    }

    fn acquire<H: Host + ?Sized>(
        host: &mut H,
        tag_color: &str,
        variable_color: &str,
    ) -> Result<StylePair, HostError> {
        let tag = host.create_style(&StyleSpec::tag(tag_color))?;
        match host.create_style(&StyleSpec::variable(variable_color)) {
            Ok(variable) => Ok(StylePair { tag, variable }),
            Err(err) => {
                // Half a pair is never kept.
                host.dispose_style(tag);
                Err(err)
            }
        }
    }
}
