// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Profiles: which literal text each insertable tag expands to.
//!
//! A missing profile or a missing tag is a normal idle state. Every function
//! here answers it with `None` or an empty edit list.

use std::collections::HashMap;

use crate::config::Profile;
use crate::host::{MenuItem, Selection, TextEdit};

/// Title of the tag quick menu.
pub const MENU_TITLE: &str = "LocFlow: Insert Tag";

/// Profile names the toggle command alternates between.
pub const RAW_PROFILE: &str = "raw";
pub const NORMALIZED_PROFILE: &str = "normalized";

/// Looks up the active profile by name.
///
/// Returns `None` when the name is empty or no profile of that name exists.
pub fn resolve<'a>(profiles: &'a HashMap<String, Profile>, active_name: &str) -> Option<&'a Profile> {
    if active_name.is_empty() {
        return None;
    }
    profiles.get(active_name)
}

/// The profile the toggle command switches to from `current`.
pub fn toggled(current: &str) -> &'static str {
    if current == RAW_PROFILE {
        NORMALIZED_PROFILE
    } else {
        RAW_PROFILE
    }
}

/// Insertable tag purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Newline,
    White,
    Red,
    Green,
    Blue,
    Yellow,
}

impl TagKind {
    /// Menu order.
    pub const ALL: [TagKind; 6] = [
        TagKind::Newline,
        TagKind::White,
        TagKind::Red,
        TagKind::Green,
        TagKind::Blue,
        TagKind::Yellow,
    ];

    /// Key used in the profile (`newline` or a color name).
    pub fn key(self) -> &'static str {
        match self {
            TagKind::Newline => "newline",
            TagKind::White => "white",
            TagKind::Red => "red",
            TagKind::Green => "green",
            TagKind::Blue => "blue",
            TagKind::Yellow => "yellow",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            TagKind::Newline => "Newline",
            TagKind::White => "White",
            TagKind::Red => "Red",
            TagKind::Green => "Green",
            TagKind::Blue => "Blue",
            TagKind::Yellow => "Yellow",
        }
    }

    /// Color tags can wrap a selection; the newline tag is always inserted.
    pub fn is_color(self) -> bool {
        !matches!(self, TagKind::Newline)
    }

    /// Parses a profile key back into a kind.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl Profile {
    /// Literal text for `kind`. Empty strings count as missing.
    pub fn tag(&self, kind: TagKind) -> Option<&str> {
        let text = match kind {
            TagKind::Newline => self.newline.as_str(),
            _ => self.colors.get(kind.key())?.as_str(),
        };
        (!text.is_empty()).then_some(text)
    }

    /// Tag that ends a colored span.
    pub fn reset_tag(&self) -> &str {
        self.tag(TagKind::White).unwrap_or("")
    }
}

/// Plans the edits that insert `kind` at every selection of `text`.
///
/// A non-empty selection is wrapped as `tag + selection + reset` when `kind`
/// is a color other than white. Every other case inserts the tag at the
/// selection's active end.
pub fn plan_insertion(profile: &Profile, kind: TagKind, text: &str, selections: &[Selection]) -> Vec<TextEdit> {
    let Some(tag) = profile.tag(kind) else {
        return Vec::new();
    };

    let wraps = kind.is_color() && kind != TagKind::White;
    let mut edits = Vec::with_capacity(selections.len());

    for selection in selections {
        let range = selection.range();
        if wraps && !range.is_empty() {
            let Some(selected) = range.slice(text) else {
                tracing::warn!(?range, "selection is not on character boundaries; skipping");
                continue;
            };
            edits.push(TextEdit::replace(
                range,
                format!("{tag}{selected}{}", profile.reset_tag()),
            ));
        } else {
            edits.push(TextEdit::insert(selection.active, tag));
        }
    }

    edits
}

/// Items of the quick menu, in fixed order, without kinds the profile lacks.
pub fn menu_items(profile: &Profile) -> Vec<MenuItem> {
    TagKind::ALL
        .into_iter()
        .filter_map(|kind| {
            profile.tag(kind).map(|text| MenuItem {
                label: kind.label().to_string(),
                description: text.to_string(),
                kind,
            })
        })
        .collect()
}
