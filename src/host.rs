// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The editing surface the session talks to.
//!
//! The host owns documents, views, rendering, status widgets and the
//! configuration store. The session only reads from it and requests effects
//! through the [`Host`] trait.

use std::fmt;

use serde_json::Value;

use crate::config::ConfigKey;
use crate::decoration::StyleSpec;
use crate::error::HostError;
use crate::markup::TextRange;
use crate::profile::TagKind;

/// Identity of an editor view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// Identity of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

/// Handle to a decoration style created by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleHandle(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// The document shown in a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: DocumentId,
    /// File name or path, used for the file-type filter
    pub file_name: String,
}

impl DocumentRef {
    pub fn new(id: DocumentId, file_name: impl Into<String>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
        }
    }
}

/// A selection as byte offsets into the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started
    pub anchor: usize,
    /// Where the cursor is
    pub active: usize,
}

impl Selection {
    pub fn new(anchor: usize, active: usize) -> Self {
        Self { anchor, active }
    }

    /// An empty selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// The covered range, ordered regardless of direction.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor.min(self.active), self.anchor.max(self.active))
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }
}

/// Replace `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub new_text: String,
}

impl TextEdit {
    /// Inserts `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(TextRange::empty(offset), text)
    }

    /// Replaces `range` with `text`.
    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: text.into(),
        }
    }
}

/// Status line widgets owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusSlot {
    /// Active profile name; clicking it toggles the profile
    Profile,
    /// Button opening the tag menu
    TagMenu,
    /// Visible/total character count of the selection
    CharCount,
}

/// One entry of the tag quick menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    /// Literal text the entry inserts
    pub description: String,
    pub kind: TagKind,
}

/// Operations the session needs from the editing surface.
///
/// All methods are called from the single event-processing thread.
pub trait Host {
    /// The focused view, if any.
    fn active_view(&self) -> Option<ViewId>;

    /// The document shown in `view`.
    fn view_document(&self, view: ViewId) -> Option<DocumentRef>;

    /// Current text of `document`.
    fn document_text(&self, document: DocumentId) -> Option<String>;

    /// Selections of `view`, primary first.
    fn selections(&self, view: ViewId) -> Vec<Selection>;

    /// The raw configuration section (see [`crate::config::SECTION`]).
    fn configuration(&self) -> Value;

    /// Writes one configuration key to the host's store.
    fn update_configuration(&mut self, key: ConfigKey, value: Value) -> Result<(), HostError>;

    fn create_style(&mut self, spec: &StyleSpec) -> Result<StyleHandle, HostError>;

    /// Releases a style; the host drops its decorations with it.
    fn dispose_style(&mut self, style: StyleHandle);

    /// Replaces every range painted with `style` in `view`.
    fn set_decorations(&mut self, view: ViewId, style: StyleHandle, ranges: &[TextRange]);

    fn show_status(&mut self, slot: StatusSlot, text: &str);

    fn hide_status(&mut self, slot: StatusSlot);

    /// Applies `edits` to the document of `view` as one undoable step.
    fn apply_edits(&mut self, view: ViewId, edits: &[TextEdit]) -> Result<(), HostError>;

    /// Shows a pick list. The choice comes back as `Command::InsertTag`.
    fn show_menu(&mut self, title: &str, items: &[MenuItem]);
}
