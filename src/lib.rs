// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Markup highlighting and tag insertion for pseudo-localization tables.
//!
//! The crate is host-agnostic: an editor implements [`Host`] and feeds
//! [`HostEvent`]s to a [`Session`], either directly or through
//! [`runtime::run`]. Full-document rescans are debounced so that typing in
//! large tables stays responsive.

pub mod config;
pub mod decoration;
pub mod error;
pub mod host;
pub mod markup;
pub mod profile;
pub mod runtime;
pub mod selection;
pub mod session;

pub use config::{ConfigKey, Profile, Settings};
pub use error::{ConfigError, HostError};
pub use host::{DocumentId, DocumentRef, Host, MenuItem, Selection, StatusSlot, StyleHandle, TextEdit, ViewId};
pub use markup::{MatchSet, TextRange, scan};
pub use profile::TagKind;
pub use session::{Command, HostEvent, Session};
