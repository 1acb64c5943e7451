// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Decoration pipeline: styles, debounced rescans, and painting.

pub mod applier;
pub mod debounce;
pub mod style;

pub use applier::{DecorationApplier, RefreshOutcome};
pub use debounce::{Debouncer, QUIET_INTERVAL};
pub use style::{StylePair, StyleRegistry, StyleSpec, TAG_BACKGROUND};
