// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types.
//!
//! Missing data (no active view, no profile, empty selection) is never an
//! error; these types only cover the host refusing an operation and malformed
//! configuration.

use thiserror::Error;

/// The host refused or failed an operation requested by the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host rejected {operation}: {reason}")]
pub struct HostError {
    /// What the session asked for
    pub operation: &'static str,
    /// Host-provided explanation
    pub reason: String,
}

impl HostError {
    /// Creates a new host error.
    pub fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur when reading the configuration section.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The section could not be deserialized.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration key name was not recognized.
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Result type for configuration operations.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
