// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the graft instrumentation framework.

use thiserror::Error;

use crate::types::ErrorKind;

/// The primary error type used across all graft crates.
#[derive(Debug, Error)]
pub enum GraftError {
    /// Configuration errors (malformed environment override values, invalid
    /// catalog entries).
    #[error("configuration error: {0}")]
    Config(String),

    /// The catalog's dependency graph contains a cycle.
    #[error("dependency cycle in integration catalog: {chain}")]
    DependencyCycle { chain: String },

    /// Caller referenced an integration name the catalog does not know.
    #[error("integration not found: {name}")]
    IntegrationNotFound { name: String },

    /// The integration's adapter could not be loaded.
    #[error("failed to load adapter {path} for integration {integration}: {message}")]
    AdapterLoad {
        integration: String,
        path: String,
        message: String,
    },

    /// The adapter loaded but its activation entry point failed.
    #[error("activation failed for integration {integration}: {source}")]
    Activation {
        integration: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GraftError {
    /// The telemetry error-kind tag for this error, if it maps to one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            GraftError::AdapterLoad { .. } => Some(ErrorKind::ImportFailure),
            GraftError::Activation { .. } => Some(ErrorKind::ActivationFailure),
            _ => None,
        }
    }
}
