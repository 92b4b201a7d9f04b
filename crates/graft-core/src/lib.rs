// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the graft instrumentation framework.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the graft workspace. Integration adapters
//! and telemetry sinks implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::GraftError;
pub use types::{
    ActivationDecision, DecisionSource, ErrorKind, PatchIndicator, PatchOutcome, Verbosity,
    VersionReport,
};

// Re-export the traits at crate root.
pub use traits::{IntegrationAdapter, NoopSink, SubmodulePatcher, TelemetrySink};
