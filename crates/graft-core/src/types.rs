// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the graft workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How an integration's final enabled/disabled decision was reached.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum DecisionSource {
    /// Compiled-in catalog default.
    Default,
    /// Per-integration environment variable override.
    EnvOverride,
    /// Explicit caller-supplied override (highest precedence).
    CallerOverride,
    /// Force-enabled because an enabled integration depends on it.
    DependencyInduced,
}

/// Final enabled/disabled decision for one integration.
///
/// Built fresh per resolution pass; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationDecision {
    pub name: String,
    pub enabled: bool,
    pub source: DecisionSource,
}

/// Caller-supplied override for one integration.
///
/// An explicit module list implies the integration is enabled, replaces the
/// catalog's module list for hook registration, and is forwarded to the
/// adapter's submodule patcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchIndicator {
    Enabled(bool),
    Modules(Vec<String>),
}

impl PatchIndicator {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, PatchIndicator::Enabled(false))
    }
}

impl From<bool> for PatchIndicator {
    fn from(enabled: bool) -> Self {
        PatchIndicator::Enabled(enabled)
    }
}

/// Error-kind tag attached to failure outcomes for aggregation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ErrorKind {
    ImportFailure,
    ActivationFailure,
}

/// Result of one activation attempt.
///
/// Emitted at most once per integration per process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOutcome {
    pub integration: String,
    pub success: bool,
    pub error_kind: Option<ErrorKind>,
    pub version: Option<String>,
}

/// Version information reported by a loaded adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionReport {
    /// One version (possibly unknown) for the integration itself.
    Single(Option<String>),
    /// One (component, version) pair per instrumented component.
    Components(Vec<(String, String)>),
}

/// Verbosity levels for telemetry metric gating.
///
/// Ordered from most to least verbose; `Debug < Information < Warning < Error`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Verbosity {
    Debug,
    Information,
    Warning,
    Error,
}
