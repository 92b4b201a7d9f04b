// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auxiliary instrumentation subsystems.
//!
//! Cross-cutting enablement (e.g. an analysis-instrumentation layer) that the
//! bulk entry point triggers only after the main integration pass completes.
//! Each subsystem carries its own independent enabled-check; the ordering
//! (main integrations first, auxiliary subsystems second) is a sequencing
//! contract of [`crate::Patcher::patch_all`].

use graft_core::GraftError;

/// A cross-cutting subsystem enabled after the main integration pass.
pub trait AuxiliarySubsystem: Send + Sync {
    /// Name used in log messages.
    fn name(&self) -> &str;

    /// Independent enabled-check consulted by the bulk entry point.
    fn is_enabled(&self) -> bool;

    /// Enable the subsystem. Failures are logged by the caller and never
    /// escalate into the main activation flow.
    fn enable(&self) -> Result<(), GraftError>;
}
