// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability interface implemented by integration adapters.
//!
//! An adapter is the per-integration code that performs the actual behavioral
//! rewiring of a target library. Capabilities are resolved once at load time
//! through this trait; optional capabilities are `Option`-returning accessors.

use crate::error::GraftError;
use crate::types::{PatchIndicator, VersionReport};

/// A loaded integration adapter.
pub trait IntegrationAdapter: Send + Sync {
    /// Performs the behavioral rewiring of the target library.
    ///
    /// Must be idempotent: a second call observes the first call's work and
    /// does nothing.
    fn activate(&self) -> Result<(), GraftError>;

    /// Version information for the instrumented components.
    fn version_report(&self) -> VersionReport;

    /// Optional capability for patching additional submodules of the target.
    fn submodule_patcher(&self) -> Option<&dyn SubmodulePatcher> {
        None
    }
}

impl std::fmt::Debug for dyn IntegrationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn IntegrationAdapter")
    }
}

impl<T: IntegrationAdapter + ?Sized> IntegrationAdapter for std::sync::Arc<T> {
    fn activate(&self) -> Result<(), GraftError> {
        (**self).activate()
    }

    fn version_report(&self) -> VersionReport {
        (**self).version_report()
    }

    fn submodule_patcher(&self) -> Option<&dyn SubmodulePatcher> {
        (**self).submodule_patcher()
    }
}

/// Optional adapter capability: patch additional submodules of the target.
pub trait SubmodulePatcher: Send + Sync {
    /// Patch the adapter's additional submodules.
    ///
    /// Receives the caller's patch indicator (which may carry an explicit
    /// module list) and the strictness flag of the triggering activation.
    fn patch_submodules(
        &self,
        indicator: &PatchIndicator,
        raise_errors: bool,
    ) -> Result<(), GraftError>;
}
