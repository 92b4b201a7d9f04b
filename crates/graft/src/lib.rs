// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deferred, dependency-aware instrumentation patching.
//!
//! graft decides, for a catalog of optional integrations, whether and when to
//! apply behavioral patches to third-party code. Adapters are loaded lazily
//! when the host reports that a target module has loaded, failures are
//! isolated per integration, and every outcome is reported to a telemetry
//! sink.
//!
//! ```
//! # fn main() -> Result<(), graft::GraftError> {
//! use std::collections::BTreeMap;
//! use graft::{AdapterRegistry, Patcher};
//!
//! let patcher = Patcher::builder().adapters(AdapterRegistry::new()).build()?;
//! patcher.patch_all_with_env(&BTreeMap::new(), &BTreeMap::new())?;
//!
//! // The host signals module loads; hooks fire here. With no adapter
//! // registered the attempt fails, is isolated, and is still recorded.
//! patcher.notify_module_loaded("redis");
//! assert!(patcher.activated_integrations().iter().any(|n| n == "redis"));
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod auxiliary;
mod executor;
pub mod patcher;
pub mod tracker;

pub use adapters::{adapter_path, AdapterRegistry, DEFAULT_ADAPTER_PREFIX};
pub use auxiliary::AuxiliarySubsystem;
pub use patcher::{Patcher, PatcherBuilder};
pub use tracker::PatchedSet;

// Re-export the pieces callers need alongside the orchestrator.
pub use graft_catalog::{CatalogOptions, IntegrationCatalog, IntegrationSpec};
pub use graft_core::{GraftError, IntegrationAdapter, PatchIndicator, TelemetrySink};
