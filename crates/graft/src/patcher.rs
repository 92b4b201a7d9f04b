// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestrator tying catalog, resolver, hook bus, and executor together.
//!
//! A [`Patcher`] is an explicitly constructed, process-lifetime object; there
//! are no ambient globals. The host builds one at startup, calls
//! [`Patcher::patch_all`] (or [`Patcher::patch`] for explicit requests), and
//! signals module loads through [`Patcher::notify_module_loaded`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use graft_catalog::{resolver, CatalogOptions, IntegrationCatalog};
use graft_core::{GraftError, PatchIndicator, TelemetrySink};
use graft_hooks::ModuleHookBus;
use graft_telemetry::MetricsSink;

use crate::adapters::{AdapterRegistry, DEFAULT_ADAPTER_PREFIX};
use crate::auxiliary::AuxiliarySubsystem;
use crate::executor::PatchExecutor;
use crate::tracker::PatchedSet;

/// Deferred instrumentation orchestrator.
pub struct Patcher {
    catalog: Arc<IntegrationCatalog>,
    bus: Arc<ModuleHookBus>,
    patched: Arc<PatchedSet>,
    executor: Arc<PatchExecutor>,
    auxiliary: Vec<Box<dyn AuxiliarySubsystem>>,
}

/// Builder for [`Patcher`].
pub struct PatcherBuilder {
    catalog: Option<IntegrationCatalog>,
    adapters: AdapterRegistry,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    prefix: String,
    auxiliary: Vec<Box<dyn AuxiliarySubsystem>>,
}

impl PatcherBuilder {
    fn new() -> Self {
        Self {
            catalog: None,
            adapters: AdapterRegistry::new(),
            telemetry: None,
            prefix: DEFAULT_ADAPTER_PREFIX.to_string(),
            auxiliary: Vec::new(),
        }
    }

    /// Use a custom catalog instead of the compiled-in defaults.
    pub fn catalog(mut self, catalog: IntegrationCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn adapters(mut self, adapters: AdapterRegistry) -> Self {
        self.adapters = adapters;
        self
    }

    /// Telemetry sink; defaults to [`MetricsSink`].
    pub fn telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Override the adapter resolution prefix.
    pub fn adapter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Register an auxiliary subsystem, enabled after the main pass.
    pub fn auxiliary(mut self, subsystem: Box<dyn AuxiliarySubsystem>) -> Self {
        self.auxiliary.push(subsystem);
        self
    }

    pub fn build(self) -> Result<Patcher, GraftError> {
        let catalog = Arc::new(match self.catalog {
            Some(catalog) => catalog,
            None => IntegrationCatalog::builtin(&CatalogOptions::default())?,
        });
        let telemetry = self
            .telemetry
            .unwrap_or_else(|| Arc::new(MetricsSink) as Arc<dyn TelemetrySink>);
        let adapters = Arc::new(self.adapters);
        let patched = Arc::new(PatchedSet::new());
        let executor = Arc::new(PatchExecutor::new(
            Arc::clone(&catalog),
            adapters,
            telemetry,
            Arc::clone(&patched),
            self.prefix,
        ));
        Ok(Patcher {
            catalog,
            bus: Arc::new(ModuleHookBus::new()),
            patched,
            executor,
            auxiliary: self.auxiliary,
        })
    }
}

impl Patcher {
    pub fn builder() -> PatcherBuilder {
        PatcherBuilder::new()
    }

    /// Bulk activation: resolve the full decision set, register hooks
    /// best-effort for every enabled integration, then enable auxiliary
    /// subsystems.
    ///
    /// Environment overrides are read from the process environment. Only
    /// configuration errors escape; individual integration failures are
    /// isolated.
    pub fn patch_all(
        &self,
        overrides: &BTreeMap<String, PatchIndicator>,
    ) -> Result<(), GraftError> {
        let env = resolver::process_env_overrides(&self.catalog);
        self.patch_all_with_env(&env, overrides)
    }

    /// [`Patcher::patch_all`] with an explicit environment map, for callers
    /// that manage configuration themselves.
    pub fn patch_all_with_env(
        &self,
        env: &BTreeMap<String, String>,
        overrides: &BTreeMap<String, PatchIndicator>,
    ) -> Result<(), GraftError> {
        let decisions = resolver::resolve(&self.catalog, env, overrides)?;

        let mut requests: BTreeMap<String, PatchIndicator> = BTreeMap::new();
        for decision in decisions.into_iter().filter(|d| d.enabled) {
            let indicator = match overrides.get(&decision.name) {
                Some(modules @ PatchIndicator::Modules(_)) => modules.clone(),
                _ => PatchIndicator::Enabled(true),
            };
            requests.insert(decision.name, indicator);
        }
        self.patch(&requests, false)?;

        // Auxiliary subsystems run strictly after the main pass, each behind
        // its own enabled-check; their failures never escalate.
        for subsystem in &self.auxiliary {
            if !subsystem.is_enabled() {
                debug!(subsystem = subsystem.name(), "auxiliary subsystem disabled");
                continue;
            }
            if let Err(err) = subsystem.enable() {
                warn!(
                    subsystem = subsystem.name(),
                    error = %err,
                    "auxiliary instrumentation subsystem failed to enable"
                );
            }
        }
        Ok(())
    }

    /// Patch a specific set of integrations.
    ///
    /// With `raise_errors` (the default for explicit single-integration
    /// activation) any failure propagates to the caller, including failures
    /// of hooks firing immediately for already-loaded modules. Without it,
    /// unknown names are logged and skipped and activation failures are
    /// isolated per integration.
    pub fn patch(
        &self,
        requests: &BTreeMap<String, PatchIndicator>,
        raise_errors: bool,
    ) -> Result<(), GraftError> {
        let mut configured: Vec<&str> = Vec::new();
        for (name, indicator) in requests {
            if !indicator.is_enabled() {
                continue;
            }
            let Some(spec) = self.catalog.lookup(name) else {
                if raise_errors {
                    return Err(GraftError::IntegrationNotFound { name: name.clone() });
                }
                warn!(integration = %name, "unknown integration; skipping");
                continue;
            };

            let modules = match indicator {
                PatchIndicator::Modules(modules) => modules.clone(),
                PatchIndicator::Enabled(_) => spec.target_modules(),
            };
            for module in modules {
                debug!(integration = %name, module = %module, "registering module hook");
                let executor = Arc::clone(&self.executor);
                let integration = name.clone();
                let hook_indicator = indicator.clone();
                self.bus.register(
                    &module,
                    Box::new(move || executor.execute(&integration, &hook_indicator, raise_errors)),
                )?;
            }
            configured.push(name);
        }

        info!(
            "configured instrumentation for {} integration(s); activated so far: {}",
            configured.len(),
            self.patched.snapshot().join(",")
        );
        Ok(())
    }

    /// Sorted names of integrations that have attempted activation.
    pub fn activated_integrations(&self) -> Vec<String> {
        self.patched.snapshot()
    }

    /// Host-facing loader shim entry: signal that `module` has been loaded.
    ///
    /// Returns errors raised by strict hooks to the importing thread; hooks
    /// registered by bulk activation never produce any.
    pub fn notify_module_loaded(&self, module: &str) -> Vec<GraftError> {
        self.bus.notify_loaded(module)
    }

    pub fn catalog(&self) -> &IntegrationCatalog {
        &self.catalog
    }
}
