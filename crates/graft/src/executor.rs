// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Patch executor.
//!
//! Runs inside module-load hooks: loads the integration's adapter, invokes
//! its activation entry point, reports outcomes, and records the attempt.
//! One broken integration must never prevent the others from activating, so
//! in non-strict mode every failure is swallowed here after being logged and
//! reported.

use std::sync::Arc;

use tracing::{debug, error};

use graft_catalog::IntegrationCatalog;
use graft_core::{GraftError, PatchIndicator, TelemetrySink, VersionReport};

use crate::adapters::{adapter_path, AdapterRegistry};
use crate::tracker::PatchedSet;

/// Telemetry namespace for activation error counts.
const TELEMETRY_NAMESPACE: &str = "tracers";

pub(crate) struct PatchExecutor {
    catalog: Arc<IntegrationCatalog>,
    adapters: Arc<AdapterRegistry>,
    telemetry: Arc<dyn TelemetrySink>,
    patched: Arc<PatchedSet>,
    prefix: String,
}

impl PatchExecutor {
    pub(crate) fn new(
        catalog: Arc<IntegrationCatalog>,
        adapters: Arc<AdapterRegistry>,
        telemetry: Arc<dyn TelemetrySink>,
        patched: Arc<PatchedSet>,
        prefix: String,
    ) -> Self {
        Self {
            catalog,
            adapters,
            telemetry,
            patched,
            prefix,
        }
    }

    /// Run one activation attempt for `integration`.
    ///
    /// Invoked once per (integration, triggering module) pair; the patched
    /// set makes everything after the first invocation a no-op. No lock is
    /// held while the adapter is constructed or activated.
    pub(crate) fn execute(
        &self,
        integration: &str,
        indicator: &PatchIndicator,
        raise_errors: bool,
    ) -> Result<(), GraftError> {
        if !self.patched.mark_attempted(integration) {
            debug!(integration, "activation already attempted; skipping");
            return Ok(());
        }

        let path = adapter_path(&self.prefix, integration);
        let adapter = match self.adapters.load(&path, integration) {
            Ok(adapter) => adapter,
            Err(err) => return self.fail(integration, err, raise_errors),
        };

        if let Err(err) = adapter.activate() {
            let err = match err {
                activation @ GraftError::Activation { .. } => activation,
                other => GraftError::Activation {
                    integration: integration.to_string(),
                    source: Box::new(other),
                },
            };
            return self.fail(integration, err, raise_errors);
        }

        let enabled_by_default = self.enabled_by_default(integration);
        match adapter.version_report() {
            VersionReport::Components(components) => {
                for (component, version) in components {
                    self.telemetry.report_integration(
                        &component,
                        true,
                        enabled_by_default,
                        None,
                        Some(&version),
                    );
                }
            }
            VersionReport::Single(version) => {
                self.telemetry.report_integration(
                    integration,
                    true,
                    enabled_by_default,
                    None,
                    version.as_deref(),
                );
            }
        }

        if let Some(patcher) = adapter.submodule_patcher() {
            if let Err(err) = patcher.patch_submodules(indicator, raise_errors) {
                if raise_errors {
                    return Err(err);
                }
                // The integration itself activated; only count the
                // submodule failure, the success outcome stands.
                error!(integration, error = %err, "failed to patch additional submodules");
                self.count_error(integration, &err);
            }
        }

        debug!(integration, "integration activated");
        Ok(())
    }

    fn enabled_by_default(&self, integration: &str) -> bool {
        self.catalog
            .lookup(integration)
            .is_some_and(|spec| spec.default_enabled)
    }

    fn fail(
        &self,
        integration: &str,
        err: GraftError,
        raise_errors: bool,
    ) -> Result<(), GraftError> {
        if raise_errors {
            return Err(err);
        }
        error!(integration, error = %err, "failed to activate integration");
        self.telemetry.report_integration(
            integration,
            false,
            self.enabled_by_default(integration),
            Some(&err.to_string()),
            None,
        );
        self.count_error(integration, &err);
        Ok(())
    }

    fn count_error(&self, integration: &str, err: &GraftError) {
        let error_type = err
            .kind()
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        self.telemetry.report_count_metric(
            TELEMETRY_NAMESPACE,
            "integration_errors",
            1,
            &[
                ("integration_name", integration.to_string()),
                ("error_type", error_type),
            ],
        );
    }
}
