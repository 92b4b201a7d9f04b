// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles shared across the graft workspace: a telemetry sink that
//! records every call, and fake integration adapters with scriptable
//! behavior.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use graft_core::{
    GraftError, IntegrationAdapter, PatchIndicator, SubmodulePatcher, TelemetrySink, VersionReport,
};

/// One recorded `report_integration` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationReport {
    pub name: String,
    pub success: bool,
    pub enabled_by_default: bool,
    pub error: Option<String>,
    pub version: Option<String>,
}

/// One recorded `report_count_metric` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMetric {
    pub namespace: String,
    pub metric: String,
    pub value: u64,
    pub tags: Vec<(String, String)>,
}

/// Telemetry sink that records every call for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    integrations: Mutex<Vec<IntegrationReport>>,
    counts: Mutex<Vec<CountMetric>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn integration_reports(&self) -> Vec<IntegrationReport> {
        self.integrations.lock().clone()
    }

    /// Reports for one integration name, in emission order.
    pub fn reports_for(&self, name: &str) -> Vec<IntegrationReport> {
        self.integrations
            .lock()
            .iter()
            .filter(|r| r.name == name)
            .cloned()
            .collect()
    }

    pub fn count_metrics(&self) -> Vec<CountMetric> {
        self.counts.lock().clone()
    }
}

impl TelemetrySink for RecordingSink {
    fn report_integration(
        &self,
        name: &str,
        success: bool,
        enabled_by_default: bool,
        error: Option<&str>,
        version: Option<&str>,
    ) {
        self.integrations.lock().push(IntegrationReport {
            name: name.to_string(),
            success,
            enabled_by_default,
            error: error.map(str::to_string),
            version: version.map(str::to_string),
        });
    }

    fn report_count_metric(
        &self,
        namespace: &str,
        metric: &str,
        value: u64,
        tags: &[(&str, String)],
    ) {
        self.counts.lock().push(CountMetric {
            namespace: namespace.to_string(),
            metric: metric.to_string(),
            value,
            tags: tags
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect(),
        });
    }
}

/// Adapter that activates successfully and reports a single version.
///
/// Counts activations so tests can assert idempotency.
#[derive(Debug, Default)]
pub struct StaticAdapter {
    version: Option<String>,
    activations: AtomicUsize,
}

impl StaticAdapter {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            activations: AtomicUsize::new(0),
        }
    }

    pub fn without_version() -> Self {
        Self::default()
    }

    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

impl IntegrationAdapter for StaticAdapter {
    fn activate(&self) -> Result<(), GraftError> {
        self.activations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn version_report(&self) -> VersionReport {
        VersionReport::Single(self.version.clone())
    }
}

/// Adapter reporting one version per instrumented component.
#[derive(Debug)]
pub struct MultiVersionAdapter {
    components: Vec<(String, String)>,
}

impl MultiVersionAdapter {
    pub fn new<I, K, V>(components: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            components: components
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntegrationAdapter for MultiVersionAdapter {
    fn activate(&self) -> Result<(), GraftError> {
        Ok(())
    }

    fn version_report(&self) -> VersionReport {
        VersionReport::Components(self.components.clone())
    }
}

/// Adapter whose activation entry point always fails.
#[derive(Debug)]
pub struct FailingActivationAdapter {
    message: String,
}

impl FailingActivationAdapter {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntegrationAdapter for FailingActivationAdapter {
    fn activate(&self) -> Result<(), GraftError> {
        Err(GraftError::Internal(self.message.clone()))
    }

    fn version_report(&self) -> VersionReport {
        VersionReport::Single(None)
    }
}

/// Adapter exposing the submodule-patcher capability; records each call.
#[derive(Debug, Default)]
pub struct SubmoduleRecordingAdapter {
    calls: Mutex<Vec<(PatchIndicator, bool)>>,
}

impl SubmoduleRecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submodule_calls(&self) -> Vec<(PatchIndicator, bool)> {
        self.calls.lock().clone()
    }
}

impl IntegrationAdapter for SubmoduleRecordingAdapter {
    fn activate(&self) -> Result<(), GraftError> {
        Ok(())
    }

    fn version_report(&self) -> VersionReport {
        VersionReport::Single(Some("0.0.0".to_string()))
    }

    fn submodule_patcher(&self) -> Option<&dyn SubmodulePatcher> {
        Some(self)
    }
}

impl SubmodulePatcher for SubmoduleRecordingAdapter {
    fn patch_submodules(
        &self,
        indicator: &PatchIndicator,
        raise_errors: bool,
    ) -> Result<(), GraftError> {
        self.calls.lock().push((indicator.clone(), raise_errors));
        Ok(())
    }
}
