// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metrics-facade telemetry sink.
//!
//! Uses the metrics-rs facade so any installed recorder (Prometheus, statsd,
//! etc.) can collect integration outcomes. Without a recorder the calls are
//! no-ops, which satisfies the sink contract: reporting never fails and never
//! blocks activation.

use metrics::{describe_counter, Label};

use graft_core::TelemetrySink;

/// Register metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "graft_integrations_total",
        "Integration activation outcomes by integration, success, and version"
    );
    describe_counter!(
        "graft_tracers_integration_errors",
        "Integration activation errors by integration and error type"
    );
}

/// Telemetry sink backed by the metrics facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsSink;

impl TelemetrySink for MetricsSink {
    fn report_integration(
        &self,
        name: &str,
        success: bool,
        enabled_by_default: bool,
        error: Option<&str>,
        version: Option<&str>,
    ) {
        let mut labels = vec![
            Label::new("integration", name.to_string()),
            Label::new("success", if success { "true" } else { "false" }),
            Label::new(
                "enabled_by_default",
                if enabled_by_default { "true" } else { "false" },
            ),
        ];
        if let Some(version) = version {
            labels.push(Label::new("version", version.to_string()));
        }
        if let Some(error) = error {
            labels.push(Label::new("error", error.to_string()));
        }
        metrics::counter!("graft_integrations_total", labels).increment(1);
    }

    fn report_count_metric(
        &self,
        namespace: &str,
        metric: &str,
        value: u64,
        tags: &[(&str, String)],
    ) {
        let name = format!("graft_{namespace}_{metric}");
        let labels: Vec<Label> = tags
            .iter()
            .map(|(key, value)| Label::new((*key).to_string(), value.clone()))
            .collect();
        metrics::counter!(name, labels).increment(value);
    }
}
