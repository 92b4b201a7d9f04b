// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporting policy.
//!
//! An explicit policy object consulted before each report call: count metrics
//! below the configured verbosity are dropped, and repeated failure reports
//! carrying an identical (integration, message) pair are de-duplicated for
//! the process lifetime.

use std::collections::HashSet;

use parking_lot::Mutex;
use tracing::trace;

use graft_core::{TelemetrySink, Verbosity};

/// Count metrics are emitted at debug verbosity.
const COUNT_METRIC_VERBOSITY: Verbosity = Verbosity::Debug;

/// Policy consulted before forwarding telemetry reports.
#[derive(Debug, Clone, Copy)]
pub struct MetricPolicy {
    /// Count metrics below this verbosity are dropped.
    pub min_verbosity: Verbosity,
    /// Drop repeated failure reports with an identical message.
    pub dedupe: bool,
}

impl Default for MetricPolicy {
    fn default() -> Self {
        Self {
            min_verbosity: Verbosity::Debug,
            dedupe: true,
        }
    }
}

/// Sink wrapper that applies a [`MetricPolicy`] before forwarding.
pub struct PolicySink<S> {
    inner: S,
    policy: MetricPolicy,
    seen_failures: Mutex<HashSet<(String, String)>>,
}

impl<S: TelemetrySink> PolicySink<S> {
    pub fn new(inner: S, policy: MetricPolicy) -> Self {
        Self {
            inner,
            policy,
            seen_failures: Mutex::new(HashSet::new()),
        }
    }

    pub fn policy(&self) -> MetricPolicy {
        self.policy
    }
}

impl<S: TelemetrySink> TelemetrySink for PolicySink<S> {
    fn report_integration(
        &self,
        name: &str,
        success: bool,
        enabled_by_default: bool,
        error: Option<&str>,
        version: Option<&str>,
    ) {
        if self.policy.dedupe && !success {
            if let Some(message) = error {
                let mut seen = self.seen_failures.lock();
                if !seen.insert((name.to_string(), message.to_string())) {
                    trace!(integration = name, "suppressing duplicate failure report");
                    return;
                }
            }
        }
        self.inner
            .report_integration(name, success, enabled_by_default, error, version);
    }

    fn report_count_metric(
        &self,
        namespace: &str,
        metric: &str,
        value: u64,
        tags: &[(&str, String)],
    ) {
        if COUNT_METRIC_VERBOSITY < self.policy.min_verbosity {
            return;
        }
        self.inner.report_count_metric(namespace, metric, value, tags);
    }
}
