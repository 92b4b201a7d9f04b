// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry sink contract.

/// Sink for integration outcomes and count metrics.
///
/// Implementations must swallow their own I/O failures; the patching core
/// never blocks on, or fails because of, the sink.
pub trait TelemetrySink: Send + Sync {
    /// Report one integration activation outcome.
    fn report_integration(
        &self,
        name: &str,
        success: bool,
        enabled_by_default: bool,
        error: Option<&str>,
        version: Option<&str>,
    );

    /// Report a count metric under `namespace` with the given tags.
    fn report_count_metric(
        &self,
        namespace: &str,
        metric: &str,
        value: u64,
        tags: &[(&str, String)],
    );
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for std::sync::Arc<T> {
    fn report_integration(
        &self,
        name: &str,
        success: bool,
        enabled_by_default: bool,
        error: Option<&str>,
        version: Option<&str>,
    ) {
        (**self).report_integration(name, success, enabled_by_default, error, version);
    }

    fn report_count_metric(
        &self,
        namespace: &str,
        metric: &str,
        value: u64,
        tags: &[(&str, String)],
    ) {
        (**self).report_count_metric(namespace, metric, value, tags);
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn report_integration(
        &self,
        _name: &str,
        _success: bool,
        _enabled_by_default: bool,
        _error: Option<&str>,
        _version: Option<&str>,
    ) {
    }

    fn report_count_metric(
        &self,
        _namespace: &str,
        _metric: &str,
        _value: u64,
        _tags: &[(&str, String)],
    ) {
    }
}
