// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry reporting for the graft instrumentation framework.
//!
//! [`MetricsSink`] implements the sink contract over the metrics-rs facade;
//! [`PolicySink`] wraps any sink with verbosity gating and failure-report
//! de-duplication.

pub mod policy;
pub mod sink;

pub use policy::{MetricPolicy, PolicySink};
pub use sink::{register_metrics, MetricsSink};
