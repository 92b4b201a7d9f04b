// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for adapter capabilities and the telemetry sink.

pub mod adapter;
pub mod telemetry;

pub use adapter::{IntegrationAdapter, SubmodulePatcher};
pub use telemetry::{NoopSink, TelemetrySink};
