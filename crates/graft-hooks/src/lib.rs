// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module-load event bus for deferred instrumentation.
//!
//! Registering a hook never imports or loads anything; the host program
//! drives loading and reports it to the bus, which fires the pending hooks.

pub mod bus;

pub use bus::{HookFn, ModuleHookBus};
