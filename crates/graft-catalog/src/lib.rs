// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration catalog and activation resolver.
//!
//! The catalog is the static registry of known integrations (default-enabled
//! flag, target modules, dependencies). The resolver turns catalog defaults,
//! environment overrides, and caller overrides into a final decision set,
//! expanding dependencies transitively.

pub mod catalog;
pub mod resolver;
pub mod spec;

pub use catalog::{CatalogOptions, IntegrationCatalog};
pub use resolver::{env_key, parse_bool, process_env_overrides, resolve};
pub use spec::IntegrationSpec;
