// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration specifications.

use serde::{Deserialize, Serialize};

/// Static description of one integration: its default-enabled flag, the
/// target modules it hooks, and the integrations it depends on.
///
/// Immutable after catalog construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSpec {
    /// Unique integration name (e.g., "redis", "elasticsearch").
    pub name: String,
    /// Whether this integration is enabled without any override.
    pub default_enabled: bool,
    /// Target module names this integration hooks. Empty means the
    /// integration name itself is the only target module.
    #[serde(default)]
    pub module_names: Vec<String>,
    /// Integrations that must be force-enabled whenever this one is enabled.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl IntegrationSpec {
    pub fn new(name: impl Into<String>, default_enabled: bool) -> Self {
        Self {
            name: name.into(),
            default_enabled,
            module_names: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_names = modules.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Target modules, falling back to the integration name itself.
    pub fn target_modules(&self) -> Vec<String> {
        if self.module_names.is_empty() {
            vec![self.name.clone()]
        } else {
            self.module_names.clone()
        }
    }
}
